//! Schema extensions of a resource type, static or loaded per request.

use super::context::RequestContext;
use crate::error::ScimResult;
use crate::schema::Schema;

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Loads an extension schema for a request.
///
/// Used for schemas that are assembled at runtime, e.g. from per-tenant
/// configuration. Loaders may block on I/O and must be idempotent for a given
/// request context; they are invoked at most once per extension within one
/// validation call.
pub trait SchemaLoader: Send + Sync {
    fn load_schema(&self, context: &RequestContext) -> ScimResult<Schema>;
}

impl<F> SchemaLoader for F
where
    F: Fn(&RequestContext) -> ScimResult<Schema> + Send + Sync,
{
    fn load_schema(&self, context: &RequestContext) -> ScimResult<Schema> {
        self(context)
    }
}

/// Where an extension gets its schema from.
#[derive(Clone)]
pub enum ExtensionSource {
    /// Schema fixed at configuration time
    Static(Arc<Schema>),
    /// Schema resolved per request
    Dynamic(Arc<dyn SchemaLoader>),
}

impl fmt::Debug for ExtensionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(schema) => f.debug_tuple("Static").field(&schema.id()).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").field(&"SchemaLoader").finish(),
        }
    }
}

/// One of a resource type's schema extensions.
#[derive(Debug, Clone)]
pub struct SchemaExtension {
    id: String,
    required: bool,
    source: ExtensionSource,
}

impl SchemaExtension {
    /// An extension with a schema fixed at configuration time.
    pub fn new(schema: Schema, required: bool) -> Self {
        Self {
            id: schema.id().to_string(),
            required,
            source: ExtensionSource::Static(Arc::new(schema)),
        }
    }

    /// An extension whose schema is loaded per request.
    ///
    /// `id` is the URI under which the extension payload is nested.
    pub fn dynamic(
        id: impl Into<String>,
        loader: impl SchemaLoader + 'static,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            required,
            source: ExtensionSource::Dynamic(Arc::new(loader)),
        }
    }

    /// Schema URI of the extension.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether resources of this type must include the extension.
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.source, ExtensionSource::Dynamic(_))
    }

    pub fn source(&self) -> &ExtensionSource {
        &self.source
    }
}

/// Extension schemas resolved during one validation call.
///
/// Create one per request and drop it afterwards; nothing is shared across
/// calls.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an extension's schema, invoking its loader on first use.
    pub fn resolve(
        &mut self,
        extension: &SchemaExtension,
        context: &RequestContext,
    ) -> ScimResult<Arc<Schema>> {
        let loader = match &extension.source {
            ExtensionSource::Static(schema) => return Ok(Arc::clone(schema)),
            ExtensionSource::Dynamic(loader) => loader,
        };

        let key = extension.id.to_lowercase();
        if let Some(schema) = self.schemas.get(&key) {
            return Ok(Arc::clone(schema));
        }

        debug!(
            "Loading dynamic schema {} for request {}",
            extension.id, context.request_id
        );
        let schema = Arc::new(loader.load_schema(context)?);
        self.schemas.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Number of dynamically loaded schemas held.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
