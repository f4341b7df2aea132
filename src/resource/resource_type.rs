//! Resource types: a base schema, its common attributes, and extensions.

use super::context::RequestContext;
use super::extension::{SchemaCache, SchemaExtension, SchemaLoader};
use crate::error::{BuildError, BuildResult, ScimError, ScimResult};
use crate::patch::{PatchApplier, PatchOperation, PatchRequest, PathResolver};
use crate::schema::{AttributeDefinition, AttributeType, EXTERNAL_ID, Mutability, Schema, Uniqueness};

use log::{debug, warn};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// URI of the resource type description schema.
pub const RESOURCE_TYPE_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";

/// A SCIM resource type.
///
/// Validation runs against the base schema extended with the common
/// `externalId` attribute, then against each extension whose payload is
/// nested under the extension's schema URI.
#[derive(Debug, Clone)]
pub struct ResourceType {
    id: Option<String>,
    name: String,
    description: String,
    endpoint: String,
    schema: Schema,
    common: Schema,
    extensions: Vec<SchemaExtension>,
}

impl ResourceType {
    pub fn builder(name: impl Into<String>) -> ResourceTypeBuilder {
        ResourceTypeBuilder::new(name)
    }

    /// Resource type id, defaulting to its name.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The base schema as configured.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The base schema with the common attributes appended.
    pub fn common_schema(&self) -> &Schema {
        &self.common
    }

    pub fn extensions(&self) -> &[SchemaExtension] {
        &self.extensions
    }

    /// Case-insensitive extension lookup by schema URI.
    pub fn extension(&self, uri: &str) -> Option<&SchemaExtension> {
        self.extensions
            .iter()
            .find(|extension| extension.id().eq_ignore_ascii_case(uri))
    }

    /// Resolve every extension schema for a request, loading dynamic ones
    /// through `cache`.
    pub fn schema_extensions(
        &self,
        context: &RequestContext,
        cache: &mut SchemaCache,
    ) -> ScimResult<Vec<Arc<Schema>>> {
        self.extensions
            .iter()
            .map(|extension| cache.resolve(extension, context))
            .collect()
    }

    /// Resolve only the extensions whose URI qualifies `path`, so loaders for
    /// extensions a PATCH operation does not touch never run.
    pub fn path_extensions(
        &self,
        path: &str,
        context: &RequestContext,
        cache: &mut SchemaCache,
    ) -> ScimResult<Vec<Arc<Schema>>> {
        self.extensions
            .iter()
            .filter(|extension| {
                let id = extension.id();
                path.get(..id.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(id))
                    && path[id.len()..].starts_with(':')
            })
            .map(|extension| cache.resolve(extension, context))
            .collect()
    }

    /// Validate a create or replace request body.
    pub fn validate(
        &self,
        raw: &[u8],
        context: &RequestContext,
    ) -> ScimResult<Map<String, Value>> {
        self.validate_body(raw, context, false)
    }

    /// Validate a request body, rejecting values for immutable attributes.
    pub fn validate_mutability(
        &self,
        raw: &[u8],
        context: &RequestContext,
    ) -> ScimResult<Map<String, Value>> {
        self.validate_body(raw, context, true)
    }

    fn validate_body(
        &self,
        raw: &[u8],
        context: &RequestContext,
        check_mutability: bool,
    ) -> ScimResult<Map<String, Value>> {
        debug!(
            "Validating {} resource for request {}",
            self.name, context.request_id
        );

        let document: Value = serde_json::from_slice(raw).map_err(|e| {
            warn!("Rejecting undecodable {} body: {}", self.name, e);
            ScimError::invalid_syntax(format!("Request body could not be decoded: {e}."))
        })?;
        let Value::Object(object) = &document else {
            return Err(ScimError::invalid_syntax(
                "Request body must be a JSON object.",
            ));
        };

        let mut validated = if check_mutability {
            self.common.validate_mutability(&document)?
        } else {
            self.common.validate(&document)?
        };

        let mut cache = SchemaCache::new();
        for extension in &self.extensions {
            let payload = object
                .get(extension.id())
                .filter(|payload| !payload.is_null());
            let Some(payload) = payload else {
                if extension.required() {
                    return Err(ScimError::invalid_value(format!(
                        "Missing required extension '{}'.",
                        extension.id()
                    )));
                }
                continue;
            };

            let schema = cache.resolve(extension, context)?;
            let extension_values = if check_mutability {
                schema.validate_mutability(payload)?
            } else {
                schema.validate(payload)?
            };
            validated.insert(extension.id().to_string(), Value::Object(extension_values));
        }

        debug!(
            "Validated {} resource for request {} ({} attribute(s))",
            self.name,
            context.request_id,
            validated.len()
        );
        Ok(validated)
    }

    /// Validate the value of one resolved PATCH operation.
    ///
    /// Paths qualified with an extension URI validate against that
    /// extension; everything else validates against the common schema.
    pub fn validate_operation_value(
        &self,
        operation: &PatchOperation,
        context: &RequestContext,
        cache: &mut SchemaCache,
    ) -> ScimResult<Map<String, Value>> {
        let Some(path) = &operation.path else {
            return Err(ScimError::invalid_value(
                "Operation has no path to validate its value against.",
            ));
        };
        let value = operation.value_map();

        let extension = path
            .attribute_path
            .uri
            .as_deref()
            .and_then(|uri| self.extension(uri));
        match extension {
            Some(extension) => {
                let schema = cache.resolve(extension, context)?;
                schema.validate_patch_operation(operation.op, &value, true)
            }
            None => self
                .common
                .validate_patch_operation_value(operation.op, &value),
        }
    }

    /// Validate a PATCH request body.
    pub fn validate_patch<R: PathResolver + ?Sized>(
        &self,
        body: &[u8],
        context: &RequestContext,
        resolver: &R,
    ) -> ScimResult<PatchRequest> {
        PatchApplier::new(self, resolver).apply(body, context)
    }

    /// Render the RFC 7643 resource type description.
    pub fn to_document(&self) -> Value {
        let extensions: Vec<Value> = self
            .extensions
            .iter()
            .map(|extension| {
                json!({
                    "schema": extension.id(),
                    "required": extension.required(),
                })
            })
            .collect();

        json!({
            "schemas": [RESOURCE_TYPE_SCHEMA],
            "id": self.id(),
            "name": self.name,
            "description": self.description,
            "endpoint": self.endpoint,
            "schema": self.schema.id(),
            "schemaExtensions": extensions,
        })
    }
}

fn external_id_attribute() -> BuildResult<AttributeDefinition> {
    AttributeDefinition::builder(EXTERNAL_ID, AttributeType::String)
        .description(
            "A String that is an identifier for the resource as defined by the provisioning client.",
        )
        .case_exact(true)
        .mutability(Mutability::ReadWrite)
        .uniqueness(Uniqueness::None)
        .build()
}

/// Builder for [`ResourceType`].
#[derive(Debug)]
pub struct ResourceTypeBuilder {
    id: Option<String>,
    name: String,
    description: String,
    endpoint: Option<String>,
    schema: Option<Schema>,
    extensions: Vec<SchemaExtension>,
}

impl ResourceTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            endpoint: None,
            schema: None,
            extensions: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Add an extension with a fixed schema.
    pub fn extension(mut self, schema: Schema, required: bool) -> Self {
        self.extensions.push(SchemaExtension::new(schema, required));
        self
    }

    /// Add an extension whose schema is loaded per request.
    pub fn dynamic_extension(
        mut self,
        id: impl Into<String>,
        loader: impl SchemaLoader + 'static,
        required: bool,
    ) -> Self {
        self.extensions
            .push(SchemaExtension::dynamic(id, loader, required));
        self
    }

    pub fn build(self) -> BuildResult<ResourceType> {
        if self.name.trim().is_empty() {
            return Err(BuildError::invalid_document(
                "resource type 'name' cannot be empty",
            ));
        }
        let Some(endpoint) = self.endpoint.filter(|endpoint| !endpoint.is_empty()) else {
            return Err(BuildError::invalid_document(format!(
                "resource type '{}' has no endpoint",
                self.name
            )));
        };
        let Some(schema) = self.schema else {
            return Err(BuildError::invalid_document(format!(
                "resource type '{}' has no schema",
                self.name
            )));
        };

        let common = if schema.contains_attribute(EXTERNAL_ID) {
            schema.clone()
        } else {
            schema.with_attribute(external_id_attribute()?)
        };

        Ok(ResourceType {
            id: self.id,
            name: self.name,
            description: self.description,
            endpoint,
            schema,
            common,
            extensions: self.extensions,
        })
    }
}
