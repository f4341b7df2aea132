//! Fail-fast validation of PATCH request bodies.

use super::path::{PathResolver, SchemaSet};
use super::{PatchOp, PatchOperation, PatchRequest};
use crate::error::{ScimError, ScimResult};
use crate::resource::{RequestContext, ResourceType, SchemaCache};

use log::{debug, trace, warn};
use serde::Deserialize;
use serde_json::Value;

/// PATCH body as sent by clients. Member names are matched leniently since
/// clients disagree on `Operations` versus `operations`.
#[derive(Debug, Deserialize)]
struct RawPatchRequest {
    #[serde(default, alias = "Schemas")]
    schemas: Vec<String>,
    #[serde(default, rename = "Operations", alias = "operations")]
    operations: Vec<RawOperation>,
}

#[derive(Debug, Deserialize)]
struct RawOperation {
    #[serde(default, alias = "Op")]
    op: Option<String>,
    #[serde(default, alias = "Path")]
    path: Option<String>,
    #[serde(default, alias = "Value")]
    value: Value,
}

/// Validates PATCH requests for one resource type.
///
/// Operations are processed in order and the first failure aborts the whole
/// request; no partial result is produced. Dynamic extension schemas are
/// loaded when an operation path first names them, at most once per
/// [`PatchApplier::apply`] call.
pub struct PatchApplier<'a, R: PathResolver + ?Sized> {
    resource_type: &'a ResourceType,
    resolver: &'a R,
}

impl<'a, R: PathResolver + ?Sized> PatchApplier<'a, R> {
    pub fn new(resource_type: &'a ResourceType, resolver: &'a R) -> Self {
        Self {
            resource_type,
            resolver,
        }
    }

    /// Decode and validate a PATCH body.
    ///
    /// Operation values targeted by a path come back canonicalized, e.g.
    /// `"True"` for a boolean attribute becomes `true`.
    pub fn apply(&self, body: &[u8], context: &RequestContext) -> ScimResult<PatchRequest> {
        debug!(
            "Validating PATCH request for {} (request {})",
            self.resource_type.name(),
            context.request_id
        );

        let raw: RawPatchRequest = serde_json::from_slice(body).map_err(|e| {
            warn!("Rejecting undecodable PATCH body: {}", e);
            ScimError::invalid_syntax(format!("Request body could not be decoded: {e}."))
        })?;
        if raw.operations.is_empty() {
            return Err(ScimError::invalid_value(
                "Zero operations found in request body.",
            ));
        }

        let mut cache = SchemaCache::new();
        let mut operations = Vec::with_capacity(raw.operations.len());
        for (position, operation) in raw.operations.into_iter().enumerate() {
            let index = position + 1;
            let operation = self
                .validate_operation(index, operation, context, &mut cache)
                .inspect_err(|e| {
                    warn!(
                        "PATCH request {} rejected at operation {}: {}",
                        context.request_id, index, e
                    )
                })?;
            operations.push(operation);
        }

        debug!(
            "PATCH request {} validated with {} operation(s)",
            context.request_id,
            operations.len()
        );
        Ok(PatchRequest {
            schemas: raw.schemas,
            operations,
        })
    }

    fn validate_operation(
        &self,
        index: usize,
        raw: RawOperation,
        context: &RequestContext,
        cache: &mut SchemaCache,
    ) -> ScimResult<PatchOperation> {
        let verb = raw.op.unwrap_or_default();
        let Some(op) = PatchOp::parse(&verb) else {
            return Err(ScimError::invalid_filter(format!(
                "Operation number {index} has an unrecognized operation type '{verb}'."
            )));
        };

        let raw_path = raw.path.unwrap_or_default();
        let path = match op {
            PatchOp::Add | PatchOp::Replace if raw_path.is_empty() => None,
            _ => {
                let extensions = self
                    .resource_type
                    .path_extensions(&raw_path, context, cache)
                    .map_err(|e| {
                        ScimError::invalid_path(format!(
                            "Operation number {index} has failed validation: {}",
                            e.detail()
                        ))
                    })?;
                let schemas = SchemaSet::new(self.resource_type.common_schema(), &extensions);
                Some(self.resolver.resolve(&raw_path, &schemas).map_err(|e| {
                    ScimError::invalid_path(format!(
                        "Operation number {index} has failed validation: {e}."
                    ))
                })?)
            }
        };

        let mut operation = PatchOperation {
            op,
            path,
            value: raw.value,
        };
        if operation.path.is_none() {
            trace!("Operation {index} ({op}) targets the whole resource");
            return Ok(operation);
        }

        let validated = self
            .resource_type
            .validate_operation_value(&operation, context, cache)
            .map_err(|e| {
                ScimError::invalid_value(format!(
                    "Operation number {index} has failed validation: {}",
                    e.detail()
                ))
            })?;
        if let Some(canonical) = operation.canonical_value(&validated) {
            operation.value = canonical;
        }
        trace!("Operation {index} ({op}) validated");
        Ok(operation)
    }
}
