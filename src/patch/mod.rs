//! SCIM PATCH request validation.
//!
//! Implements the validation half of RFC 7644 section 3.5.2: a PATCH body is
//! decoded, every operation's path is resolved against the resource type's
//! schemas, and every value is validated and canonicalized against the
//! attribute it targets. Processing is fail-fast: the first invalid operation
//! rejects the whole request.
//!
//! ```rust
//! use scim_validator::patch::{DefaultPathResolver, PatchOp};
//! use scim_validator::resource::{RequestContext, ResourceType};
//! use scim_validator::schema::Schema;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = ResourceType::builder("User")
//!     .endpoint("/Users")
//!     .schema(Schema::core_user()?)
//!     .build()?;
//!
//! let body = json!({
//!     "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!     "Operations": [{"op": "Replace", "path": "active", "value": "False"}]
//! });
//! let request = users.validate_patch(
//!     body.to_string().as_bytes(),
//!     &RequestContext::with_generated_id(),
//!     &DefaultPathResolver,
//! )?;
//! assert_eq!(request.operations[0].op, PatchOp::Replace);
//! assert_eq!(request.operations[0].value, json!(false));
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod path;

pub use applier::PatchApplier;
pub use path::{AttributePath, DefaultPathResolver, Path, PathError, PathResolver, SchemaSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// URI of the PATCH request message schema.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// PATCH operation verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl PatchOp {
    /// Parse an operation verb case-insensitively.
    pub fn parse(op: &str) -> Option<Self> {
        match op.to_lowercase().as_str() {
            "add" => Some(Self::Add),
            "replace" => Some(Self::Replace),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated PATCH operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    /// Resolved target; `None` for add/replace against the whole resource
    pub path: Option<Path>,
    /// Operation value, canonicalized when a path was resolved
    pub value: Value,
}

impl PatchOperation {
    /// Build the value map validated for this operation.
    ///
    /// `{attr: value}` for a bare attribute target and
    /// `{attr: {sub: value}}` for a sub-attribute target.
    pub fn value_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let Some(path) = &self.path else {
            return map;
        };

        let value = match path.sub_attribute_name() {
            None => self.value.clone(),
            Some(sub) => {
                let mut nested = Map::new();
                nested.insert(sub.to_string(), self.value.clone());
                Value::Object(nested)
            }
        };
        map.insert(path.attribute_path.attribute_name.clone(), value);
        map
    }

    /// Extract this operation's canonical value from a validated value map.
    ///
    /// Returns `None` when the validated map has no usable shape and the
    /// submitted value should be kept as is.
    pub(crate) fn canonical_value(&self, validated: &Map<String, Value>) -> Option<Value> {
        let path = self.path.as_ref()?;
        let Some(top) = validated.get(&path.attribute_path.attribute_name) else {
            return Some(Value::Null);
        };

        match path.sub_attribute_name() {
            None => Some(top.clone()),
            Some(sub) => match top {
                Value::Object(members) => Some(
                    members
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(sub))
                        .map(|(_, value)| value.clone())
                        .unwrap_or(Value::Null),
                ),
                _ => None,
            },
        }
    }
}

/// A validated PATCH request: its schemas and ordered operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    pub schemas: Vec<String>,
    pub operations: Vec<PatchOperation>,
}
