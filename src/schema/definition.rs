//! Schema definitions and whole-resource validation.

use super::attribute::{AttributeDefinition, AttributeDocument, NameIndex, validate_members};
use super::types::Mutability;
use crate::error::{BuildError, BuildResult, ScimError, ScimResult};
use crate::patch::PatchOp;

use log::trace;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

/// A SCIM schema definition.
///
/// Represents a complete schema with its metadata and attribute definitions.
/// Built once at configuration time and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    id: String,
    name: String,
    description: String,
    attributes: Vec<AttributeDefinition>,
    index: NameIndex,
}

impl Schema {
    /// Create a schema from its metadata and ordered attribute list.
    ///
    /// Top-level attribute names are not checked for duplicates. A submitted
    /// key is validated against every attribute sharing its case-insensitive
    /// name; lookups by name return the first.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        attributes: Vec<AttributeDefinition>,
    ) -> Self {
        let index = NameIndex::build(&attributes);
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            attributes,
            index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    /// Case-insensitive attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.index
            .get(name)
            .map(|position| &self.attributes[position])
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.index.get(name).is_some()
    }

    /// Copy of this schema with one more attribute appended.
    pub fn with_attribute(&self, attribute: AttributeDefinition) -> Self {
        let mut attributes = self.attributes.clone();
        attributes.push(attribute);
        Self::new(
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            attributes,
        )
    }

    /// Validate a resource without mutability checks.
    ///
    /// Used for create and replace bodies where attributes may be (re)defined.
    pub fn validate(&self, resource: &Value) -> ScimResult<Map<String, Value>> {
        self.validate_resource(resource, false)
    }

    /// Validate a resource, rejecting any value supplied for an immutable attribute.
    pub fn validate_mutability(&self, resource: &Value) -> ScimResult<Map<String, Value>> {
        self.validate_resource(resource, true)
    }

    fn validate_resource(
        &self,
        resource: &Value,
        check_mutability: bool,
    ) -> ScimResult<Map<String, Value>> {
        let Value::Object(object) = resource else {
            return Err(ScimError::invalid_syntax(format!(
                "Resource for schema '{}' must be a JSON object.",
                self.id
            )));
        };
        trace!(
            "Validating {} attribute(s) against schema {} (mutability check: {})",
            object.len(),
            self.id,
            check_mutability
        );
        validate_members(&self.attributes, &self.index, object, check_mutability, None)
    }

    /// Validate the value map of a single resolved PATCH operation.
    ///
    /// Each key must name an attribute of this schema, or, for extension
    /// schemas, `"<schema id>:<attribute name>"`. The whole call fails on the
    /// first key that does not resolve or cannot be patched with `op`.
    pub fn validate_patch_operation(
        &self,
        op: PatchOp,
        value: &Map<String, Value>,
        is_extension: bool,
    ) -> ScimResult<Map<String, Value>> {
        let mut output = Map::new();
        for (key, item) in value {
            let Some(attribute) = self.resolve_patch_key(key, is_extension) else {
                return Err(ScimError::invalid_value(format!(
                    "Attribute '{key}' does not exist in schema '{}' and therefore cannot be patched.",
                    self.id
                )));
            };

            if cannot_be_patched(op, attribute) {
                return Err(ScimError::invalid_value(format!(
                    "Attribute '{}' is {} and therefore cannot be patched with '{op}'.",
                    attribute.name(),
                    attribute.mutability()
                )));
            }

            if let Some(canonical) = attribute.validate(Some(item))? {
                output.insert(key.clone(), canonical);
            }
        }
        Ok(output)
    }

    /// [`Schema::validate_patch_operation`] for a base (non-extension) schema.
    pub fn validate_patch_operation_value(
        &self,
        op: PatchOp,
        value: &Map<String, Value>,
    ) -> ScimResult<Map<String, Value>> {
        self.validate_patch_operation(op, value, false)
    }

    fn resolve_patch_key(&self, key: &str, is_extension: bool) -> Option<&AttributeDefinition> {
        if let Some(attribute) = self.attribute(key) {
            return Some(attribute);
        }
        if !is_extension {
            return None;
        }
        let (prefix, name) = key.rsplit_once(':')?;
        if prefix.eq_ignore_ascii_case(&self.id) {
            self.attribute(name)
        } else {
            None
        }
    }

    /// Render the schema as an RFC 7643 schema description document.
    pub fn to_document(&self) -> Value {
        let attributes: Vec<Value> = self
            .attributes
            .iter()
            .map(AttributeDefinition::to_document)
            .collect();
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "attributes": attributes,
        })
    }

    /// Build a schema from a schema description document.
    pub fn from_document(document: &Value) -> BuildResult<Self> {
        let document = SchemaDocument::deserialize(document)?;
        Self::try_from(document)
    }

    /// Build a schema from a JSON encoded schema description document.
    pub fn from_json_str(content: &str) -> BuildResult<Self> {
        let document: SchemaDocument = serde_json::from_str(content)?;
        Self::try_from(document)
    }

    /// Load a schema description document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> BuildResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn cannot_be_patched(op: PatchOp, attribute: &AttributeDefinition) -> bool {
    match attribute.mutability() {
        Mutability::ReadOnly => true,
        Mutability::Immutable => matches!(op, PatchOp::Replace | PatchOp::Remove),
        Mutability::ReadWrite | Mutability::WriteOnly => false,
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    attributes: Vec<AttributeDocument>,
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = BuildError;

    fn try_from(document: SchemaDocument) -> BuildResult<Self> {
        if document.id.trim().is_empty() {
            return Err(BuildError::invalid_document("schema 'id' cannot be empty"));
        }
        let attributes = document
            .attributes
            .into_iter()
            .map(AttributeDefinition::try_from)
            .collect::<BuildResult<Vec<_>>>()?;
        Ok(Self::new(
            document.id,
            document.name,
            document.description,
            attributes,
        ))
    }
}
