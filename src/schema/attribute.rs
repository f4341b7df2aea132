//! Attribute definitions and per-value validation.
//!
//! An [`AttributeDefinition`] describes one schema attribute and knows how to
//! validate and canonicalize a submitted value for it. Definitions are built
//! through [`AttributeBuilder`], which rejects malformed definitions instead of
//! letting them reach request handling.

use super::types::{AttributeType, Mutability, Returned, Uniqueness};
use crate::error::{BuildError, BuildResult, ScimError, ScimResult};

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Lower-cased attribute name to positions lookup, built once per attribute list.
///
/// Names may repeat; every position sharing a name is kept in list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NameIndex(HashMap<String, Vec<usize>>);

impl NameIndex {
    pub(crate) fn build(attributes: &[AttributeDefinition]) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::with_capacity(attributes.len());
        for (position, attribute) in attributes.iter().enumerate() {
            index
                .entry(attribute.name.to_lowercase())
                .or_default()
                .push(position);
        }
        Self(index)
    }

    /// Position of the first definition with this name.
    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.positions(name).first().copied()
    }

    pub(crate) fn positions(&self, name: &str) -> &[usize] {
        self.0
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Definition of a SCIM attribute.
///
/// Immutable once built; use [`AttributeBuilder`] to create one.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    name: String,
    data_type: AttributeType,
    multi_valued: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    required: bool,
    case_exact: bool,
    description: String,
    canonical_values: Vec<String>,
    reference_types: Vec<String>,
    sub_attributes: Vec<AttributeDefinition>,
    sub_index: NameIndex,
}

impl AttributeDefinition {
    /// Start building an attribute with the given name and data type.
    pub fn builder(name: impl Into<String>, data_type: AttributeType) -> AttributeBuilder {
        AttributeBuilder::new(name, data_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> AttributeType {
        self.data_type
    }

    pub fn multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn returned(&self) -> Returned {
        self.returned
    }

    pub fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn case_exact(&self) -> bool {
        self.case_exact
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn canonical_values(&self) -> &[String] {
        &self.canonical_values
    }

    pub fn reference_types(&self) -> &[String] {
        &self.reference_types
    }

    pub fn sub_attributes(&self) -> &[AttributeDefinition] {
        &self.sub_attributes
    }

    /// Whether the attribute is complex and declares sub-attributes.
    pub fn has_sub_attributes(&self) -> bool {
        self.data_type == AttributeType::Complex && !self.sub_attributes.is_empty()
    }

    /// Case-insensitive sub-attribute lookup.
    pub fn sub_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.sub_index
            .get(name)
            .map(|position| &self.sub_attributes[position])
    }

    /// Validate a submitted value, returning its canonical form.
    ///
    /// `None` (or JSON `null`) means the attribute was not supplied. A return
    /// value of `Ok(None)` means the attribute contributes nothing to the
    /// validated output, either because it was omitted or because it is
    /// read-only.
    pub fn validate(&self, value: Option<&Value>) -> ScimResult<Option<Value>> {
        let value = match value {
            None | Some(Value::Null) => {
                if self.required {
                    return Err(ScimError::missing_required(&self.name));
                }
                return Ok(None);
            }
            Some(value) => value,
        };

        // readOnly: the attribute SHALL NOT be modified by clients
        if self.mutability == Mutability::ReadOnly {
            return Ok(None);
        }

        if !self.multi_valued {
            return self.validate_singular(value).map(Some);
        }

        match value {
            Value::Array(items) => {
                if self.required && items.is_empty() {
                    return Err(self.empty_multi_valued());
                }
                let canonical = items
                    .iter()
                    .map(|item| self.validate_singular(item))
                    .collect::<ScimResult<Vec<_>>>()?;
                Ok(Some(Value::Array(canonical)))
            }
            // Legacy clients send a single mapping of sub-attributes.
            Value::Object(entries) => {
                if self.required && entries.is_empty() {
                    return Err(self.empty_multi_valued());
                }
                let mut canonical = Map::new();
                for (key, item) in entries {
                    let Some(sub) = self.sub_attribute(key) else {
                        continue;
                    };
                    if let Some(item) = sub.validate(Some(item))? {
                        canonical.insert(sub.name.clone(), item);
                    }
                }
                Ok(Some(Value::Object(canonical)))
            }
            _ => Err(ScimError::invalid_value(format!(
                "Multi-valued attribute '{}' was not an array.",
                self.name
            ))),
        }
    }

    fn validate_singular(&self, value: &Value) -> ScimResult<Value> {
        match self.data_type {
            AttributeType::Binary => match value {
                Value::String(encoded) if is_base64(encoded) => Ok(value.clone()),
                Value::String(_) => Err(ScimError::invalid_value(format!(
                    "Attribute '{}' contains illegal characters for type binary.",
                    self.name
                ))),
                _ => Err(self.wrong_type()),
            },
            AttributeType::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                // Some identity providers send booleans as strings in PATCH bodies.
                Value::String(text) if text.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
                Value::String(text) if text.eq_ignore_ascii_case("false") => {
                    Ok(Value::Bool(false))
                }
                _ => Err(self.wrong_type()),
            },
            AttributeType::Complex => match value {
                Value::Object(members) => validate_members(
                    &self.sub_attributes,
                    &self.sub_index,
                    members,
                    false,
                    Some(&self.name),
                )
                .map(Value::Object),
                // Manager references are accepted as a bare id for legacy clients.
                Value::String(_) if self.name.eq_ignore_ascii_case("manager") => Ok(value.clone()),
                _ => Err(ScimError::invalid_value(format!(
                    "Complex attribute '{}' does not have the right structure.",
                    self.name
                ))),
            },
            AttributeType::DateTime => match value {
                Value::String(text) if is_xsd_date_time(text) => Ok(value.clone()),
                Value::String(_) => Err(ScimError::invalid_value(format!(
                    "Attribute '{}' is not a valid dateTime, expected YYYY-MM-DDTHH:mm:ssZ.",
                    self.name
                ))),
                _ => Err(self.wrong_type()),
            },
            AttributeType::Decimal => match value {
                Value::Number(number) => number
                    .as_f64()
                    .map(Value::from)
                    .ok_or_else(|| self.unparseable_number()),
                _ => Err(self.wrong_type()),
            },
            AttributeType::Integer => match value {
                Value::Number(number) => number
                    .as_i64()
                    .map(Value::from)
                    .ok_or_else(|| self.unparseable_number()),
                _ => Err(self.wrong_type()),
            },
            AttributeType::Reference | AttributeType::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(self.wrong_type()),
            },
        }
    }

    fn wrong_type(&self) -> ScimError {
        ScimError::invalid_value(format!(
            "Attribute '{}' is not of type {}.",
            self.name, self.data_type
        ))
    }

    fn unparseable_number(&self) -> ScimError {
        ScimError::invalid_value(format!(
            "Attribute '{}' failed to parse as {}.",
            self.name, self.data_type
        ))
    }

    fn empty_multi_valued(&self) -> ScimError {
        ScimError::invalid_value(format!(
            "Multi-valued attribute '{}' was empty.",
            self.name
        ))
    }

    /// Render the attribute as an RFC 7643 schema attribute document.
    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        document.insert("name".into(), json!(self.name));
        document.insert("type".into(), json!(self.data_type.as_str()));
        document.insert("multiValued".into(), json!(self.multi_valued));
        document.insert("description".into(), json!(self.description));
        document.insert("required".into(), json!(self.required));
        document.insert("mutability".into(), json!(self.mutability.as_str()));
        document.insert("returned".into(), json!(self.returned.as_str()));

        if !self.canonical_values.is_empty() {
            document.insert("canonicalValues".into(), json!(self.canonical_values));
        }
        if !self.reference_types.is_empty() {
            document.insert("referenceTypes".into(), json!(self.reference_types));
        }
        if self.has_sub_attributes() {
            let subs: Vec<Value> = self.sub_attributes.iter().map(Self::to_document).collect();
            document.insert("subAttributes".into(), Value::Array(subs));
        }
        if !matches!(
            self.data_type,
            AttributeType::Boolean | AttributeType::Complex
        ) {
            document.insert("caseExact".into(), json!(self.case_exact));
            document.insert("uniqueness".into(), json!(self.uniqueness.as_str()));
        }

        Value::Object(document)
    }
}

/// Validate a JSON object against an attribute list.
///
/// Shared by full schema validation and complex attribute validation. Keys
/// are matched case-insensitively; keys that match no attribute are dropped.
/// `parent` names the enclosing complex attribute, if any, and selects the
/// error reported for duplicate keys.
pub(crate) fn validate_members(
    attributes: &[AttributeDefinition],
    index: &NameIndex,
    object: &Map<String, Value>,
    check_mutability: bool,
    parent: Option<&str>,
) -> ScimResult<Map<String, Value>> {
    let mut hits: Vec<Option<&Value>> = vec![None; attributes.len()];
    let mut duplicated = vec![false; attributes.len()];
    for (key, value) in object {
        for &position in index.positions(key) {
            if hits[position].is_some() {
                duplicated[position] = true;
            } else {
                hits[position] = Some(value);
            }
        }
    }

    let mut output = Map::new();
    for (position, attribute) in attributes.iter().enumerate() {
        if duplicated[position] {
            return Err(match parent {
                None => ScimError::duplicate_attribute(&attribute.name),
                Some(parent) => ScimError::invalid_value(format!(
                    "Duplicate attribute '{}' found inside complex attribute '{parent}'.",
                    attribute.name
                )),
            });
        }

        let hit = hits[position];
        // An immutable attribute SHALL NOT be updated.
        if check_mutability && hit.is_some() && attribute.mutability == Mutability::Immutable {
            return Err(ScimError::mutability(&attribute.name));
        }

        if let Some(value) = attribute.validate(hit)? {
            output.insert(attribute.name.clone(), value);
        }
    }
    Ok(output)
}

/// `YYYY-MM-DDTHH:mm:ss[.fff][Z|±hh:mm]`, with an uppercase `T` and `Z`.
fn is_xsd_date_time(text: &str) -> bool {
    if text.as_bytes().get(10) != Some(&b'T') {
        return false;
    }
    if let Some(local) = text.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f").is_ok();
    }
    DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%:z").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Standard alphabet with canonical padding. Non-zero pad bits are accepted.
const BINARY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

fn is_base64(encoded: &str) -> bool {
    BINARY.decode(encoded).is_ok()
}

fn is_valid_attribute_name(name: &str) -> bool {
    if name == "$ref" {
        return true;
    }
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Fluent builder for [`AttributeDefinition`].
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    name: String,
    data_type: AttributeType,
    multi_valued: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    required: bool,
    case_exact: bool,
    description: String,
    canonical_values: Vec<String>,
    reference_types: Vec<String>,
    sub_attributes: Vec<AttributeDefinition>,
}

impl AttributeBuilder {
    pub fn new(name: impl Into<String>, data_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            multi_valued: false,
            mutability: Mutability::default(),
            returned: Returned::default(),
            uniqueness: Uniqueness::default(),
            required: false,
            case_exact: false,
            description: String::new(),
            canonical_values: Vec::new(),
            reference_types: Vec::new(),
            sub_attributes: Vec::new(),
        }
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn returned(mut self, returned: Returned) -> Self {
        self.returned = returned;
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn case_exact(mut self, case_exact: bool) -> Self {
        self.case_exact = case_exact;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn canonical_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn reference_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn sub_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.sub_attributes.push(attribute);
        self
    }

    pub fn sub_attributes(mut self, attributes: impl IntoIterator<Item = AttributeDefinition>) -> Self {
        self.sub_attributes.extend(attributes);
        self
    }

    /// Validate the definition and freeze it.
    pub fn build(self) -> BuildResult<AttributeDefinition> {
        if !is_valid_attribute_name(&self.name) {
            return Err(BuildError::InvalidAttributeName { name: self.name });
        }

        if !self.sub_attributes.is_empty() && self.data_type != AttributeType::Complex {
            return Err(BuildError::InvalidSubAttributes {
                attribute: self.name,
                message: format!("attributes of type {} cannot have sub-attributes", self.data_type),
            });
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (position, sub) in self.sub_attributes.iter().enumerate() {
            if sub.data_type == AttributeType::Complex {
                return Err(BuildError::InvalidSubAttributes {
                    attribute: self.name,
                    message: format!("sub-attribute '{}' cannot be complex", sub.name),
                });
            }
            let lowered = sub.name.to_lowercase();
            if let Some(&first) = seen.get(&lowered) {
                return Err(BuildError::DuplicateSubAttribute {
                    attribute: self.name,
                    name: lowered,
                    first,
                    second: position,
                });
            }
            seen.insert(lowered, position);
        }

        let sub_index = NameIndex::build(&self.sub_attributes);
        Ok(AttributeDefinition {
            name: self.name,
            data_type: self.data_type,
            multi_valued: self.multi_valued,
            mutability: self.mutability,
            returned: self.returned,
            uniqueness: self.uniqueness,
            required: self.required,
            case_exact: self.case_exact,
            description: self.description,
            canonical_values: self.canonical_values,
            reference_types: self.reference_types,
            sub_attributes: self.sub_attributes,
            sub_index,
        })
    }
}

/// Serde shape of an attribute inside a schema description document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttributeDocument {
    name: String,
    #[serde(rename = "type")]
    data_type: AttributeType,
    #[serde(default)]
    multi_valued: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    case_exact: bool,
    #[serde(default)]
    mutability: Mutability,
    #[serde(default)]
    returned: Returned,
    #[serde(default)]
    uniqueness: Uniqueness,
    #[serde(default)]
    canonical_values: Vec<String>,
    #[serde(default)]
    reference_types: Vec<String>,
    #[serde(default)]
    sub_attributes: Vec<AttributeDocument>,
}

impl TryFrom<AttributeDocument> for AttributeDefinition {
    type Error = BuildError;

    fn try_from(document: AttributeDocument) -> BuildResult<Self> {
        let sub_attributes = document
            .sub_attributes
            .into_iter()
            .map(Self::try_from)
            .collect::<BuildResult<Vec<_>>>()?;

        AttributeBuilder::new(document.name, document.data_type)
            .multi_valued(document.multi_valued)
            .description(document.description)
            .required(document.required)
            .case_exact(document.case_exact)
            .mutability(document.mutability)
            .returned(document.returned)
            .uniqueness(document.uniqueness)
            .canonical_values(document.canonical_values)
            .reference_types(document.reference_types)
            .sub_attributes(sub_attributes)
            .build()
    }
}
