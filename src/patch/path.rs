//! PATCH path resolution.
//!
//! Paths follow the RFC 7644 `PATH` grammar restricted to what validation
//! needs: `[schemaURI:]attrName[.subAttr]` or
//! `[schemaURI:]attrName[valueFilter][.subAttr]`. The filter expression is
//! kept as text; evaluating it belongs to whoever applies the patch.

use crate::schema::{AttributeDefinition, Schema};

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The schemas a path may refer to: the resource type's base schema
/// (including common attributes) and its resolved extensions.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSet<'a> {
    pub base: &'a Schema,
    pub extensions: &'a [Arc<Schema>],
}

impl<'a> SchemaSet<'a> {
    pub fn new(base: &'a Schema, extensions: &'a [Arc<Schema>]) -> Self {
        Self { base, extensions }
    }

    /// Base schema followed by the extensions, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Schema> + '_ {
        std::iter::once(self.base).chain(self.extensions.iter().map(|schema| &**schema))
    }

    /// Case-insensitive lookup by schema URI.
    pub fn schema(&self, uri: &str) -> Option<&'a Schema> {
        self.iter().find(|schema| schema.id().eq_ignore_ascii_case(uri))
    }
}

/// `[uri:]attribute[.subAttribute]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    /// Schema URI when the path was qualified
    pub uri: Option<String>,
    pub attribute_name: String,
    pub sub_attribute: Option<String>,
}

/// A resolved PATCH path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub attribute_path: AttributePath,
    /// Raw filter expression between `[` and `]`
    pub value_filter: Option<String>,
    /// Sub-attribute following a value filter
    pub sub_attribute: Option<String>,
}

impl Path {
    /// Path to a top-level attribute of the base schema.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            attribute_path: AttributePath {
                uri: None,
                attribute_name: name.into(),
                sub_attribute: None,
            },
            value_filter: None,
            sub_attribute: None,
        }
    }

    /// The targeted sub-attribute, from the attribute path or after the filter.
    pub fn sub_attribute_name(&self) -> Option<&str> {
        self.attribute_path
            .sub_attribute
            .as_deref()
            .or(self.sub_attribute.as_deref())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attribute_path = &self.attribute_path;
        if let Some(uri) = &attribute_path.uri {
            write!(f, "{uri}:")?;
        }
        f.write_str(&attribute_path.attribute_name)?;
        if let Some(sub) = &attribute_path.sub_attribute {
            write!(f, ".{sub}")?;
        }
        if let Some(filter) = &self.value_filter {
            write!(f, "[{filter}]")?;
        }
        if let Some(sub) = &self.sub_attribute {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

/// Reasons a path fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("invalid path '{path}': {message}")]
    Syntax { path: String, message: String },

    #[error("path '{path}' refers to an unknown schema")]
    UnknownSchema { path: String },

    #[error("attribute '{attribute}' does not exist in schema '{schema}'")]
    UnknownAttribute { attribute: String, schema: String },

    #[error("attribute '{attribute}' has no sub-attribute '{sub_attribute}'")]
    UnknownSubAttribute {
        attribute: String,
        sub_attribute: String,
    },
}

impl PathError {
    fn syntax(path: &str, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Resolves PATCH path strings against a resource type's schemas.
///
/// Supplied by the caller so that servers with their own filter grammar can
/// plug in; [`DefaultPathResolver`] covers the RFC 7644 path forms.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, path: &str, schemas: &SchemaSet<'_>) -> Result<Path, PathError>;
}

impl<F> PathResolver for F
where
    F: Fn(&str, &SchemaSet<'_>) -> Result<Path, PathError> + Send + Sync,
{
    fn resolve(&self, path: &str, schemas: &SchemaSet<'_>) -> Result<Path, PathError> {
        self(path, schemas)
    }
}

/// Resolver for `[uri:]attr[.sub]` and `[uri:]attr[filter][.sub]` paths.
///
/// Unqualified paths resolve against the base schema. Attribute and
/// sub-attribute names come back in their schema-defined spelling.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathResolver;

impl PathResolver for DefaultPathResolver {
    fn resolve(&self, path: &str, schemas: &SchemaSet<'_>) -> Result<Path, PathError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let (schema, uri, rest) = split_schema_uri(path, schemas)?;
        let parsed = parse_attribute_expression(path, rest)?;

        let attribute =
            schema
                .attribute(parsed.attribute)
                .ok_or_else(|| PathError::UnknownAttribute {
                    attribute: parsed.attribute.to_string(),
                    schema: schema.id().to_string(),
                })?;

        if parsed.filter.is_some() && !attribute.multi_valued() {
            return Err(PathError::syntax(
                path,
                format!(
                    "value filter on single-valued attribute '{}'",
                    attribute.name()
                ),
            ));
        }

        let leading_sub = parsed
            .leading_sub
            .map(|name| canonical_sub_attribute(attribute, name))
            .transpose()?;
        let trailing_sub = parsed
            .trailing_sub
            .map(|name| canonical_sub_attribute(attribute, name))
            .transpose()?;

        Ok(Path {
            attribute_path: AttributePath {
                uri,
                attribute_name: attribute.name().to_string(),
                sub_attribute: leading_sub,
            },
            value_filter: parsed.filter.map(str::to_string),
            sub_attribute: trailing_sub,
        })
    }
}

/// Strip a leading schema URI, picking the longest matching schema id.
fn split_schema_uri<'p, 's>(
    path: &'p str,
    schemas: &SchemaSet<'s>,
) -> Result<(&'s Schema, Option<String>, &'p str), PathError> {
    let matched = schemas
        .iter()
        .filter(|schema| {
            let id = schema.id();
            path.get(..id.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(id))
                && path[id.len()..].starts_with(':')
        })
        .max_by_key(|schema| schema.id().len());

    if let Some(schema) = matched {
        let rest = &path[schema.id().len() + 1..];
        return Ok((schema, Some(schema.id().to_string()), rest));
    }

    let qualified = path
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("urn:"));
    if qualified {
        return Err(PathError::UnknownSchema {
            path: path.to_string(),
        });
    }
    Ok((schemas.base, None, path))
}

struct AttributeExpression<'p> {
    attribute: &'p str,
    leading_sub: Option<&'p str>,
    filter: Option<&'p str>,
    trailing_sub: Option<&'p str>,
}

fn parse_attribute_expression<'p>(
    path: &str,
    expression: &'p str,
) -> Result<AttributeExpression<'p>, PathError> {
    let end = expression
        .find(['.', '['])
        .unwrap_or(expression.len());
    let attribute = checked_name(path, &expression[..end])?;
    let rest = &expression[end..];

    if let Some(sub) = rest.strip_prefix('.') {
        return Ok(AttributeExpression {
            attribute,
            leading_sub: Some(checked_name(path, sub)?),
            filter: None,
            trailing_sub: None,
        });
    }

    let Some(bracketed) = rest.strip_prefix('[') else {
        return Ok(AttributeExpression {
            attribute,
            leading_sub: None,
            filter: None,
            trailing_sub: None,
        });
    };

    let close = closing_bracket(bracketed)
        .ok_or_else(|| PathError::syntax(path, "unterminated value filter"))?;
    let filter = bracketed[..close].trim();
    if filter.is_empty() {
        return Err(PathError::syntax(path, "empty value filter"));
    }

    let after = &bracketed[close + 1..];
    let trailing_sub = if after.is_empty() {
        None
    } else if let Some(sub) = after.strip_prefix('.') {
        Some(checked_name(path, sub)?)
    } else {
        return Err(PathError::syntax(
            path,
            format!("unexpected '{after}' after value filter"),
        ));
    };

    Ok(AttributeExpression {
        attribute,
        leading_sub: None,
        filter: Some(filter),
        trailing_sub,
    })
}

/// Position of the `]` closing a value filter, skipping quoted strings.
fn closing_bracket(filter: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (position, c) in filter.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' if !in_string => return None,
            ']' if !in_string => return Some(position),
            _ => {}
        }
    }
    None
}

/// `ATTRNAME = ALPHA *(nameChar)`, plus `$ref`.
fn checked_name<'p>(path: &str, name: &'p str) -> Result<&'p str, PathError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some('$') => name == "$ref",
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(PathError::syntax(
            path,
            format!("'{name}' is not a valid attribute name"),
        ))
    }
}

fn canonical_sub_attribute(
    attribute: &AttributeDefinition,
    name: &str,
) -> Result<String, PathError> {
    attribute
        .sub_attribute(name)
        .map(|sub| sub.name().to_string())
        .ok_or_else(|| PathError::UnknownSubAttribute {
            attribute: attribute.name().to_string(),
            sub_attribute: name.to_string(),
        })
}
