//! Error types for SCIM validation and PATCH processing.
//!
//! [`ScimError`] covers the protocol error taxonomy returned to clients, while
//! [`BuildError`] covers configuration mistakes detected while schemas and
//! resource types are being constructed at start-up.

use serde::{Deserialize, Serialize};

/// HTTP status used for every validation failure.
pub const BAD_REQUEST: u16 = 400;

/// Protocol-level error produced while validating a resource or PATCH request.
///
/// Every variant maps onto a `scimType` from RFC 7644 section 3.12 and carries
/// a human readable detail naming the offending attribute (and, for PATCH
/// requests, the 1-based operation index).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScimError {
    /// The request body could not be parsed or is not a JSON object
    #[error("invalidSyntax: {detail}")]
    InvalidSyntax { detail: String },

    /// A value is missing, has the wrong type or cannot be applied
    #[error("invalidValue: {detail}")]
    InvalidValue { detail: String },

    /// A PATCH path failed resolution against the schema set
    #[error("invalidPath: {detail}")]
    InvalidPath { detail: String },

    /// A PATCH operation verb was not recognised
    #[error("invalidFilter: {detail}")]
    InvalidFilter { detail: String },

    /// An immutable attribute was supplied in a replace-style update
    #[error("mutability: {detail}")]
    Mutability { detail: String },

    /// Two supplied keys match the same attribute case-insensitively
    #[error("duplicateAttribute: {detail}")]
    DuplicateAttributeFound { detail: String },
}

impl ScimError {
    /// Create an invalid syntax error
    pub fn invalid_syntax(detail: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            detail: detail.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            detail: detail.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(detail: impl Into<String>) -> Self {
        Self::InvalidPath {
            detail: detail.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(detail: impl Into<String>) -> Self {
        Self::InvalidFilter {
            detail: detail.into(),
        }
    }

    /// Create a mutability error for the named attribute
    pub fn mutability(attribute: &str) -> Self {
        Self::Mutability {
            detail: format!("Attribute '{attribute}' is immutable and cannot be modified."),
        }
    }

    /// Create a duplicate attribute error for the named attribute
    pub fn duplicate_attribute(attribute: &str) -> Self {
        Self::DuplicateAttributeFound {
            detail: format!("Attribute '{attribute}' was supplied more than once."),
        }
    }

    /// Create the error returned when a required attribute is absent
    pub fn missing_required(attribute: &str) -> Self {
        Self::invalid_value(format!("Required attribute '{attribute}' is missing."))
    }

    /// The `scimType` keyword of this error.
    pub fn scim_type(&self) -> &'static str {
        match self {
            Self::InvalidSyntax { .. } => "invalidSyntax",
            Self::InvalidValue { .. } => "invalidValue",
            Self::InvalidPath { .. } => "invalidPath",
            Self::InvalidFilter { .. } => "invalidFilter",
            Self::Mutability { .. } => "mutability",
            Self::DuplicateAttributeFound { .. } => "duplicateAttribute",
        }
    }

    /// The HTTP status code for this error.
    pub fn status(&self) -> u16 {
        BAD_REQUEST
    }

    /// The human readable detail message.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidSyntax { detail }
            | Self::InvalidValue { detail }
            | Self::InvalidPath { detail }
            | Self::InvalidFilter { detail }
            | Self::Mutability { detail }
            | Self::DuplicateAttributeFound { detail } => detail,
        }
    }

    /// Build the wire representation of this error.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            scim_type: self.scim_type().to_string(),
            detail: self.detail().to_string(),
            status: self.status(),
        }
    }
}

/// Error object as sent to SCIM clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub scim_type: String,
    pub detail: String,
    pub status: u16,
}

impl From<ScimError> for ErrorResponse {
    fn from(error: ScimError) -> Self {
        error.to_response()
    }
}

/// Errors raised while constructing attributes, schemas and resource types.
///
/// These are configuration errors and should surface during service start-up.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Attribute name does not follow the ATTRNAME grammar
    #[error("Invalid attribute name: '{name}'")]
    InvalidAttributeName { name: String },

    /// Two sub-attributes share a case-insensitive name
    #[error(
        "Duplicate name '{name}' for sub-attributes {first} and {second} of attribute '{attribute}'"
    )]
    DuplicateSubAttribute {
        attribute: String,
        name: String,
        first: usize,
        second: usize,
    },

    /// Sub-attributes declared where they are not allowed
    #[error("Invalid sub-attributes for attribute '{attribute}': {message}")]
    InvalidSubAttributes { attribute: String, message: String },

    /// A schema or resource type description is malformed
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// Reading a schema file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a schema file failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Create an invalid document error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

pub type ScimResult<T> = Result<T, ScimError>;
pub type BuildResult<T> = Result<T, BuildError>;
