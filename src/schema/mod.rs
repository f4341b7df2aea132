//! Schema definitions and validation for SCIM resources.
//!
//! # Key Types
//!
//! - [`Schema`] - schema definition with attributes and metadata
//! - [`AttributeDefinition`] - individual attribute specification and value validator
//! - [`AttributeBuilder`] - fallible builder for attribute definitions
//!
//! # Examples
//!
//! ```rust
//! use scim_validator::schema::Schema;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let user_schema = Schema::core_user()?;
//! let validated = user_schema.validate(&json!({"userName": "bjensen", "active": "True"}))?;
//! assert_eq!(validated["active"], json!(true));
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod definition;
pub mod embedded;
pub mod types;


pub use attribute::{AttributeBuilder, AttributeDefinition};
pub use definition::Schema;
pub use types::{AttributeType, Mutability, Returned, Uniqueness};

/// URI of the core User schema.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// URI of the core Group schema.
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// URI of the Enterprise User extension schema.
pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Name of the `externalId` common attribute.
pub const EXTERNAL_ID: &str = "externalId";
