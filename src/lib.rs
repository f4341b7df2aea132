//! SCIM 2.0 schema validation and PATCH processing for Rust.
//!
//! Validates resource bodies and PATCH requests against RFC 7643 schemas,
//! returning canonical values and SCIM protocol errors. Storage, filtering
//! and transport are left to the embedding server.
//!
//! # Core Components
//!
//! - [`Schema`] - schema definition and whole-resource validator
//! - [`ResourceType`] - base schema plus extensions, validating raw request bodies
//! - [`PatchApplier`] - fail-fast PATCH request validation
//!
//! # Quick Start
//!
//! ```rust
//! use scim_validator::{RequestContext, ResourceType, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = ResourceType::builder("User")
//!     .endpoint("/Users")
//!     .schema(Schema::core_user()?)
//!     .extension(Schema::enterprise_user()?, false)
//!     .build()?;
//!
//! let body = br#"{"userName": "bjensen", "active": "true"}"#;
//! let validated = users.validate(body, &RequestContext::with_generated_id())?;
//! assert_eq!(validated["active"], serde_json::json!(true));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod patch;
pub mod resource;
pub mod schema;

pub use error::{BuildError, BuildResult, ErrorResponse, ScimError, ScimResult};
pub use patch::{
    DefaultPathResolver, PatchApplier, PatchOp, PatchOperation, PatchRequest, Path, PathError,
    PathResolver,
};
pub use resource::{RequestContext, ResourceType, SchemaCache, SchemaExtension, SchemaLoader};
pub use schema::{AttributeBuilder, AttributeDefinition, AttributeType, Schema};
