//! Resource types and their request-scoped validation.
//!
//! # Key Components
//!
//! * [`ResourceType`] - base schema, common attributes and extensions of a resource
//! * [`SchemaExtension`] - a static or dynamically loaded extension schema
//! * [`SchemaCache`] - per-call memo of dynamically loaded schemas
//! * [`RequestContext`] - request id and tenant handed to schema loaders

pub mod context;
pub mod extension;
pub mod resource_type;

pub use context::RequestContext;
pub use extension::{ExtensionSource, SchemaCache, SchemaExtension, SchemaLoader};
pub use resource_type::{RESOURCE_TYPE_SCHEMA, ResourceType, ResourceTypeBuilder};
