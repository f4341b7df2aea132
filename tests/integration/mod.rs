//! End-to-end tests for resource types, extensions and PATCH requests.

pub mod extensions;
pub mod patch;

pub use crate::{assert_error_message_contains, assert_scim_error, assert_validation_success};
