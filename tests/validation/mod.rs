//! Whole-resource validation tests.

pub mod characteristics;
pub mod data_types;

// Re-export assertion macros
pub use crate::{assert_error_message_contains, assert_scim_error, assert_validation_success};
