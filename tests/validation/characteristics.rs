//! Attribute characteristics tests: mutability, required, case-insensitive
//! names and duplicate detection.

use serde_json::json;

use super::{assert_error_message_contains, assert_scim_error, assert_validation_success};
use crate::common::{self, fixtures};

#[test]
fn test_read_only_attributes_are_ignored() {
    let users = common::user_resource_type();
    let validated = assert_validation_success!(users.validate(
        fixtures::user_minimal().to_string().as_bytes(),
        &common::context()
    ));
    assert!(!validated.contains_key("id"));
    assert!(!validated.contains_key("meta"));
    assert_eq!(validated["userName"], json!("bjensen@example.com"));
}

#[test]
fn test_read_only_sub_attribute_dropped_from_extension() {
    let users = common::user_resource_type();
    let validated = assert_validation_success!(users.validate(
        fixtures::user_enterprise().to_string().as_bytes(),
        &common::context()
    ));
    let manager = &validated[scim_validator::schema::ENTERPRISE_USER_SCHEMA]["manager"];
    assert!(manager.get("displayName").is_none());
    assert!(manager.get("value").is_some());
}

#[test]
fn test_immutable_group_members() {
    let groups = common::group_resource_type();
    let body = fixtures::group_basic().to_string();

    assert_validation_success!(groups.validate(body.as_bytes(), &common::context()));

    // Mutability is enforced on top-level attributes only.
    assert_validation_success!(groups.validate_mutability(body.as_bytes(), &common::context()));
}

#[test]
fn test_immutable_extension_attribute() {
    let loader = common::CountingLoader::new();
    let users = common::tenant_user_resource_type(loader, false);
    let body = json!({
        "userName": "bjensen",
        (common::DEPARTMENT_SCHEMA): {"badgeNumber": 1138}
    })
    .to_string();

    assert_validation_success!(users.validate(body.as_bytes(), &common::context()));
    let result = users.validate_mutability(body.as_bytes(), &common::context());
    assert_scim_error!(result, "mutability");
    let result = users.validate_mutability(body.as_bytes(), &common::context());
    assert_error_message_contains!(result, "badgeNumber");
}

#[test]
fn test_missing_required_attribute() {
    let groups = common::group_resource_type();
    let result = groups.validate(br#"{"members": []}"#, &common::context());
    assert_scim_error!(result, "invalidValue");
    let result = groups.validate(br#"{"members": []}"#, &common::context());
    assert_error_message_contains!(result, "displayName");
}

#[test]
fn test_case_insensitive_duplicates() {
    let users = common::user_resource_type();
    let result = users.validate(
        br#"{"userName": "a", "USERNAME": "b"}"#,
        &common::context(),
    );
    assert_scim_error!(result, "duplicateAttribute");
}

#[test]
fn test_external_id_is_common_attribute() {
    let groups = common::group_resource_type();
    let validated = assert_validation_success!(groups.validate(
        br#"{"displayName": "Tour Guides", "EXTERNALID": "tg-1"}"#,
        &common::context()
    ));
    assert_eq!(validated["externalId"], json!("tg-1"));

    let result = groups.validate(
        br#"{"displayName": "Tour Guides", "externalId": 7}"#,
        &common::context(),
    );
    assert_scim_error!(result, "invalidValue");
}
