//! Data type validation tests.
//!
//! Exercises the per-type checks through full resource validation, including
//! the string-to-boolean coercion clients rely on.

use serde_json::json;

use super::{assert_error_message_contains, assert_scim_error, assert_validation_success};
use crate::common::{self, fixtures};
use scim_validator::schema::{AttributeDefinition, AttributeType, Schema};

fn validate(body: serde_json::Value) -> scim_validator::ScimResult<serde_json::Map<String, serde_json::Value>> {
    common::user_resource_type().validate(body.to_string().as_bytes(), &common::context())
}

fn typed_schema() -> Schema {
    let attribute = |name: &str, data_type| {
        AttributeDefinition::builder(name, data_type)
            .build()
            .expect("valid attribute")
    };
    Schema::new(
        "urn:example:params:scim:schemas:Device",
        "Device",
        "Devices with one attribute per type",
        vec![
            attribute("serial", AttributeType::String),
            attribute("enabled", AttributeType::Boolean),
            attribute("ports", AttributeType::Integer),
            attribute("weight", AttributeType::Decimal),
            attribute("installed", AttributeType::DateTime),
            attribute("firmware", AttributeType::Binary),
            attribute("owner", AttributeType::Reference),
        ],
    )
}

#[test]
fn test_rfc_enterprise_user_validates() {
    let validated = assert_validation_success!(validate(fixtures::user_enterprise()));
    assert_eq!(validated["displayName"], json!("Babs Jensen"));
    assert_eq!(validated["externalId"], json!("701984"));
    assert_eq!(validated["emails"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_boolean_strings_are_canonicalized() {
    let validated = assert_validation_success!(validate(json!({
        "userName": "bjensen",
        "active": "TRUE",
        "emails": [{"value": "bjensen@example.com", "primary": "false"}]
    })));
    assert_eq!(validated["active"], json!(true));
    assert_eq!(validated["emails"][0]["primary"], json!(false));
}

#[test]
fn test_boolean_rejects_other_strings() {
    let result = validate(json!({"userName": "bjensen", "active": "maybe"}));
    assert_scim_error!(result, "invalidValue");
    let result = validate(json!({"userName": "bjensen", "active": "maybe"}));
    assert_error_message_contains!(result, "active");
}

#[test]
fn test_string_rejects_numbers() {
    let result = validate(json!({"userName": 42}));
    assert_scim_error!(result, "invalidValue");
}

#[test]
fn test_every_type_accepts_its_value() {
    let validated = assert_validation_success!(typed_schema().validate(&json!({
        "serial": "SN-1",
        "enabled": true,
        "ports": 4,
        "weight": 1.25,
        "installed": "2024-03-01T12:00:00Z",
        "firmware": "AAECAw==",
        "owner": "https://example.com/v2/Users/1"
    })));
    assert_eq!(validated.len(), 7);
    assert_eq!(validated["ports"], json!(4));
    assert_eq!(validated["weight"], json!(1.25));
}

#[test]
fn test_every_type_rejects_wrong_shapes() {
    let schema = typed_schema();
    for document in [
        json!({"serial": ["SN-1"]}),
        json!({"enabled": 1}),
        json!({"ports": 4.5}),
        json!({"ports": "4"}),
        json!({"weight": "1.25"}),
        json!({"installed": "yesterday"}),
        json!({"installed": 1709294400}),
        json!({"installed": "2008-01-23 04:56:22Z"}),
        json!({"installed": "2008-01-23t04:56:22Z"}),
        json!({"installed": "2008-01-23T04:56:22z"}),
        json!({"installed": "2008-01-23"}),
        json!({"firmware": "QQ="}),
        json!({"firmware": "Q==="}),
        json!({"firmware": "%%%"}),
        json!({"owner": {"value": "1"}}),
    ] {
        assert_scim_error!(schema.validate(&document), "invalidValue");
    }
}

#[test]
fn test_date_time_forms() {
    let schema = typed_schema();
    for installed in [
        "2008-01-23T04:56:22Z",
        "2008-01-23T04:56:22.125Z",
        "2008-01-23T04:56:22+11:00",
        "2008-01-23T04:56:22-05:30",
        "2008-01-23T04:56:22",
    ] {
        assert_validation_success!(schema.validate(&json!({"installed": installed})));
    }
}

#[test]
fn test_binary_padding_bits_are_not_checked() {
    let schema = typed_schema();
    for firmware in ["QQ==", "QR==", "QUI=", "QUJD", ""] {
        assert_validation_success!(schema.validate(&json!({"firmware": firmware})));
    }
}

#[test]
fn test_binary_certificates() {
    let result = validate(json!({
        "userName": "bjensen",
        "x509Certificates": [{"value": "MIIDQzCCAqygAwIBAgICEAAwDQYJKoZIhvcNAQEFBQAw"}]
    }));
    assert_validation_success!(result);

    let result = validate(json!({
        "userName": "bjensen",
        "x509Certificates": [{"value": "not base64"}]
    }));
    assert_error_message_contains!(result, "binary");
}

#[test]
fn test_non_object_bodies() {
    let users = common::user_resource_type();
    assert_scim_error!(users.validate(b"\"bjensen\"", &common::context()), "invalidSyntax");
    assert_scim_error!(users.validate(b"", &common::context()), "invalidSyntax");
    assert_scim_error!(users.validate(b"null", &common::context()), "invalidSyntax");
}
