//! PATCH request processing against the User and Group resource types.

use serde_json::{Value, json};

use super::{assert_error_message_contains, assert_scim_error, assert_validation_success};
use crate::common::{self, fixtures};
use scim_validator::patch::{
    DefaultPathResolver, PATCH_OP_SCHEMA, Path, PathError, PathResolver, SchemaSet,
};
use scim_validator::schema::ENTERPRISE_USER_SCHEMA;
use scim_validator::{PatchOp, PatchRequest, ResourceType, ScimResult};

fn patch(resource_type: &ResourceType, operations: Value) -> ScimResult<PatchRequest> {
    let body = fixtures::patch_request(operations).to_string();
    resource_type.validate_patch(body.as_bytes(), &common::context(), &DefaultPathResolver)
}

fn patch_user(operations: Value) -> ScimResult<PatchRequest> {
    patch(&common::user_resource_type(), operations)
}

#[test]
fn test_operations_preserve_order_and_schemas() {
    let request = assert_validation_success!(patch_user(json!([
        {"op": "add", "path": "nickName", "value": "Babs"},
        {"op": "Replace", "path": "displayName", "value": "Babs Jensen"},
        {"op": "REMOVE", "path": "title"}
    ])));

    assert_eq!(request.schemas, vec![PATCH_OP_SCHEMA.to_string()]);
    let ops: Vec<PatchOp> = request.operations.iter().map(|op| op.op).collect();
    assert_eq!(ops, vec![PatchOp::Add, PatchOp::Replace, PatchOp::Remove]);
    assert_eq!(request.operations[2].value, Value::Null);
}

#[test]
fn test_values_are_canonicalized() {
    let request = assert_validation_success!(patch_user(json!([
        {"op": "replace", "path": "active", "value": "False"},
        {"op": "replace", "path": "emails[type eq \"work\"].primary", "value": "true"},
        {"op": "add", "path": "NAME.GIVENNAME", "value": "Barbara"}
    ])));

    assert_eq!(request.operations[0].value, json!(false));
    assert_eq!(request.operations[1].value, json!(true));
    assert_eq!(request.operations[2].value, json!("Barbara"));

    let path = request.operations[2].path.as_ref().expect("resolved path");
    assert_eq!(path.attribute_path.attribute_name, "name");
    assert_eq!(path.sub_attribute_name(), Some("givenName"));
}

#[test]
fn test_multi_valued_value_is_validated() {
    let request = assert_validation_success!(patch_user(json!([
        {"op": "add", "path": "emails", "value": [{"value": "babs@jensen.org", "primary": "False"}]}
    ])));
    assert_eq!(
        request.operations[0].value,
        json!([{"value": "babs@jensen.org", "primary": false}])
    );

    let result = patch_user(json!([
        {"op": "add", "path": "emails", "value": "babs@jensen.org"}
    ]));
    assert_scim_error!(result, "invalidValue");
}

#[test]
fn test_zero_operations() {
    let result = patch_user(json!([]));
    assert_scim_error!(result, "invalidValue");
    let result = patch_user(json!([]));
    assert_error_message_contains!(result, "Zero operations");
}

#[test]
fn test_unrecognized_verb_aborts_request() {
    let result = patch_user(json!([
        {"op": "add", "path": "nickName", "value": "Babs"},
        {"op": "move", "path": "nickName"},
        {"op": "add", "path": "title", "value": "Tour Guide"}
    ]));
    assert_scim_error!(result, "invalidFilter");
    let result = patch_user(json!([
        {"op": "add", "path": "nickName", "value": "Babs"},
        {"op": "move", "path": "nickName"}
    ]));
    assert_error_message_contains!(result, "Operation number 2");
}

#[test]
fn test_unresolvable_path_aborts_request() {
    let result = patch_user(json!([
        {"op": "add", "path": "nickName", "value": "Babs"},
        {"op": "replace", "path": "shoeSize", "value": 44}
    ]));
    assert_scim_error!(result, "invalidPath");
    let result = patch_user(json!([
        {"op": "add", "path": "nickName", "value": "Babs"},
        {"op": "replace", "path": "shoeSize", "value": 44}
    ]));
    assert_error_message_contains!(result, "Operation number 2");
}

#[test]
fn test_remove_without_path() {
    let result = patch_user(json!([{"op": "remove"}]));
    assert_scim_error!(result, "invalidPath");
    let result = patch_user(json!([{"op": "remove", "path": ""}]));
    assert_scim_error!(result, "invalidPath");
}

#[test]
fn test_invalid_value_names_operation() {
    let result = patch_user(json!([
        {"op": "replace", "path": "active", "value": "maybe"}
    ]));
    assert_scim_error!(result, "invalidValue");
    let result = patch_user(json!([
        {"op": "replace", "path": "active", "value": "maybe"}
    ]));
    assert_error_message_contains!(result, "Operation number 1 has failed validation");
}

#[test]
fn test_read_only_attribute_cannot_be_patched() {
    let result = patch_user(json!([
        {"op": "remove", "path": "groups"}
    ]));
    assert_scim_error!(result, "invalidValue");
    let result = patch_user(json!([
        {"op": "add", "path": "groups", "value": [{"value": "e9e30dba"}]}
    ]));
    assert_error_message_contains!(result, "cannot be patched");
}

#[test]
fn test_extension_path() {
    let request = assert_validation_success!(patch_user(json!([
        {
            "op": "replace",
            "path": format!("{ENTERPRISE_USER_SCHEMA}:manager.value"),
            "value": "26118915-6090-4610-87e4-49d8ca9f808d"
        },
        {
            "op": "add",
            "path": format!("{ENTERPRISE_USER_SCHEMA}:employeeNumber"),
            "value": "701984"
        }
    ])));

    let path = request.operations[0].path.as_ref().expect("resolved path");
    assert_eq!(path.attribute_path.uri.as_deref(), Some(ENTERPRISE_USER_SCHEMA));
    assert_eq!(
        request.operations[0].value,
        json!("26118915-6090-4610-87e4-49d8ca9f808d")
    );
    assert_eq!(request.operations[1].value, json!("701984"));
}

#[test]
fn test_group_member_mutability() {
    let groups = common::group_resource_type();

    let result = patch(
        &groups,
        json!([{"op": "add", "path": "members", "value": [{"value": "2819c223"}]}]),
    );
    assert_validation_success!(result);

    let result = patch(
        &groups,
        json!([{"op": "replace", "path": "displayName", "value": "Guides"}]),
    );
    assert_validation_success!(result);
}

#[test]
fn test_pathless_add_is_passed_through() {
    let request = assert_validation_success!(patch_user(json!([
        {"op": "add", "value": {"nickName": "Babs", "active": "true"}}
    ])));
    assert!(request.operations[0].path.is_none());
    assert_eq!(
        request.operations[0].value,
        json!({"nickName": "Babs", "active": "true"})
    );
}

#[test]
fn test_custom_path_resolver() {
    let users = common::user_resource_type();
    let aliases = |path: &str, schemas: &SchemaSet<'_>| -> Result<Path, PathError> {
        match path {
            "mail" => Ok(Path::attribute("emails")),
            other => DefaultPathResolver.resolve(other, schemas),
        }
    };
    let body = fixtures::patch_request(json!([
        {"op": "add", "path": "mail", "value": [{"value": "babs@jensen.org"}]}
    ]))
    .to_string();

    let request = assert_validation_success!(users.validate_patch(
        body.as_bytes(),
        &common::context(),
        &aliases
    ));
    assert_eq!(
        request.operations[0].path.as_ref().map(|p| p.to_string()),
        Some("emails".to_string())
    );
}

#[test]
fn test_undecodable_body() {
    let users = common::user_resource_type();
    let result = users.validate_patch(b"{\"Operations\": [", &common::context(), &DefaultPathResolver);
    assert_scim_error!(result, "invalidSyntax");
}

#[test]
fn test_error_response_shape() {
    let err = patch_user(json!([])).unwrap_err();
    let response = serde_json::to_value(err.to_response()).unwrap();
    assert_eq!(
        response,
        json!({
            "scimType": "invalidValue",
            "detail": "Zero operations found in request body.",
            "status": 400
        })
    );
}
