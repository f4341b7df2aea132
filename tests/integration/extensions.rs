//! Static and dynamically loaded schema extensions.

use serde_json::json;

use super::{assert_error_message_contains, assert_scim_error, assert_validation_success};
use crate::common::{self, CountingLoader, DEPARTMENT_SCHEMA, fixtures};
use scim_validator::patch::DefaultPathResolver;
use scim_validator::resource::{RequestContext, ResourceType, SchemaCache};
use scim_validator::schema::{ENTERPRISE_USER_SCHEMA, Schema};

#[test]
fn test_optional_extension_may_be_absent() {
    let users = common::user_resource_type();
    let validated = assert_validation_success!(users.validate(
        br#"{"userName": "bjensen"}"#,
        &common::context()
    ));
    assert!(!validated.contains_key(ENTERPRISE_USER_SCHEMA));
}

#[test]
fn test_required_extension_must_be_present() {
    let users = ResourceType::builder("User")
        .endpoint("/Users")
        .schema(Schema::core_user().unwrap())
        .extension(Schema::enterprise_user().unwrap(), true)
        .build()
        .unwrap();

    let result = users.validate(br#"{"userName": "bjensen"}"#, &common::context());
    assert_scim_error!(result, "invalidValue");

    let body = json!({"userName": "bjensen", ENTERPRISE_USER_SCHEMA: null}).to_string();
    let result = users.validate(body.as_bytes(), &common::context());
    assert_error_message_contains!(result, ENTERPRISE_USER_SCHEMA);

    let body = json!({"userName": "bjensen", ENTERPRISE_USER_SCHEMA: {}}).to_string();
    assert_validation_success!(users.validate(body.as_bytes(), &common::context()));
}

#[test]
fn test_extension_errors_propagate() {
    let users = common::user_resource_type();
    let body = json!({
        "userName": "bjensen",
        ENTERPRISE_USER_SCHEMA: {"manager": {"value": 26118915}}
    })
    .to_string();
    let result = users.validate(body.as_bytes(), &common::context());
    assert_scim_error!(result, "invalidValue");
}

#[test]
fn test_dynamic_extension_loaded_once_per_validation() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader.clone(), false);
    let body = json!({
        "userName": "bjensen",
        (DEPARTMENT_SCHEMA): {"department": "Tour Operations"}
    })
    .to_string();

    let validated = assert_validation_success!(users.validate(body.as_bytes(), &common::context()));
    assert_eq!(validated[DEPARTMENT_SCHEMA]["department"], json!("Tour Operations"));
    assert_eq!(loader.calls(), 1);

    assert_validation_success!(users.validate(body.as_bytes(), &common::context()));
    assert_eq!(loader.calls(), 2);
}

#[test]
fn test_dynamic_extension_not_loaded_when_absent() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader.clone(), false);
    assert_validation_success!(users.validate(br#"{"userName": "bjensen"}"#, &common::context()));
    assert_eq!(loader.calls(), 0);
}

#[test]
fn test_dynamic_schema_depends_on_tenant() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader, false);
    let body = json!({
        "userName": "bjensen",
        (DEPARTMENT_SCHEMA): {"floor": 3}
    })
    .to_string();

    let validated = assert_validation_success!(users.validate(body.as_bytes(), &common::context()));
    assert!(validated[DEPARTMENT_SCHEMA].get("floor").is_none());

    let tenant = RequestContext::with_tenant("req-7", "acme");
    let validated = assert_validation_success!(users.validate(body.as_bytes(), &tenant));
    assert_eq!(validated[DEPARTMENT_SCHEMA]["floor"], json!(3));
}

#[test]
fn test_patch_loads_dynamic_extension_once() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader.clone(), false);
    let body = fixtures::patch_request(json!([
        {"op": "add", "path": format!("{DEPARTMENT_SCHEMA}:department"), "value": "Tours"},
        {"op": "replace", "path": format!("{DEPARTMENT_SCHEMA}:department"), "value": "Rides"},
        {"op": "add", "path": "nickName", "value": "Babs"}
    ]))
    .to_string();

    let request = assert_validation_success!(users.validate_patch(
        body.as_bytes(),
        &common::context(),
        &DefaultPathResolver
    ));
    assert_eq!(request.operations.len(), 3);
    assert_eq!(request.operations[1].value, json!("Rides"));
    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_patch_loads_only_referenced_extensions() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader.clone(), false);
    let body = fixtures::patch_request(json!([
        {"op": "replace", "path": "displayName", "value": "Babs"},
        {"op": "remove", "path": "nickName"}
    ]))
    .to_string();

    assert_validation_success!(users.validate_patch(
        body.as_bytes(),
        &common::context(),
        &DefaultPathResolver
    ));
    assert_eq!(loader.calls(), 0);
}

#[test]
fn test_patch_loader_failure_names_operation() {
    let users = ResourceType::builder("User")
        .endpoint("/Users")
        .schema(Schema::core_user().expect("user schema"))
        .dynamic_extension(
            DEPARTMENT_SCHEMA,
            |_: &RequestContext| -> scim_validator::ScimResult<Schema> {
                Err(scim_validator::ScimError::invalid_value(
                    "Department directory unavailable.",
                ))
            },
            false,
        )
        .build()
        .expect("tenant user resource type");
    let body = fixtures::patch_request(json!([
        {"op": "replace", "path": "displayName", "value": "Babs"},
        {"op": "replace", "path": format!("{DEPARTMENT_SCHEMA}:department"), "value": "Rides"}
    ]))
    .to_string();

    let result = users.validate_patch(body.as_bytes(), &common::context(), &DefaultPathResolver);
    assert_scim_error!(result, "invalidPath");
    let result = users.validate_patch(body.as_bytes(), &common::context(), &DefaultPathResolver);
    assert_error_message_contains!(result, "Operation number 2");
}

#[test]
fn test_patch_immutable_extension_attribute() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader, false);

    let body = fixtures::patch_request(json!([
        {"op": "add", "path": format!("{DEPARTMENT_SCHEMA}:badgeNumber"), "value": 1138}
    ]))
    .to_string();
    assert_validation_success!(users.validate_patch(
        body.as_bytes(),
        &common::context(),
        &DefaultPathResolver
    ));

    let body = fixtures::patch_request(json!([
        {"op": "replace", "path": format!("{DEPARTMENT_SCHEMA}:badgeNumber"), "value": 1139}
    ]))
    .to_string();
    let result = users.validate_patch(body.as_bytes(), &common::context(), &DefaultPathResolver);
    assert_scim_error!(result, "invalidValue");
}

#[test]
fn test_schema_extensions_share_cache() {
    let loader = CountingLoader::new();
    let users = common::tenant_user_resource_type(loader.clone(), false);
    let mut cache = SchemaCache::new();

    let first = users.schema_extensions(&common::context(), &mut cache).unwrap();
    let second = users.schema_extensions(&common::context(), &mut cache).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id(), second[0].id());
    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_resource_type_document() {
    let users = common::tenant_user_resource_type(CountingLoader::new(), true);
    let document = users.to_document();
    assert_eq!(document["endpoint"], json!("/Users"));
    assert_eq!(
        document["schemaExtensions"],
        json!([{"schema": DEPARTMENT_SCHEMA, "required": true}])
    );
}
