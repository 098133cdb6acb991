mod common;

use axum::http::StatusCode;
use common::{call, test_app};
use serde_json::json;

const CUSTOMERS: &str = "/stocktake/api/customers";
const ITEMS: &str = "/stocktake/api/stocktaking-items";

#[tokio::test]
async fn customer_lifecycle() {
    let app = test_app();
    let (status, body) = call(&app, "POST", CUSTOMERS, Some(json!({"name": "foo", "email": "foo@example.com"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "foo", "email": "foo@example.com", "phone": null}));

    let (status, body) = call(&app, "PUT", &format!("{}/1", CUSTOMERS), Some(json!({"name": "new_foo"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("new_foo"));

    let (status, body) = call(&app, "GET", CUSTOMERS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn customer_email_must_look_like_an_address() {
    let app = test_app();
    let (status, body) = call(&app, "POST", CUSTOMERS, Some(json!({"name": "foo", "email": "nope"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"email": ["String does not match expected pattern."]}}));
}

#[tokio::test]
async fn customer_name_is_unique() {
    let app = test_app();
    call(&app, "POST", CUSTOMERS, Some(json!({"name": "foo"}))).await;
    let (status, body) = call(&app, "POST", CUSTOMERS, Some(json!({"name": "foo"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"name": ["Already exists."]}}));
}

#[tokio::test]
async fn all_missing_required_fields_are_reported_together() {
    let app = test_app();
    let (status, body) = call(&app, "POST", ITEMS, Some(json!({"counted": true}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"message": {
            "name": ["Missing data for required field."],
            "quantity": ["Missing data for required field."],
            "unit": ["Missing data for required field."],
        }})
    );
}

#[tokio::test]
async fn stocktaking_item_fields_are_typed() {
    let app = test_app();
    let (status, body) = call(
        &app,
        "POST",
        ITEMS,
        Some(json!({"name": "screw", "unit": "pcs", "quantity": "many", "counted": "yes"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"message": {
            "counted": ["Not a valid boolean."],
            "quantity": ["Not a valid number."],
            "unit": ["Not a valid integer."],
        }})
    );

    let (status, body) = call(&app, "POST", ITEMS, Some(json!({"name": "flour", "unit": 1, "quantity": 12.5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "flour", "unit": 1, "quantity": 12.5, "counted": null})
    );
}

#[tokio::test]
async fn integer_fields_reject_values_beyond_i64() {
    let app = test_app();
    let (status, body) = call(
        &app,
        "POST",
        ITEMS,
        Some(json!({"name": "x", "unit": 18446744073709551615u64, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"unit": ["Not a valid integer."]}}));
}

#[tokio::test]
async fn resources_do_not_share_records() {
    let app = test_app();
    call(&app, "POST", "/stocktake/api/units", Some(json!({"unit": "kg"}))).await;
    let (_, body) = call(&app, "GET", CUSTOMERS, None).await;
    assert_eq!(body, json!([]));
    let (status, _) = call(&app, "GET", &format!("{}/1", ITEMS), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_version() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    let (_, body) = call(&app, "GET", "/version", None).await;
    assert_eq!(body["name"], json!("stocktake"));
}

#[tokio::test]
async fn unregistered_verb_is_not_allowed() {
    let app = test_app();
    let (status, _) = call(&app, "PATCH", "/stocktake/api/units/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
