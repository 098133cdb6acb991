mod common;

use axum::http::StatusCode;
use common::{call, test_app};
use serde_json::json;

const UNITS: &str = "/stocktake/api/units";

#[tokio::test]
async fn create_conflict_delete_then_gone() {
    let app = test_app();

    let (status, body) = call(&app, "POST", UNITS, Some(json!({"unit": "kg"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], json!("kg"));
    let id = body["id"].as_i64().expect("server-assigned id");

    let (status, body) = call(&app, "POST", UNITS, Some(json!({"unit": "kg"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"unit": ["Already exists."]}}));

    let (status, body) = call(&app, "DELETE", &format!("{}/{}", UNITS, id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(null));

    let (status, _) = call(&app, "GET", &format!("{}/{}", UNITS, id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let app = test_app();
    let (status, body) = call(&app, "GET", UNITS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_records_in_id_order() {
    let app = test_app();
    for unit in ["kg", "pcs", "l"] {
        call(&app, "POST", UNITS, Some(json!({"unit": unit}))).await;
    }
    let (_, body) = call(&app, "GET", UNITS, None).await;
    assert_eq!(
        body,
        json!([{"id": 1, "unit": "kg"}, {"id": 2, "unit": "pcs"}, {"id": 3, "unit": "l"}])
    );
}

#[tokio::test]
async fn missing_or_empty_unit_is_rejected() {
    let app = test_app();
    for payload in [json!({}), json!({"unit": ""}), json!({"unit": null})] {
        let (status, body) = call(&app, "POST", UNITS, Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"message": {"unit": ["Missing data for required field."]}}));
    }
}

#[tokio::test]
async fn update_to_own_value_is_not_a_conflict() {
    let app = test_app();
    call(&app, "POST", UNITS, Some(json!({"unit": "kg"}))).await;
    call(&app, "POST", UNITS, Some(json!({"unit": "pcs"}))).await;

    let (status, body) = call(&app, "PUT", &format!("{}/1", UNITS), Some(json!({"unit": "kg"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "unit": "kg"}));

    let (status, body) = call(&app, "PUT", &format!("{}/1", UNITS), Some(json!({"unit": "pcs"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"unit": ["Already exists."]}}));

    let (status, body) = call(&app, "PUT", &format!("{}/1", UNITS), Some(json!({"unit": "g"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "unit": "g"}));
}

#[tokio::test]
async fn unknown_ids_are_not_found_for_every_item_verb() {
    let app = test_app();
    let uri = format!("{}/42", UNITS);
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "unit 42 not found"}));

    // existence wins over an invalid body
    let (status, _) = call(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for method in ["GET", "DELETE"] {
        let (status, _) = call(&app, method, &format!("{}/abc", UNITS), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn ids_in_payloads_are_ignored() {
    let app = test_app();
    let (_, body) = call(&app, "POST", UNITS, Some(json!({"id": 99, "unit": "kg"}))).await;
    assert_eq!(body["id"], json!(1));
    let (_, body) = call(&app, "PUT", &format!("{}/1", UNITS), Some(json!({"id": 7, "unit": "g"}))).await;
    assert_eq!(body["id"], json!(1));
    let (status, _) = call(&app, "GET", &format!("{}/7", UNITS), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies() {
    let app = test_app();
    let (status, body) = call(&app, "POST", UNITS, Some(json!(["kg"]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"_schema": ["Invalid input type."]}}));

    let (status, body) = call(&app, "POST", UNITS, Some(json!({"unit": "x".repeat(21)}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": {"unit": ["Longer than maximum length 20."]}}));

    let (status, _) = call(&app, "POST", UNITS, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_of_one_unit_admit_a_single_winner() {
    let app = test_app();
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { call(&app, "POST", UNITS, Some(json!({"unit": "kg"}))).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        if status == StatusCode::OK {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body, json!({"message": {"unit": ["Already exists."]}}));
        }
    }
    assert_eq!(created, 1);

    let (_, body) = call(&app, "GET", UNITS, None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn ids_have_one_spelling() {
    let app = test_app();
    call(&app, "POST", UNITS, Some(json!({"unit": "kg"}))).await;
    let (status, _) = call(&app, "GET", &format!("{}/1", UNITS), None).await;
    assert_eq!(status, StatusCode::OK);
    for alias in ["+1", "01"] {
        let (status, _) = call(&app, "GET", &format!("{}/{}", UNITS, alias), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{alias}");
    }
}
