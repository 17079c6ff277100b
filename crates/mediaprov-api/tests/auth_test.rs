//! Function-key and ambient route tests.
//!
//! Run with: `cargo test -p mediaprov-api --test auth_test`

mod helpers;

use helpers::{setup_test_app, setup_test_app_with_key, TEST_FUNCTION_KEY};
use mediaprov_api::ErrorResponse;
use mediaprov_core::models::HealthResponse;
use serde_json::json;

fn transform_body() -> serde_json::Value {
    json!({
        "transformName": "t1",
        "builtInStandardEncoderPreset": { "presetName": "H264MultipleBitrate720p" }
    })
}

#[tokio::test]
async fn test_missing_function_key_is_401() {
    let app = setup_test_app_with_key();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&transform_body())
        .await;

    assert_eq!(response.status_code(), 401);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "UNAUTHORIZED");
    assert_eq!(app.media.total_calls(), 0);
}

#[tokio::test]
async fn test_wrong_function_key_is_401() {
    let app = setup_test_app_with_key();

    let response = app
        .client()
        .post("/api/create_transform")
        .add_header("x-functions-key", "nope")
        .json(&transform_body())
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_function_key_in_header() {
    let app = setup_test_app_with_key();

    let response = app
        .client()
        .post("/api/create_transform")
        .add_header("x-functions-key", TEST_FUNCTION_KEY)
        .json(&transform_body())
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_function_key_in_query() {
    let app = setup_test_app_with_key();

    let response = app
        .client()
        .post("/api/create_transform")
        .add_query_param("code", TEST_FUNCTION_KEY)
        .json(&transform_body())
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_health_is_open() {
    let app = setup_test_app_with_key();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.blob_backend, "local");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "req-123")
        .await;

    assert_eq!(response.header("X-Request-ID"), "req-123");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    let id = response.header("X-Request-ID");
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let doc: serde_json::Value = response.json();
    assert!(doc["paths"]["/api/move_blobs"].is_object());
}
