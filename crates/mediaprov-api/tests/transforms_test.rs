//! Transform API integration tests.
//!
//! Run with: `cargo test -p mediaprov-api --test transforms_test`

mod helpers;

use helpers::setup_test_app;
use mediaprov_core::models::{CreateTransformResponse, Preset};
use mediaprov_api::ErrorResponse;
use serde_json::json;

#[tokio::test]
async fn test_create_transform_with_builtin_preset() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": "t1",
            "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: CreateTransformResponse = response.json();
    assert!(!body.transform_id.is_empty());
    assert!(body.transform_id.ends_with("/transforms/t1"));
    assert_eq!(app.media.create_transform_calls(), 1);
}

#[tokio::test]
async fn test_create_transform_twice_returns_same_id() {
    let app = setup_test_app();
    let request = json!({
        "transformName": "t1",
        "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
    });

    let first: CreateTransformResponse = app
        .client()
        .post("/api/create_transform")
        .json(&request)
        .await
        .json();
    let second: CreateTransformResponse = app
        .client()
        .post("/api/create_transform")
        .json(&request)
        .await
        .json();

    assert_eq!(first.transform_id, second.transform_id);
    assert_eq!(app.media.create_transform_calls(), 1);
    assert_eq!(app.media.get_transform_calls(), 2);
}

#[tokio::test]
async fn test_padded_name_is_not_matched_to_existing_transform() {
    let app = setup_test_app();
    app.media.add_transform(app.config.scope(), "t1");

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": " t1 ",
            "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.media.create_transform_calls(), 1);
    assert!(app.media.transform(" t1 ").is_some());
}

#[tokio::test]
async fn test_create_transform_without_preset_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({ "transformName": "t2" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
    assert_eq!(body.error, "Please pass preset in the input object");
    assert_eq!(app.media.total_calls(), 0);
}

#[tokio::test]
async fn test_create_transform_without_name_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Please pass transformName in the input object");
    assert_eq!(app.media.total_calls(), 0);
}

#[tokio::test]
async fn test_create_analysis_transform() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": "analysis",
            "videoAnalyzerPreset": { "audioInsightsOnly": true, "audioLanguage": "en-US" }
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let transform = app.media.transform("analysis").expect("transform stored");
    assert_eq!(transform.properties.outputs.len(), 1);
    assert!(matches!(
        transform.properties.outputs[0].preset,
        Preset::VideoAnalyzer(_)
    ));
}

#[tokio::test]
async fn test_unsupported_language_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": "analysis",
            "videoAnalyzerPreset": { "audioLanguage": "xx-XX" }
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.media.total_calls(), 0);
}

#[tokio::test]
async fn test_media_api_error_is_surfaced() {
    let app = setup_test_app();
    app.media
        .fail_lookups_with("AuthorizationFailed", "The client does not have access");

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": "t1",
            "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "API_ERROR");
    assert_eq!(
        body.error,
        "Media API call error: AuthorizationFailed: The client does not have access"
    );
}

#[tokio::test]
async fn test_concurrent_create_conflict_is_409() {
    let app = setup_test_app();
    app.media.fail_next_create_with_conflict();

    let response = app
        .client()
        .post("/api/create_transform")
        .json(&json!({
            "transformName": "t1",
            "builtInStandardEncoderPreset": { "presetName": "AdaptiveStreaming" }
        }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "CONFLICT");
    assert!(body.recoverable);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/create_transform")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
}
