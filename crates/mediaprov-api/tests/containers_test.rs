//! Container API integration tests.
//!
//! Run with: `cargo test -p mediaprov-api --test containers_test`

mod helpers;

use helpers::setup_test_app;
use mediaprov_api::ErrorResponse;
use mediaprov_core::models::{DeleteContainerResponse, MoveBlobsResponse};
use mediaprov_services::test_helpers::BlobOp;
use serde_json::json;

#[tokio::test]
async fn test_delete_container() {
    let app = setup_test_app();
    app.blobs.add_container("uploads-01", &["a.mp4"]);

    let response = app
        .client()
        .post("/api/delete_container")
        .json(&json!({ "containerName": "uploads-01" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: DeleteContainerResponse = response.json();
    assert_eq!(body.container_name, "uploads-01");
    assert!(body.deleted);
    assert!(app.blobs.blob_names("uploads-01").is_none());
}

#[tokio::test]
async fn test_delete_missing_container() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/delete_container")
        .json(&json!({ "containerName": "missing" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_container_requires_name() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/delete_container")
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(
        body.error,
        "Please pass the \"containerName\" property in the input object"
    );
}

#[tokio::test]
async fn test_invalid_container_name_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/delete_container")
        .json(&json!({ "containerName": "Bad_Name" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
    assert!(app.blobs.operations().is_empty());
}

#[tokio::test]
async fn test_move_blobs_from_output_into_input() {
    let app = setup_test_app();
    app.blobs.add_container("encoded-out", &["a.mp4", "b.mp4", "dir/c.json"]);
    app.blobs.add_container("ingest-in", &[]);

    let response = app
        .client()
        .post("/api/move_blobs")
        .json(&json!({ "inputContainer": "ingest-in", "outputContainer": "encoded-out" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: MoveBlobsResponse = response.json();
    assert_eq!(body.moved_blobs, 3);
    assert_eq!(
        app.blobs.blob_names("ingest-in").unwrap(),
        vec!["a.mp4", "b.mp4", "dir/c.json"]
    );
    assert!(app.blobs.blob_names("encoded-out").is_none());

    // Source is deleted only after the copy
    assert_eq!(
        app.blobs.operations(),
        vec![
            BlobOp::List("encoded-out".to_string()),
            BlobOp::Copy {
                source: "encoded-out".to_string(),
                destination: "ingest-in".to_string(),
                count: 3,
            },
            BlobOp::DeleteContainer("encoded-out".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_move_blobs_requires_both_containers() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/move_blobs")
        .json(&json!({ "inputContainer": "ingest-in" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(
        body.error,
        "Please pass the output container name in the input object"
    );

    let response = app
        .client()
        .post("/api/move_blobs")
        .json(&json!({ "outputContainer": "encoded-out" }))
        .await;
    let body: ErrorResponse = response.json();
    assert_eq!(
        body.error,
        "Please pass the input container name in the input object"
    );
}

#[tokio::test]
async fn test_move_into_missing_destination_keeps_source() {
    let app = setup_test_app();
    app.blobs.add_container("encoded-out", &["a.mp4"]);

    let response = app
        .client()
        .post("/api/move_blobs")
        .json(&json!({ "inputContainer": "ingest-in", "outputContainer": "encoded-out" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        app.blobs.blob_names("encoded-out").unwrap(),
        vec!["a.mp4"]
    );
}
