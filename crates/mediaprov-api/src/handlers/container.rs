use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use mediaprov_core::models::{
    DeleteContainerRequest, DeleteContainerResponse, MoveBlobsRequest, MoveBlobsResponse,
};
use mediaprov_core::validation::require_field;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/delete_container",
    tag = "containers",
    request_body = DeleteContainerRequest,
    responses(
        (status = 200, description = "Container deleted", body = DeleteContainerResponse),
        (status = 400, description = "Invalid name or unknown container", body = ErrorResponse),
        (status = 401, description = "Missing or invalid function key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "delete_container"))]
pub async fn delete_container(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteContainerRequest>,
) -> Result<Json<DeleteContainerResponse>, HttpAppError> {
    let container_name = require_field(
        request.container_name,
        "Please pass the \"containerName\" property in the input object",
    )?;

    state.containers.delete_container(&container_name).await?;

    Ok(Json(DeleteContainerResponse {
        container_name,
        deleted: true,
    }))
}

/// Move every blob of `outputContainer` into `inputContainer`, then delete
/// `outputContainer`.
#[utoipa::path(
    post,
    path = "/api/move_blobs",
    tag = "containers",
    request_body = MoveBlobsRequest,
    responses(
        (status = 200, description = "Blobs moved and source deleted", body = MoveBlobsResponse),
        (status = 400, description = "Invalid names or unknown container", body = ErrorResponse),
        (status = 401, description = "Missing or invalid function key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "move_blobs"))]
pub async fn move_blobs(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<MoveBlobsRequest>,
) -> Result<Json<MoveBlobsResponse>, HttpAppError> {
    let destination = require_field(
        request.input_container,
        "Please pass the input container name in the input object",
    )?;
    let source = require_field(
        request.output_container,
        "Please pass the output container name in the input object",
    )?;

    let moved_blobs = state.containers.move_blobs(&source, &destination).await?;

    Ok(Json(MoveBlobsResponse { moved_blobs }))
}
