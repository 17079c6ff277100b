use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use mediaprov_core::models::{CreateTransformRequest, CreateTransformResponse};
use serde_json::Value;
use std::sync::Arc;

/// Create a transform unless one with the same name already exists.
///
/// The body is validated as a whole so that missing fields produce the
/// operation's own messages rather than a deserialization error.
#[utoipa::path(
    post,
    path = "/api/create_transform",
    tag = "transforms",
    request_body = CreateTransformRequest,
    responses(
        (status = 200, description = "Transform exists or was created", body = CreateTransformResponse),
        (status = 400, description = "Invalid request or media API error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid function key", body = ErrorResponse),
        (status = 409, description = "Concurrent create of the same name", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(operation = "create_transform"))]
pub async fn create_transform(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<Json<CreateTransformResponse>, HttpAppError> {
    let provisioned = state.transforms.provision_raw(&body).await?;

    tracing::info!(
        transform_id = %provisioned.transform_id,
        outcome = ?provisioned.outcome,
        "Transform provisioned"
    );

    Ok(Json(CreateTransformResponse {
        transform_id: provisioned.transform_id,
    }))
}
