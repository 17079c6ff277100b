use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use mediaprov_core::models::{
    CreateEmptyAssetRequest, CreateEmptyAssetResponse, DeleteAssetRequest, MessageResponse,
};
use mediaprov_core::validation::require_field;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/create_empty_asset",
    tag = "assets",
    request_body = CreateEmptyAssetRequest,
    responses(
        (status = 200, description = "Asset created", body = CreateEmptyAssetResponse),
        (status = 400, description = "Invalid request or media API error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid function key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_empty_asset"))]
pub async fn create_empty_asset(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateEmptyAssetRequest>,
) -> Result<Json<CreateEmptyAssetResponse>, HttpAppError> {
    let prefix = require_field(
        request.asset_name_prefix,
        "Please pass assetNamePrefix in the input object",
    )?;
    let storage_account = request
        .asset_storage_account
        .filter(|account| !account.trim().is_empty());

    let created = state
        .assets
        .create_empty_asset(&prefix, storage_account)
        .await?;

    Ok(Json(CreateEmptyAssetResponse {
        asset_name: created.asset_name,
        asset_id: created.asset_id,
    }))
}

#[utoipa::path(
    post,
    path = "/api/delete_asset",
    tag = "assets",
    request_body = DeleteAssetRequest,
    responses(
        (status = 200, description = "Asset deleted", body = MessageResponse),
        (status = 400, description = "Invalid request, unknown asset or media API error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid function key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "delete_asset"))]
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteAssetRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let asset_name = require_field(
        request.destination_container,
        "Please pass destinationContainer in the input object",
    )?;

    state.assets.delete_asset(&asset_name).await?;

    Ok(Json(MessageResponse {
        message: format!("Asset {} deleted", asset_name),
    }))
}
