//! Request and response bodies of the HTTP operations
//!
//! Required fields are `Option` so that their absence is reported with the
//! operation's own message instead of a generic deserialization error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `create_transform`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransformRequest {
    /// Name of the transform, unique within the account
    pub transform_name: Option<String>,
    /// Built-in encoder preset selector
    pub built_in_standard_encoder_preset: Option<BuiltInPresetSelector>,
    /// Content-analysis selector
    pub video_analyzer_preset: Option<VideoAnalyzerSelector>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuiltInPresetSelector {
    /// One of the catalog preset names (default: `AdaptiveStreaming`)
    pub preset_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalyzerSelector {
    /// Whether to only extract audio insights
    #[serde(default)]
    pub audio_insights_only: bool,
    /// BCP-47 language of the audio track, e.g. `en-US`
    pub audio_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransformResponse {
    /// Resource id of the transform
    pub transform_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmptyAssetRequest {
    /// Free-form prefix; sanitized into the asset name
    pub asset_name_prefix: Option<String>,
    /// Attached storage account to create the asset in
    pub asset_storage_account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmptyAssetResponse {
    pub asset_name: String,
    pub asset_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssetRequest {
    /// Name of the asset to delete
    pub destination_container: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContainerRequest {
    pub container_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContainerResponse {
    pub container_name: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveBlobsRequest {
    /// Container the blobs are moved into
    pub input_container: Option<String>,
    /// Container the blobs are moved out of; deleted afterwards
    pub output_container: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveBlobsResponse {
    pub moved_blobs: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub blob_backend: String,
}
