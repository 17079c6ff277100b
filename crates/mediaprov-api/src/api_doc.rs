//! OpenAPI documentation

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mediaprov_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediaprov API",
        version = "0.1.0",
        description = "Provisioning functions for a media services account: encoding and analysis transforms, empty assets, and blob container housekeeping. Operations under /api require the function key when one is configured."
    ),
    paths(
        handlers::transform::create_transform,
        handlers::asset::create_empty_asset,
        handlers::asset::delete_asset,
        handlers::container::delete_container,
        handlers::container::move_blobs,
        handlers::health::health,
    ),
    components(schemas(
        models::CreateTransformRequest,
        models::BuiltInPresetSelector,
        models::VideoAnalyzerSelector,
        models::CreateTransformResponse,
        models::CreateEmptyAssetRequest,
        models::CreateEmptyAssetResponse,
        models::DeleteAssetRequest,
        models::MessageResponse,
        models::DeleteContainerRequest,
        models::DeleteContainerResponse,
        models::MoveBlobsRequest,
        models::MoveBlobsResponse,
        models::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "transforms", description = "Encoding and analysis transforms"),
        (name = "assets", description = "Media assets"),
        (name = "containers", description = "Blob containers"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
