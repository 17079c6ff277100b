//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::{
    function_key_middleware, redact_error_details_middleware, request_id_middleware, FunctionKey,
    RedactErrorDetails,
};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use mediaprov_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let function_key = Arc::new(FunctionKey(config.function_key().map(str::to_string)));
    if function_key.0.is_none() {
        tracing::warn!("FUNCTION_KEY not set; /api operations are open");
    }

    let api_routes = Router::new()
        .route(
            "/api/create_transform",
            post(handlers::transform::create_transform),
        )
        .route(
            "/api/create_empty_asset",
            post(handlers::asset::create_empty_asset),
        )
        .route("/api/delete_asset", post(handlers::asset::delete_asset))
        .route(
            "/api/delete_container",
            post(handlers::container::delete_container),
        )
        .route("/api/move_blobs", post(handlers::container::move_blobs))
        .layer(axum::middleware::from_fn_with_state(
            function_key,
            function_key_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    let app = public_routes
        .merge(api_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(axum::middleware::from_fn_with_state(
            RedactErrorDetails(config.is_production()),
            redact_error_details_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}
