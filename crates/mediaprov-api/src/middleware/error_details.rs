//! Production redaction of error details
//!
//! Error responses carry their rendered `ErrorResponse` as a response
//! extension. In production the body is re-rendered without `details` and
//! `errorType`.

use crate::error::ErrorResponse;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Whether error details are withheld from clients
#[derive(Debug, Clone, Copy, Default)]
pub struct RedactErrorDetails(pub bool);

pub async fn redact_error_details_middleware(
    State(redact): State<RedactErrorDetails>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !redact.0 {
        return response;
    }

    let Some(mut body) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    if body.details.is_none() && body.error_type.is_none() {
        return response;
    }

    body.details = None;
    body.error_type = None;
    (response.status(), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpAppError;
    use axum::{body::to_bytes, http::StatusCode, routing::get, Router};
    use mediaprov_core::AppError;
    use tower::ServiceExt;

    fn app(redact: bool) -> Router {
        Router::new()
            .route(
                "/fail",
                get(|| async {
                    HttpAppError(AppError::Validation("transformName is blank".to_string()))
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                RedactErrorDetails(redact),
                redact_error_details_middleware,
            ))
    }

    async fn call(redact: bool) -> (StatusCode, ErrorResponse) {
        let response = app(redact)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/fail")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_details_kept_outside_production() {
        let (status, body) = call(false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.details.is_some());
        assert_eq!(body.error_type.as_deref(), Some("Validation"));
    }

    #[tokio::test]
    async fn test_details_removed_in_production() {
        let (status, body) = call(true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }
}
