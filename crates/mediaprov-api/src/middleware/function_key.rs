//! Function-key authorization
//!
//! When a key is configured every protected route requires it, either in the
//! `x-functions-key` header or in the `code` query parameter.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediaprov_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";
const FUNCTION_KEY_QUERY: &str = "code";

/// The configured key, if any
#[derive(Debug, Clone, Default)]
pub struct FunctionKey(pub Option<String>);

/// Constant-time string comparison
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn key_from_query(request: &Request) -> Option<String> {
    request.uri().query()?.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name != FUNCTION_KEY_QUERY {
            return None;
        }
        urlencoding::decode(value).ok().map(|v| v.into_owned())
    })
}

fn presented_key(request: &Request) -> Option<String> {
    request
        .headers()
        .get(FUNCTION_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| key_from_query(request))
}

pub async fn function_key_middleware(
    State(expected): State<Arc<FunctionKey>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected.0.as_deref() else {
        return next.run(request).await;
    };

    match presented_key(&request) {
        Some(key) if constant_time_eq(&key, expected) => next.run(request).await,
        Some(_) => {
            tracing::debug!(path = %request.uri().path(), "Invalid function key");
            HttpAppError(AppError::Unauthorized("Invalid function key".to_string()))
                .into_response()
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Missing function key");
            HttpAppError(AppError::Unauthorized(
                "A function key is required for this operation".to_string(),
            ))
            .into_response()
        }
    }
}
