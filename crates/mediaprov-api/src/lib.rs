//! Mediaprov API Library
//!
//! HTTP handlers, middleware and application setup for the provisioning
//! functions.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod middleware;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
