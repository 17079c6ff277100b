//! Mediaprov Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! validation shared by every mediaprov component, together with the preset
//! catalog and the encoding ladder builder.

pub mod config;
pub mod error;
pub mod ladder;
pub mod models;
pub mod presets;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, BlobConfig, Config, FunctionAppConfig, MediaServicesConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ladder::{TransformRecipe, ANALYSIS_DESCRIPTION, ENCODING_DESCRIPTION};
pub use models::MediaServicesScope;
pub use presets::{EncoderNamedPreset, PresetNotFound};
pub use storage_types::BlobBackend;
pub use validation::{SupportedLanguage, TransformRequest, TransformSelector};
