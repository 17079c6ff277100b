//! Input validation and name sanitization

pub mod asset_name;
pub mod transform_request;

pub use asset_name::{asset_name, new_asset_name};
pub use transform_request::{validate, SupportedLanguage, TransformRequest, TransformSelector};

use crate::error::AppError;

/// Require a non-blank string field, failing with `message` otherwise.
pub fn require_field(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some(" c1 ".into()), "missing").unwrap(), "c1");
        assert!(matches!(
            require_field(Some("".into()), "missing"),
            Err(AppError::Validation(msg)) if msg == "missing"
        ));
        assert!(require_field(None, "missing").is_err());
    }
}
