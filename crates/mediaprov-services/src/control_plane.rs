//! Media control-plane seams
//!
//! The provisioning services only see these traits; the ARM REST client and
//! the in-memory test doubles implement them.

use async_trait::async_trait;
use mediaprov_core::models::{Asset, AssetParams, Transform, TransformOutput, TransformRef};
use mediaprov_core::{AppError, MediaServicesScope};

use crate::credential::CredentialError;

#[derive(Debug, thiserror::Error)]
pub enum ControlPlaneError {
    /// The control plane answered with an error body
    #[error("Media API call error: {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// A create raced with another writer of the same resource
    #[error("Conflict: {code}: {message}")]
    Conflict { code: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

impl From<ControlPlaneError> for AppError {
    fn from(err: ControlPlaneError) -> Self {
        match err {
            ControlPlaneError::Api { code, message, .. } => AppError::Api { code, message },
            ControlPlaneError::Conflict { code, message } => {
                AppError::Conflict(format!("{}: {}", code, message))
            }
            ControlPlaneError::Transport(msg) => AppError::Transport(msg),
            ControlPlaneError::InvalidResponse(msg) => AppError::Internal(msg),
            ControlPlaneError::Credential(err) => err.into(),
        }
    }
}

/// Transform operations of the media control plane
#[async_trait]
pub trait MediaControlPlane: Send + Sync {
    /// `None` when no transform with this name exists in the account
    async fn get_transform(
        &self,
        scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<TransformRef>>;

    async fn create_or_update_transform(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        outputs: &[TransformOutput],
        description: &str,
    ) -> ControlPlaneResult<Transform>;
}

/// Asset operations of the media control plane
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn create_or_update_asset(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        params: &AssetParams,
    ) -> ControlPlaneResult<Asset>;

    async fn get_asset(
        &self,
        scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<Asset>>;

    async fn delete_asset(&self, scope: &MediaServicesScope, name: &str)
        -> ControlPlaneResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaprov_core::ErrorMetadata;

    #[test]
    fn test_conflict_maps_to_retryable_app_error() {
        let err: AppError = ControlPlaneError::Conflict {
            code: "Conflict".to_string(),
            message: "Transform t1 is being created".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_api_error_keeps_vendor_code() {
        let err: AppError = ControlPlaneError::Api {
            status: 403,
            code: "AuthorizationFailed".to_string(),
            message: "denied".to_string(),
        }
        .into();
        assert_eq!(
            err.client_message(),
            "Media API call error: AuthorizationFailed: denied"
        );
    }

    #[test]
    fn test_credential_transport_is_transport() {
        let err: AppError =
            ControlPlaneError::from(CredentialError::Transport("dns".to_string())).into();
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }
}
