//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that every container backend
//! implements. Operations work on whole containers and on blob names inside
//! them; blob contents never pass through this service.

use crate::BlobBackend;
use async_trait::async_trait;
use mediaprov_core::AppError;
use thiserror::Error;

/// Blob store operation errors
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid container name: {0}")]
    InvalidName(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Request to blob service failed: {0}")]
    Transport(String),

    #[error("Blob backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for blob store operations
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

impl From<BlobStoreError> for AppError {
    fn from(err: BlobStoreError) -> Self {
        match err {
            BlobStoreError::ContainerNotFound(name) => {
                AppError::NotFound(format!("Container {} not found", name))
            }
            BlobStoreError::NotFound(name) => AppError::NotFound(format!("Blob {} not found", name)),
            BlobStoreError::InvalidName(msg) => AppError::Validation(msg),
            BlobStoreError::Transport(msg) => AppError::Transport(msg),
            BlobStoreError::ListFailed(msg)
            | BlobStoreError::CopyFailed(msg)
            | BlobStoreError::DeleteFailed(msg)
            | BlobStoreError::BackendError(msg)
            | BlobStoreError::ConfigError(msg) => AppError::Internal(msg),
            BlobStoreError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        }
    }
}

/// A reference to a blob container. Holding one does not imply the
/// container exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
}

impl Container {
    /// Validate `name` against the blob service's container naming rules:
    /// 3 to 63 characters of lowercase letters, digits and single hyphens,
    /// starting and ending with a letter or digit.
    pub fn new(name: &str) -> BlobStoreResult<Self> {
        let name = name.trim();
        let invalid = |reason: &str| BlobStoreError::InvalidName(format!("'{}': {}", name, reason));

        if name.len() < 3 || name.len() > 63 {
            return Err(invalid("must be between 3 and 63 characters"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid(
                "only lowercase letters, digits and hyphens are allowed",
            ));
        }
        if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
            return Err(invalid(
                "hyphens must be preceded and followed by a letter or digit",
            ));
        }

        Ok(Container {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A blob listed in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobItem {
    /// Full blob name, including any virtual directory prefix
    pub name: String,
    pub size: u64,
}

/// Blob store abstraction trait
///
/// All container backends (Azure Blob, local filesystem) implement this
/// trait so the services can move and delete containers without knowing
/// where they live.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Get a reference to a container by name
    fn get_container(&self, name: &str) -> BlobStoreResult<Container> {
        Container::new(name)
    }

    /// List every blob in the container (flat, no delimiter)
    async fn list_blobs(&self, container: &Container) -> BlobStoreResult<Vec<BlobItem>>;

    /// Copy the named blobs from `source` into `destination` under the same
    /// names. Returns once every copy has completed.
    async fn copy_blobs(
        &self,
        source: &Container,
        destination: &Container,
        names: &[String],
    ) -> BlobStoreResult<usize>;

    /// Delete the container and everything in it
    async fn delete_container(&self, container: &Container) -> BlobStoreResult<()>;

    /// Get the blob backend type
    fn backend_type(&self) -> BlobBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name_rules() {
        assert!(Container::new("asset-clip-6f9619ff").is_ok());
        assert!(Container::new("abc").is_ok());
        assert!(Container::new("ab").is_err());
        assert!(Container::new("Upper").is_err());
        assert!(Container::new("-leading").is_err());
        assert!(Container::new("double--hyphen").is_err());
        assert!(Container::new("../escape").is_err());
        assert!(Container::new(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_errors_map_to_app_errors() {
        use mediaprov_core::ErrorMetadata;

        let err: AppError = BlobStoreError::ContainerNotFound("media-out".into()).into();
        assert_eq!(err.client_message(), "Container media-out not found");
        assert_eq!(err.http_status_code(), 400);

        let err: AppError = BlobStoreError::InvalidName("bad".into()).into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err: AppError = BlobStoreError::CopyFailed("aborted".into()).into();
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_container_name_is_trimmed() {
        assert_eq!(Container::new(" media-in ").unwrap().name(), "media-in");
    }
}
