#[cfg(feature = "storage-azure")]
use crate::AzureBlobStore;
#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
use crate::{BlobBackend, BlobStore, BlobStoreError, BlobStoreResult};
use mediaprov_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_blob_store(config: &Config) -> BlobStoreResult<Arc<dyn BlobStore>> {
    match config.blob_backend() {
        #[cfg(feature = "storage-azure")]
        BlobBackend::Azure => {
            let account = config.storage_account_name().ok_or_else(|| {
                BlobStoreError::ConfigError(
                    "MEDIA_SERVICES_STORAGE_ACCOUNT_NAME not configured".to_string(),
                )
            })?;
            let key = config.storage_account_key().ok_or_else(|| {
                BlobStoreError::ConfigError(
                    "MEDIA_SERVICES_STORAGE_ACCOUNT_KEY not configured".to_string(),
                )
            })?;
            let endpoint = config.blob_endpoint().ok_or_else(|| {
                BlobStoreError::ConfigError("BLOB_ENDPOINT not configured".to_string())
            })?;

            let store = AzureBlobStore::new(
                account,
                key,
                endpoint,
                std::time::Duration::from_secs(config.http_timeout_secs()),
            )?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-azure"))]
        BlobBackend::Azure => Err(BlobStoreError::ConfigError(
            "Azure blob backend not available (storage-azure feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        BlobBackend::Local => {
            let root = config.local_blob_root().ok_or_else(|| {
                BlobStoreError::ConfigError("LOCAL_BLOB_ROOT not configured".to_string())
            })?;

            let store = LocalBlobStore::new(root).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        BlobBackend::Local => Err(BlobStoreError::ConfigError(
            "Local blob backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
