use std::sync::Arc;

use mediaprov_core::AppError;
use mediaprov_storage::BlobStore;

/// Blob container operations
#[derive(Clone)]
pub struct ContainerService {
    blobs: Arc<dyn BlobStore>,
}

impl ContainerService {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    pub fn blob_store(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_container(&self, container_name: &str) -> Result<(), AppError> {
        let container = self.blobs.get_container(container_name)?;
        self.blobs.delete_container(&container).await?;
        tracing::info!("Container deleted");
        Ok(())
    }

    /// Move every blob of `source_name` into `destination_name`, then delete
    /// the source container. The source is only deleted once all copies
    /// have completed. Returns the number of blobs moved.
    #[tracing::instrument(skip(self))]
    pub async fn move_blobs(
        &self,
        source_name: &str,
        destination_name: &str,
    ) -> Result<usize, AppError> {
        let source = self.blobs.get_container(source_name)?;
        let destination = self.blobs.get_container(destination_name)?;
        if source == destination {
            return Err(AppError::Validation(
                "Source and destination containers must differ".to_string(),
            ));
        }

        let names: Vec<String> = self
            .blobs
            .list_blobs(&source)
            .await?
            .into_iter()
            .map(|blob| blob.name)
            .collect();
        tracing::debug!(blob_count = names.len(), "Listed source blobs");

        let moved = self
            .blobs
            .copy_blobs(&source, &destination, &names)
            .await?;

        self.blobs.delete_container(&source).await?;

        tracing::info!(moved_blobs = moved, "Blobs moved");
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{BlobOp, MockBlobStore};
    use mediaprov_core::ErrorMetadata;

    #[tokio::test]
    async fn test_move_copies_everything_before_deleting_source() {
        let store = MockBlobStore::new();
        store.add_container("media-in", &[]);
        store.add_container("media-out", &["video-hd.mp4", "video-sd.mp4"]);
        let service = ContainerService::new(Arc::new(store.clone()));

        let moved = service.move_blobs("media-out", "media-in").await.unwrap();

        assert_eq!(moved, 2);
        assert_eq!(
            store.operations(),
            vec![
                BlobOp::List("media-out".to_string()),
                BlobOp::Copy {
                    source: "media-out".to_string(),
                    destination: "media-in".to_string(),
                    count: 2,
                },
                BlobOp::DeleteContainer("media-out".to_string()),
            ]
        );
        assert_eq!(
            store.blob_names("media-in").unwrap(),
            vec!["video-hd.mp4".to_string(), "video-sd.mp4".to_string()]
        );
        assert!(store.blob_names("media-out").is_none());
    }

    #[tokio::test]
    async fn test_failed_copy_keeps_source() {
        let store = MockBlobStore::new();
        store.add_container("media-out", &["video-hd.mp4"]);
        // destination missing, so the copy fails
        let service = ContainerService::new(Arc::new(store.clone()));

        let err = service.move_blobs("media-out", "media-in").await.unwrap_err();

        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(store.blob_names("media-out").is_some());
        assert!(!store
            .operations()
            .iter()
            .any(|op| matches!(op, BlobOp::DeleteContainer(_))));
    }

    #[tokio::test]
    async fn test_move_into_itself_is_rejected() {
        let store = MockBlobStore::new();
        store.add_container("media-out", &["a.mp4"]);
        let service = ContainerService::new(Arc::new(store.clone()));

        let err = service.move_blobs("media-out", "media-out").await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(store.operations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_container() {
        let store = MockBlobStore::new();
        store.add_container("media-out", &["a.mp4"]);
        let service = ContainerService::new(Arc::new(store.clone()));

        service.delete_container("media-out").await.unwrap();
        assert!(store.blob_names("media-out").is_none());

        let err = service.delete_container("media-out").await.unwrap_err();
        assert_eq!(err.client_message(), "Container media-out not found");
    }

    #[tokio::test]
    async fn test_invalid_container_name_is_validation_error() {
        let service = ContainerService::new(Arc::new(MockBlobStore::new()));
        let err = service.delete_container("Bad_Name").await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
