use crate::traits::{BlobItem, BlobStore, BlobStoreError, BlobStoreResult, Container};
use crate::BlobBackend;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Local filesystem blob store
///
/// Each container is a directory directly under the root; blob names map to
/// relative file paths inside it, with `/` as the separator.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at `base_path` (created if missing)
    pub async fn new(base_path: impl Into<PathBuf>) -> BlobStoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            BlobStoreError::ConfigError(format!(
                "Failed to create blob root {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore { base_path })
    }

    /// Create a container directory. The blob service has no counterpart in
    /// this crate; containers there are created by the control plane.
    pub async fn create_container(&self, name: &str) -> BlobStoreResult<Container> {
        let container = Container::new(name)?;
        fs::create_dir_all(self.container_path(&container)).await?;
        Ok(container)
    }

    fn container_path(&self, container: &Container) -> PathBuf {
        self.base_path.join(container.name())
    }

    async fn existing_container_path(&self, container: &Container) -> BlobStoreResult<PathBuf> {
        let path = self.container_path(container);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(BlobStoreError::ContainerNotFound(container.name().to_string()));
        }
        Ok(path)
    }

    /// Convert a blob name to a path inside the container directory,
    /// rejecting names that would escape it.
    fn blob_path(container_path: &Path, blob_name: &str) -> BlobStoreResult<PathBuf> {
        if blob_name.is_empty() || blob_name.starts_with('/') || blob_name.contains('\\') {
            return Err(BlobStoreError::InvalidName(format!(
                "Invalid blob name '{}'",
                blob_name
            )));
        }

        let relative = Path::new(blob_name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(BlobStoreError::InvalidName(format!(
                "Blob name '{}' resolves outside its container",
                blob_name
            )));
        }

        Ok(container_path.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn list_blobs(&self, container: &Container) -> BlobStoreResult<Vec<BlobItem>> {
        let root = self.existing_container_path(container).await?;
        let mut blobs = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| {
                BlobStoreError::ListFailed(format!("Failed to read {}: {}", dir.display(), e))
            })?;

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let relative = path.strip_prefix(&root).map_err(|e| {
                    BlobStoreError::ListFailed(format!("Unexpected path {}: {}", path.display(), e))
                })?;
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let size = entry.metadata().await?.len();

                blobs.push(BlobItem { name, size });
            }
        }

        blobs.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            container = %container.name(),
            blob_count = blobs.len(),
            "Local blob listing complete"
        );

        Ok(blobs)
    }

    async fn copy_blobs(
        &self,
        source: &Container,
        destination: &Container,
        names: &[String],
    ) -> BlobStoreResult<usize> {
        let source_root = self.existing_container_path(source).await?;
        let destination_root = self.existing_container_path(destination).await?;
        let start = std::time::Instant::now();

        for name in names {
            let from = Self::blob_path(&source_root, name)?;
            let to = Self::blob_path(&destination_root, name)?;

            if !fs::try_exists(&from).await.unwrap_or(false) {
                return Err(BlobStoreError::NotFound(format!(
                    "{}/{}",
                    source.name(),
                    name
                )));
            }

            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::copy(&from, &to).await.map_err(|e| {
                BlobStoreError::CopyFailed(format!(
                    "Failed to copy {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            source = %source.name(),
            destination = %destination.name(),
            blob_count = names.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob copy successful"
        );

        Ok(names.len())
    }

    async fn delete_container(&self, container: &Container) -> BlobStoreResult<()> {
        let path = self.existing_container_path(container).await?;

        fs::remove_dir_all(&path).await.map_err(|e| {
            BlobStoreError::DeleteFailed(format!(
                "Failed to delete container {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(container = %container.name(), "Local container deleted");
        Ok(())
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Local
    }
}
