//! In-memory blob store that records the order of operations

use async_trait::async_trait;
use mediaprov_core::BlobBackend;
use mediaprov_storage::{BlobItem, BlobStore, BlobStoreError, BlobStoreResult, Container};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobOp {
    List(String),
    Copy {
        source: String,
        destination: String,
        count: usize,
    },
    DeleteContainer(String),
}

#[derive(Default)]
struct BlobState {
    containers: BTreeMap<String, BTreeSet<String>>,
    operations: Vec<BlobOp>,
}

#[derive(Clone, Default)]
pub struct MockBlobStore {
    state: Arc<Mutex<BlobState>>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&self, name: &str, blobs: &[&str]) {
        self.state.lock().unwrap().containers.insert(
            name.to_string(),
            blobs.iter().map(|b| b.to_string()).collect(),
        );
    }

    /// Sorted blob names, or `None` if the container does not exist
    pub fn blob_names(&self, container: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .containers
            .get(container)
            .map(|blobs| blobs.iter().cloned().collect())
    }

    pub fn operations(&self) -> Vec<BlobOp> {
        self.state.lock().unwrap().operations.clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn list_blobs(&self, container: &Container) -> BlobStoreResult<Vec<BlobItem>> {
        let mut state = self.state.lock().unwrap();
        let blobs = state
            .containers
            .get(container.name())
            .ok_or_else(|| BlobStoreError::ContainerNotFound(container.name().to_string()))?
            .iter()
            .map(|name| BlobItem {
                name: name.clone(),
                size: 0,
            })
            .collect();
        state
            .operations
            .push(BlobOp::List(container.name().to_string()));
        Ok(blobs)
    }

    async fn copy_blobs(
        &self,
        source: &Container,
        destination: &Container,
        names: &[String],
    ) -> BlobStoreResult<usize> {
        let mut state = self.state.lock().unwrap();

        let source_blobs = state
            .containers
            .get(source.name())
            .ok_or_else(|| BlobStoreError::ContainerNotFound(source.name().to_string()))?;
        if let Some(missing) = names.iter().find(|n| !source_blobs.contains(*n)) {
            return Err(BlobStoreError::NotFound(format!(
                "{}/{}",
                source.name(),
                missing
            )));
        }

        let target = state
            .containers
            .get_mut(destination.name())
            .ok_or_else(|| BlobStoreError::ContainerNotFound(destination.name().to_string()))?;
        target.extend(names.iter().cloned());

        state.operations.push(BlobOp::Copy {
            source: source.name().to_string(),
            destination: destination.name().to_string(),
            count: names.len(),
        });
        Ok(names.len())
    }

    async fn delete_container(&self, container: &Container) -> BlobStoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.containers.remove(container.name()).is_none() {
            return Err(BlobStoreError::ContainerNotFound(
                container.name().to_string(),
            ));
        }
        state
            .operations
            .push(BlobOp::DeleteContainer(container.name().to_string()));
        Ok(())
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Local
    }
}
