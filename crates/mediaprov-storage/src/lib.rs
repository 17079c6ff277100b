//! Mediaprov Storage Library
//!
//! This crate provides the blob container abstraction used by the container
//! operations: the BlobStore trait, an Azure Blob Storage backend and a local
//! filesystem backend for development.
//!
//! # Container and blob names
//!
//! Container names follow the blob service rules (3 to 63 characters,
//! lowercase letters, digits and single hyphens) on every backend, so a name
//! accepted locally is also valid in Azure. Blob names are flat strings that
//! may contain `/` as a virtual directory separator.

#[cfg(feature = "storage-azure")]
pub mod azure;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-azure")]
pub mod shared_key;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStore;
pub use factory::create_blob_store;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
pub use mediaprov_core::BlobBackend;
pub use traits::{BlobItem, BlobStore, BlobStoreError, BlobStoreResult, Container};
