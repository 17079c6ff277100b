//! Test doubles for the control plane and the blob store

mod mock_blob_store;
mod mock_media_services;

pub use mock_blob_store::{BlobOp, MockBlobStore};
pub use mock_media_services::MockMediaServices;
