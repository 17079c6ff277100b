//! Mediaprov Services Layer
//!
//! This crate is the service layer: the management API client and its
//! credentials, and the provisioning services built on top of the control
//! plane and blob store seams. Keep orchestration here; keep HTTP handling
//! in mediaprov-api.

pub mod control_plane;
pub mod credential;
pub mod media_services;
pub mod services;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use control_plane::{
    AssetStore, ControlPlaneError, ControlPlaneResult, MediaControlPlane,
};
pub use credential::{
    create_credential, ClientSecretCredential, CredentialError, CredentialProvider,
    StaticTokenCredential,
};
pub use media_services::ArmMediaServicesClient;
pub use mediaprov_storage::{
    create_blob_store, BlobBackend, BlobStore, BlobStoreError, BlobStoreResult, Container,
};
pub use services::{
    AssetService, ContainerService, CreatedAsset, ProvisionOutcome, ProvisionedTransform,
    TransformProvisioner,
};
