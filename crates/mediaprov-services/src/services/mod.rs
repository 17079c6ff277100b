pub mod asset;
pub mod container;
pub mod transform;

pub use asset::{AssetService, CreatedAsset};
pub use container::ContainerService;
pub use transform::{ProvisionOutcome, ProvisionedTransform, TransformProvisioner};
