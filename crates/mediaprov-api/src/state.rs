//! Application state shared by the handlers

use mediaprov_core::Config;
use mediaprov_services::{
    AssetService, AssetStore, BlobStore, ContainerService, MediaControlPlane,
    TransformProvisioner,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub transforms: TransformProvisioner,
    pub assets: AssetService,
    pub containers: ContainerService,
}

impl AppState {
    pub fn new(
        config: Config,
        control_plane: Arc<dyn MediaControlPlane>,
        asset_store: Arc<dyn AssetStore>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        let scope = config.scope().clone();
        Self {
            transforms: TransformProvisioner::new(control_plane, scope.clone()),
            assets: AssetService::new(asset_store, scope),
            containers: ContainerService::new(blob_store),
            config,
        }
    }
}
