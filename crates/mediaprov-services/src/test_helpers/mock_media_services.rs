//! In-memory control plane
//!
//! Stores transforms and assets in maps and counts every call so tests can
//! assert which external operations were (or were not) made.

use async_trait::async_trait;
use mediaprov_core::models::{
    Asset, AssetParams, AssetProperties, Transform, TransformOutput, TransformProperties,
    TransformRef,
};
use mediaprov_core::MediaServicesScope;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::control_plane::{AssetStore, ControlPlaneError, ControlPlaneResult, MediaControlPlane};

#[derive(Default)]
struct MockState {
    transforms: HashMap<String, Transform>,
    assets: HashMap<String, Asset>,
    get_transform_calls: usize,
    create_transform_calls: usize,
    get_asset_calls: usize,
    create_asset_calls: usize,
    delete_asset_calls: usize,
    conflict_next_create: bool,
    lookup_failure: Option<(String, String)>,
}

/// Mock media services account for testing without a network
#[derive(Clone, Default)]
pub struct MockMediaServices {
    state: Arc<Mutex<MockState>>,
}

impl MockMediaServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transform(&self, scope: &MediaServicesScope, name: &str) -> Transform {
        let transform = Transform {
            id: format!("{}/transforms/{}", scope.account_path(), name),
            name: name.to_string(),
            properties: TransformProperties::default(),
        };
        self.state
            .lock()
            .unwrap()
            .transforms
            .insert(name.to_string(), transform.clone());
        transform
    }

    pub fn transform(&self, name: &str) -> Option<Transform> {
        self.state.lock().unwrap().transforms.get(name).cloned()
    }

    pub fn asset(&self, name: &str) -> Option<Asset> {
        self.state.lock().unwrap().assets.get(name).cloned()
    }

    /// The next transform submission fails as if another writer won the race.
    pub fn fail_next_create_with_conflict(&self) {
        self.state.lock().unwrap().conflict_next_create = true;
    }

    /// Every lookup fails with the given API error.
    pub fn fail_lookups_with(&self, code: &str, message: &str) {
        self.state.lock().unwrap().lookup_failure = Some((code.to_string(), message.to_string()));
    }

    pub fn get_transform_calls(&self) -> usize {
        self.state.lock().unwrap().get_transform_calls
    }

    pub fn create_transform_calls(&self) -> usize {
        self.state.lock().unwrap().create_transform_calls
    }

    pub fn delete_asset_calls(&self) -> usize {
        self.state.lock().unwrap().delete_asset_calls
    }

    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.get_transform_calls
            + state.create_transform_calls
            + state.get_asset_calls
            + state.create_asset_calls
            + state.delete_asset_calls
    }

    fn lookup_failure(state: &MockState) -> ControlPlaneResult<()> {
        match &state.lookup_failure {
            Some((code, message)) => Err(ControlPlaneError::Api {
                status: 403,
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaControlPlane for MockMediaServices {
    async fn get_transform(
        &self,
        _scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<TransformRef>> {
        let mut state = self.state.lock().unwrap();
        state.get_transform_calls += 1;
        Self::lookup_failure(&state)?;
        Ok(state.transforms.get(name).map(TransformRef::from))
    }

    async fn create_or_update_transform(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        outputs: &[TransformOutput],
        description: &str,
    ) -> ControlPlaneResult<Transform> {
        let mut state = self.state.lock().unwrap();
        state.create_transform_calls += 1;

        if std::mem::take(&mut state.conflict_next_create) {
            return Err(ControlPlaneError::Conflict {
                code: "Conflict".to_string(),
                message: format!("Transform {} was modified concurrently", name),
            });
        }

        let transform = Transform {
            id: format!("{}/transforms/{}", scope.account_path(), name),
            name: name.to_string(),
            properties: TransformProperties {
                description: Some(description.to_string()),
                outputs: outputs.to_vec(),
                created: None,
                last_modified: None,
            },
        };
        state
            .transforms
            .insert(name.to_string(), transform.clone());
        Ok(transform)
    }
}

#[async_trait]
impl AssetStore for MockMediaServices {
    async fn create_or_update_asset(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        params: &AssetParams,
    ) -> ControlPlaneResult<Asset> {
        let mut state = self.state.lock().unwrap();
        state.create_asset_calls += 1;

        let asset = Asset {
            id: format!("{}/assets/{}", scope.account_path(), name),
            name: name.to_string(),
            properties: AssetProperties {
                asset_id: Some(Uuid::new_v4().to_string()),
                alternate_id: params.alternate_id.clone(),
                description: params.description.clone(),
                container: params.container.clone(),
                storage_account_name: params.storage_account_name.clone(),
                created: None,
                last_modified: None,
            },
        };
        state.assets.insert(name.to_string(), asset.clone());
        Ok(asset)
    }

    async fn get_asset(
        &self,
        _scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<Asset>> {
        let mut state = self.state.lock().unwrap();
        state.get_asset_calls += 1;
        Self::lookup_failure(&state)?;
        Ok(state.assets.get(name).cloned())
    }

    async fn delete_asset(&self, _scope: &MediaServicesScope, name: &str) -> ControlPlaneResult<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_asset_calls += 1;
        state.assets.remove(name);
        Ok(())
    }
}
