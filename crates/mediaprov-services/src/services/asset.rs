use std::sync::Arc;

use mediaprov_core::models::AssetParams;
use mediaprov_core::validation::new_asset_name;
use mediaprov_core::{AppError, MediaServicesScope};

use crate::control_plane::AssetStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAsset {
    pub asset_name: String,
    pub asset_id: String,
}

/// Asset lifecycle operations
#[derive(Clone)]
pub struct AssetService {
    assets: Arc<dyn AssetStore>,
    scope: MediaServicesScope,
}

impl AssetService {
    pub fn new(assets: Arc<dyn AssetStore>, scope: MediaServicesScope) -> Self {
        Self { assets, scope }
    }

    /// Create an empty asset whose name and container derive from `prefix`.
    #[tracing::instrument(skip(self), fields(account = %self.scope.account_name))]
    pub async fn create_empty_asset(
        &self,
        prefix: &str,
        storage_account: Option<String>,
    ) -> Result<CreatedAsset, AppError> {
        let (asset_name, asset_guid) = new_asset_name(prefix)?;
        let params = AssetParams::named(&asset_name, storage_account);

        let asset = self
            .assets
            .create_or_update_asset(&self.scope, &asset_name, &params)
            .await?;

        // Older API versions echo no assetId; the GUID we generated stands in
        let asset_id = asset
            .properties
            .asset_id
            .unwrap_or_else(|| asset_guid.to_string());

        tracing::info!(asset_name = %asset_name, asset_id = %asset_id, "Asset created");

        Ok(CreatedAsset {
            asset_name,
            asset_id,
        })
    }

    /// Delete an asset, failing with `NotFound` when it does not exist.
    #[tracing::instrument(skip(self), fields(account = %self.scope.account_name))]
    pub async fn delete_asset(&self, asset_name: &str) -> Result<(), AppError> {
        if self.assets.get_asset(&self.scope, asset_name).await?.is_none() {
            return Err(AppError::NotFound(format!("Asset {} not found", asset_name)));
        }

        self.assets.delete_asset(&self.scope, asset_name).await?;
        tracing::info!(asset_name = %asset_name, "Asset deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockMediaServices;
    use mediaprov_core::ErrorMetadata;

    fn service(mock: &MockMediaServices) -> AssetService {
        AssetService::new(
            Arc::new(mock.clone()),
            MediaServicesScope::new("sub-1", "rg-media", "amsacct"),
        )
    }

    #[tokio::test]
    async fn test_create_empty_asset_uses_sanitized_name() {
        let mock = MockMediaServices::new();
        let created = service(&mock)
            .create_empty_asset("My Clip.mp4", Some("amsstore".to_string()))
            .await
            .unwrap();

        assert!(created.asset_name.starts_with("asset-myclipmp4-"));
        assert!(!created.asset_id.is_empty());

        let stored = mock.asset(&created.asset_name).unwrap();
        assert_eq!(
            stored.properties.container.as_deref(),
            Some(created.asset_name.as_str())
        );
        assert_eq!(
            stored.properties.storage_account_name.as_deref(),
            Some("amsstore")
        );
    }

    #[tokio::test]
    async fn test_symbol_only_prefix_creates_nothing() {
        let mock = MockMediaServices::new();
        let err = service(&mock)
            .create_empty_asset("!!!", None)
            .await
            .unwrap_err();

        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_asset() {
        let mock = MockMediaServices::new();
        let err = service(&mock).delete_asset("ghost").await.unwrap_err();
        assert_eq!(err.client_message(), "Asset ghost not found");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(mock.delete_asset_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_existing_asset() {
        let mock = MockMediaServices::new();
        let service = service(&mock);
        let created = service.create_empty_asset("clip", None).await.unwrap();

        service.delete_asset(&created.asset_name).await.unwrap();
        assert!(mock.asset(&created.asset_name).is_none());
        assert_eq!(mock.delete_asset_calls(), 1);
    }
}
