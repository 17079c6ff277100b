//! Azure Media Services management API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mediaprov_core::models::{
    Asset, AssetCreateBody, AssetParams, Transform, TransformCreateBody,
    TransformCreateProperties, TransformOutput, TransformRef,
};
use mediaprov_core::{Config, MediaServicesScope};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::control_plane::{AssetStore, ControlPlaneError, ControlPlaneResult, MediaControlPlane};
use crate::credential::CredentialProvider;

/// Management API version the wire types are written against
pub const API_VERSION: &str = "2018-07-01";

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// REST client for transforms and assets of one management endpoint
#[derive(Clone)]
pub struct ArmMediaServicesClient {
    http_client: reqwest::Client,
    arm_endpoint: String,
    credential: Arc<dyn CredentialProvider>,
}

impl ArmMediaServicesClient {
    pub fn new(
        http_client: reqwest::Client,
        arm_endpoint: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http_client,
            arm_endpoint: arm_endpoint.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn from_config(
        config: &Config,
        http_client: reqwest::Client,
        credential: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self::new(http_client, config.arm_endpoint(), credential)
    }

    /// HTTP client shared by the management API and the token endpoint
    pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, anyhow::Error> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
    }

    fn resource_url(&self, scope: &MediaServicesScope, collection: &str, name: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.arm_endpoint,
            scope.account_path(),
            collection,
            urlencoding::encode(name)
        )
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ControlPlaneResult<Response> {
        let token = self.credential.bearer_token().await?;

        let mut request = self
            .http_client
            .request(method, url)
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))
    }

    async fn get_resource<T: DeserializeOwned>(&self, url: &str) -> ControlPlaneResult<Option<T>> {
        let response = self.send::<()>(Method::GET, url, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))
    }

    async fn put_resource<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> ControlPlaneResult<T> {
        let response = self.send(Method::PUT, url, Some(body)).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))
    }
}

/// Map an error response to a control-plane error.
async fn error_from_response(response: Response) -> ControlPlaneError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error.code, body.error.message),
        Err(_) => (
            status
                .canonical_reason()
                .unwrap_or("UnknownError")
                .replace(' ', ""),
            text,
        ),
    };

    match status {
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            ControlPlaneError::Conflict { code, message }
        }
        _ => ControlPlaneError::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

#[async_trait]
impl MediaControlPlane for ArmMediaServicesClient {
    #[tracing::instrument(skip(self, scope), fields(
        azure.service.name = "media",
        azure.media.operation = "GetTransform",
        account = %scope.account_name
    ))]
    async fn get_transform(
        &self,
        scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<TransformRef>> {
        let url = self.resource_url(scope, "transforms", name);
        self.get_resource(&url).await
    }

    #[tracing::instrument(skip(self, scope, outputs), fields(
        azure.service.name = "media",
        azure.media.operation = "CreateOrUpdateTransform",
        account = %scope.account_name,
        output_count = outputs.len()
    ))]
    async fn create_or_update_transform(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        outputs: &[TransformOutput],
        description: &str,
    ) -> ControlPlaneResult<Transform> {
        let start = std::time::Instant::now();
        let url = self.resource_url(scope, "transforms", name);
        let body = TransformCreateBody {
            properties: TransformCreateProperties {
                description,
                outputs,
            },
        };

        let result = self.put_resource(&url, &body).await;
        let duration = start.elapsed().as_secs_f64();
        match &result {
            Ok(_) => tracing::info!(duration_ms = duration * 1000.0, "Transform submitted"),
            Err(e) => tracing::warn!(
                error = %e,
                duration_ms = duration * 1000.0,
                "Transform submission failed"
            ),
        }
        result
    }
}

#[async_trait]
impl AssetStore for ArmMediaServicesClient {
    #[tracing::instrument(skip(self, scope, params), fields(
        azure.service.name = "media",
        azure.media.operation = "CreateOrUpdateAsset",
        account = %scope.account_name
    ))]
    async fn create_or_update_asset(
        &self,
        scope: &MediaServicesScope,
        name: &str,
        params: &AssetParams,
    ) -> ControlPlaneResult<Asset> {
        let url = self.resource_url(scope, "assets", name);
        self.put_resource(&url, &AssetCreateBody { properties: params })
            .await
    }

    #[tracing::instrument(skip(self, scope), fields(
        azure.service.name = "media",
        azure.media.operation = "GetAsset",
        account = %scope.account_name
    ))]
    async fn get_asset(
        &self,
        scope: &MediaServicesScope,
        name: &str,
    ) -> ControlPlaneResult<Option<Asset>> {
        let url = self.resource_url(scope, "assets", name);
        self.get_resource(&url).await
    }

    #[tracing::instrument(skip(self, scope), fields(
        azure.service.name = "media",
        azure.media.operation = "DeleteAsset",
        account = %scope.account_name
    ))]
    async fn delete_asset(&self, scope: &MediaServicesScope, name: &str) -> ControlPlaneResult<()> {
        let url = self.resource_url(scope, "assets", name);
        let response = self.send::<()>(Method::DELETE, &url, None).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
