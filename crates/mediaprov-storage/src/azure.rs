use crate::shared_key::{
    encode_blob_path, ms_date_now, SharedKeySigner, SignableRequest, BLOB_API_VERSION,
};
use crate::traits::{BlobItem, BlobStore, BlobStoreError, BlobStoreResult, Container};
use crate::BlobBackend;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::ObjectStore;
use reqwest::{Method, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

const COPY_POLL_MAX_ATTEMPTS: u32 = 300;
const COPY_POLL_MAX_DELAY_SECS: u64 = 5;

/// Azure Blob Storage backend
///
/// Listing goes through `object_store`; server-side copy and container
/// deletion, which `object_store` does not expose, are Shared Key signed
/// REST calls.
#[derive(Clone)]
pub struct AzureBlobStore {
    http_client: reqwest::Client,
    signer: SharedKeySigner,
    account_key: String,
    endpoint: String,
}

impl AzureBlobStore {
    pub fn new(
        account: impl Into<String>,
        account_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> BlobStoreResult<Self> {
        let account_key = account_key.into();
        let signer = SharedKeySigner::new(account, &account_key)?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlobStoreError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(AzureBlobStore {
            http_client,
            signer,
            account_key,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn container_store(&self, container: &Container) -> BlobStoreResult<MicrosoftAzure> {
        MicrosoftAzureBuilder::new()
            .with_account(self.signer.account())
            .with_access_key(self.account_key.clone())
            .with_container_name(container.name())
            .with_endpoint(self.endpoint.clone())
            .build()
            .map_err(|e| {
                BlobStoreError::ConfigError(format!("Failed to build Azure object store: {}", e))
            })
    }

    fn blob_url(&self, container: &Container, blob_name: &str) -> (String, String) {
        let path = format!("/{}/{}", container.name(), encode_blob_path(blob_name));
        (format!("{}{}", self.endpoint, path), path)
    }

    /// Send a signed request with an empty body.
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        extra_headers: &[(&str, &str)],
    ) -> BlobStoreResult<Response> {
        let is_put = method == Method::PUT;
        let date = ms_date_now();
        let mut ms_headers: Vec<(&str, &str)> =
            vec![("x-ms-date", date.as_str()), ("x-ms-version", BLOB_API_VERSION)];
        ms_headers.extend_from_slice(extra_headers);

        let authorization = self.signer.authorization(&SignableRequest {
            method: method.as_str(),
            path,
            query,
            ms_headers: &ms_headers,
            ..Default::default()
        })?;

        let mut request = self
            .http_client
            .request(method, format!("{}{}", self.endpoint, path))
            .query(query)
            .header("Authorization", authorization);
        for (name, value) in &ms_headers {
            request = request.header(*name, *value);
        }
        if is_put {
            request = request.header("Content-Length", "0");
        }

        request
            .send()
            .await
            .map_err(|e| BlobStoreError::Transport(e.to_string()))
    }

    /// Start a server-side copy and wait for it to finish.
    #[tracing::instrument(skip(self), fields(
        azure.service.name = "blob",
        azure.blob.operation = "CopyBlob",
        source = %source.name(),
        destination = %destination.name(),
        blob = %blob_name
    ))]
    async fn copy_blob(
        &self,
        source: &Container,
        destination: &Container,
        blob_name: &str,
    ) -> BlobStoreResult<()> {
        let (source_url, _) = self.blob_url(source, blob_name);
        let (_, destination_path) = self.blob_url(destination, blob_name);

        let response = self
            .send_signed(
                Method::PUT,
                &destination_path,
                &[],
                &[("x-ms-copy-source", source_url.as_str())],
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The PUT targets the destination; a missing container there is the common 404
            return Err(error_from_response(response, destination.name()).await);
        }

        match copy_status(&response).as_deref() {
            Some("success") => return Ok(()),
            Some("pending") | None => {}
            Some(other) => {
                return Err(BlobStoreError::CopyFailed(format!(
                    "Copy of {} finished with status {}",
                    blob_name, other
                )))
            }
        }

        self.poll_copy(&destination_path, blob_name).await
    }

    async fn poll_copy(&self, destination_path: &str, blob_name: &str) -> BlobStoreResult<()> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            // Back off: 1s, 2s, ... capped at 5s
            let delay_secs = (attempts as u64).min(COPY_POLL_MAX_DELAY_SECS);
            sleep(Duration::from_secs(delay_secs)).await;

            let response = self
                .send_signed(Method::HEAD, destination_path, &[], &[])
                .await?;
            if !response.status().is_success() {
                return Err(error_from_response(response, blob_name).await);
            }

            match copy_status(&response).as_deref() {
                Some("success") | None => {
                    tracing::debug!(blob = %blob_name, attempts, "Blob copy completed");
                    return Ok(());
                }
                Some("pending") => {
                    if attempts >= COPY_POLL_MAX_ATTEMPTS {
                        return Err(BlobStoreError::CopyFailed(format!(
                            "Copy of {} still pending after {} attempts",
                            blob_name, COPY_POLL_MAX_ATTEMPTS
                        )));
                    }
                }
                Some(other) => {
                    let description = response
                        .headers()
                        .get("x-ms-copy-status-description")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("no description");
                    return Err(BlobStoreError::CopyFailed(format!(
                        "Copy of {} finished with status {}: {}",
                        blob_name, other, description
                    )));
                }
            }
        }
    }
}

fn copy_status(response: &Response) -> Option<String> {
    response
        .headers()
        .get("x-ms-copy-status")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase())
}

/// Map a failed blob service response to a store error.
async fn error_from_response(response: Response, resource: &str) -> BlobStoreError {
    let status = response.status();
    let code = response
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match (status, code.as_str()) {
        (StatusCode::NOT_FOUND, "ContainerNotFound") => {
            BlobStoreError::ContainerNotFound(resource.to_string())
        }
        (StatusCode::NOT_FOUND, _) => BlobStoreError::NotFound(resource.to_string()),
        _ => BlobStoreError::BackendError(format!(
            "Blob service returned {} {} for {}: {}",
            status.as_u16(),
            code,
            resource,
            body
        )),
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    #[tracing::instrument(skip(self), fields(
        azure.service.name = "blob",
        azure.blob.operation = "ListBlobs",
        container = %container.name()
    ))]
    async fn list_blobs(&self, container: &Container) -> BlobStoreResult<Vec<BlobItem>> {
        let start = std::time::Instant::now();
        let store = self.container_store(container)?;

        let result: Result<Vec<_>, _> = store.list(None).try_collect().await;
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(objects) => {
                let blobs: Vec<BlobItem> = objects
                    .into_iter()
                    .map(|meta| BlobItem {
                        name: meta.location.to_string(),
                        size: meta.size,
                    })
                    .collect();
                tracing::info!(
                    blob_count = blobs.len(),
                    duration_ms = duration * 1000.0,
                    "Azure blob listing successful"
                );
                Ok(blobs)
            }
            Err(object_store::Error::NotFound { .. }) => {
                Err(BlobStoreError::ContainerNotFound(container.name().to_string()))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = duration * 1000.0,
                    "Azure blob listing failed"
                );
                Err(BlobStoreError::ListFailed(e.to_string()))
            }
        }
    }

    async fn copy_blobs(
        &self,
        source: &Container,
        destination: &Container,
        names: &[String],
    ) -> BlobStoreResult<usize> {
        let start = std::time::Instant::now();

        let copies = names
            .iter()
            .map(|name| self.copy_blob(source, destination, name));
        futures::future::try_join_all(copies).await?;

        tracing::info!(
            source = %source.name(),
            destination = %destination.name(),
            blob_count = names.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure blob copy successful"
        );

        Ok(names.len())
    }

    #[tracing::instrument(skip(self), fields(
        azure.service.name = "blob",
        azure.blob.operation = "DeleteContainer",
        container = %container.name()
    ))]
    async fn delete_container(&self, container: &Container) -> BlobStoreResult<()> {
        let start = std::time::Instant::now();
        let path = format!("/{}", container.name());

        let response = self
            .send_signed(Method::DELETE, &path, &[("restype", "container")], &[])
            .await?;

        let duration = start.elapsed().as_secs_f64();
        if response.status().is_success() {
            tracing::info!(duration_ms = duration * 1000.0, "Azure container delete successful");
            return Ok(());
        }

        let err = error_from_response(response, container.name()).await;
        let err = match err {
            BlobStoreError::NotFound(name) => BlobStoreError::ContainerNotFound(name),
            other => other,
        };
        tracing::error!(
            error = %err,
            duration_ms = duration * 1000.0,
            "Azure container delete failed"
        );
        Err(err)
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Azure
    }
}
