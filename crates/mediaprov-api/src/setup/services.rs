//! Collaborator wiring

use crate::state::AppState;
use anyhow::{Context, Result};
use mediaprov_core::Config;
use mediaprov_services::{create_blob_store, create_credential, ArmMediaServicesClient};
use std::sync::Arc;
use std::time::Duration;

/// Build the credential, the management API client and the blob store.
pub async fn initialize_services(config: &Config) -> Result<AppState> {
    let http_client =
        ArmMediaServicesClient::build_http_client(Duration::from_secs(config.http_timeout_secs()))?;

    let credential = create_credential(config, http_client.clone())
        .context("Failed to configure media services credentials")?;

    let client = Arc::new(ArmMediaServicesClient::from_config(
        config,
        http_client,
        credential,
    ));
    tracing::info!(arm_endpoint = %config.arm_endpoint(), "Media services client ready");

    let blob_store = create_blob_store(config)
        .await
        .context("Failed to initialize blob store")?;
    tracing::info!(backend = %blob_store.backend_type(), "Blob store ready");

    Ok(AppState::new(
        config.clone(),
        client.clone(),
        client,
        blob_store,
    ))
}
