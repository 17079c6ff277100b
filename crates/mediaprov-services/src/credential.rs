//! Bearer tokens for the management API
//!
//! [`ClientSecretCredential`] runs the Azure AD client-credentials grant and
//! keeps the token until shortly before it expires. [`StaticTokenCredential`]
//! hands out a token obtained elsewhere.

use async_trait::async_trait;
use mediaprov_core::{AppError, Config};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Token request failed: {0}")]
    Transport(String),

    #[error("Token request rejected: {code}: {message}")]
    Rejected { code: String, message: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Credential configuration error: {0}")]
    Config(String),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Transport(msg) => AppError::Transport(msg),
            CredentialError::Rejected { code, message } => AppError::Api { code, message },
            CredentialError::InvalidResponse(_) | CredentialError::Config(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// A bearer token valid for the management API
    async fn bearer_token(&self) -> Result<String, CredentialError>;
}

/// A fixed token, typically from `az account get-access-token`.
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenCredential {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .checked_duration_since(Instant::now())
            .is_some_and(|left| left > REFRESH_MARGIN)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(deserialize_with = "seconds_from_string_or_number")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// The v1 token endpoint returns `expires_in` as a string.
fn seconds_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Number(n) => Ok(n),
        Seconds::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Azure AD client-credentials grant with an in-process token cache
pub struct ClientSecretCredential {
    http_client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    resource: String,
    cache: RwLock<Option<CachedToken>>,
}

impl ClientSecretCredential {
    pub fn new(
        http_client: reqwest::Client,
        aad_endpoint: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            token_url: format!(
                "{}/{}/oauth2/token",
                aad_endpoint.trim_end_matches('/'),
                tenant_id
            ),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: resource.into(),
            cache: RwLock::new(None),
        }
    }

    #[tracing::instrument(skip(self), fields(client_id = %self.client_id))]
    async fn request_token(&self) -> Result<CachedToken, CredentialError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("resource", self.resource.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CredentialError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::Transport(e.to_string()))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => (
                    err.error,
                    err.error_description
                        .unwrap_or_else(|| "no description".to_string()),
                ),
                Err(_) => (status.as_u16().to_string(), body),
            };
            tracing::warn!(code = %code, "Token request rejected");
            return Err(CredentialError::Rejected { code, message });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| CredentialError::InvalidResponse(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "Acquired management API token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl CredentialProvider for ClientSecretCredential {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

/// Create the credential provider described by the configuration
pub fn create_credential(
    config: &Config,
    http_client: reqwest::Client,
) -> Result<Arc<dyn CredentialProvider>, CredentialError> {
    if let Some(token) = config.access_token() {
        return Ok(Arc::new(StaticTokenCredential::new(token)));
    }

    let missing = |name: &str| CredentialError::Config(format!("{} not configured", name));
    let tenant_id = config.tenant_id().ok_or_else(|| missing("AZURE_TENANT_ID"))?;
    let client_id = config.client_id().ok_or_else(|| missing("AZURE_CLIENT_ID"))?;
    let client_secret = config
        .client_secret()
        .ok_or_else(|| missing("AZURE_CLIENT_SECRET"))?;

    Ok(Arc::new(ClientSecretCredential::new(
        http_client,
        config.aad_endpoint(),
        tenant_id,
        client_id,
        client_secret,
        config.arm_resource(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn credential(server_url: &str) -> ClientSecretCredential {
        ClientSecretCredential::new(
            reqwest::Client::new(),
            server_url,
            "tenant-1",
            "client-1",
            "secret-1",
            "https://management.core.windows.net/",
        )
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tenant-1/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
                Matcher::UrlEncoded(
                    "resource".into(),
                    "https://management.core.windows.net/".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"Bearer","expires_in":"3599","access_token":"tok-1"}"#)
            .expect(1)
            .create_async()
            .await;

        let credential = credential(&server.url());
        assert_eq!(credential.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(credential.bearer_token().await.unwrap(), "tok-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_near_expiry_is_refreshed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tenant-1/oauth2/token")
            .with_status(200)
            .with_body(r#"{"expires_in":120,"access_token":"short-lived"}"#)
            .expect(2)
            .create_async()
            .await;

        let credential = credential(&server.url());
        credential.bearer_token().await.unwrap();
        credential.bearer_token().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_grant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/tenant-1/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret"}"#)
            .create_async()
            .await;

        let err = credential(&server.url()).bearer_token().await.unwrap_err();
        match err {
            CredentialError::Rejected { code, message } => {
                assert_eq!(code, "invalid_client");
                assert!(message.starts_with("AADSTS7000215"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_static_token() {
        let credential = StaticTokenCredential::new("fixed");
        assert_eq!(credential.bearer_token().await.unwrap(), "fixed");
    }
}
