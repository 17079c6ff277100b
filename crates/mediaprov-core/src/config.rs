//! Configuration module
//!
//! Configuration is read from the environment exactly once at process start
//! and passed by reference into the services and blob store. Nothing below
//! the API bootstrap looks up environment variables on its own.

use std::env;

use crate::models::MediaServicesScope;
use crate::storage_types::BlobBackend;

const SERVER_PORT: u16 = 7071;
const HTTP_TIMEOUT_SECS: u64 = 60;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_ARM_RESOURCE: &str = "https://management.core.windows.net/";
const DEFAULT_AAD_ENDPOINT: &str = "https://login.microsoftonline.com";

/// HTTP surface settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub function_key: Option<String>,
    pub max_request_body_bytes: usize,
    pub http_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

/// Control-plane account scope and credentials
#[derive(Clone, Debug)]
pub struct MediaServicesConfig {
    pub scope: MediaServicesScope,
    pub arm_endpoint: String,
    pub arm_resource: String,
    pub aad_endpoint: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Pre-issued bearer token; bypasses the client-credentials grant.
    pub access_token: Option<String>,
}

/// Blob store settings
#[derive(Clone, Debug)]
pub struct BlobConfig {
    pub backend: BlobBackend,
    pub storage_account_name: Option<String>,
    pub storage_account_key: Option<String>,
    pub blob_endpoint: Option<String>,
    pub local_root: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FunctionAppConfig {
    pub base: BaseConfig,
    pub media_services: MediaServicesConfig,
    pub blob: BlobConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FunctionAppConfig>);

impl Config {
    fn inner(&self) -> &FunctionAppConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = FunctionAppConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn function_key(&self) -> Option<&str> {
        self.inner().base.function_key.as_deref()
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.inner().base.max_request_body_bytes
    }

    pub fn http_timeout_secs(&self) -> u64 {
        self.inner().base.http_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn json_logs(&self) -> bool {
        self.inner().base.json_logs
    }

    pub fn scope(&self) -> &MediaServicesScope {
        &self.inner().media_services.scope
    }

    pub fn arm_endpoint(&self) -> &str {
        &self.inner().media_services.arm_endpoint
    }

    pub fn arm_resource(&self) -> &str {
        &self.inner().media_services.arm_resource
    }

    pub fn aad_endpoint(&self) -> &str {
        &self.inner().media_services.aad_endpoint
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.inner().media_services.tenant_id.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.inner().media_services.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.inner().media_services.client_secret.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.inner().media_services.access_token.as_deref()
    }

    pub fn blob_backend(&self) -> BlobBackend {
        self.inner().blob.backend
    }

    pub fn storage_account_name(&self) -> Option<&str> {
        self.inner().blob.storage_account_name.as_deref()
    }

    pub fn storage_account_key(&self) -> Option<&str> {
        self.inner().blob.storage_account_key.as_deref()
    }

    /// Blob service endpoint; defaults to the public endpoint of the account.
    pub fn blob_endpoint(&self) -> Option<String> {
        self.inner().blob.blob_endpoint.clone().or_else(|| {
            self.storage_account_name()
                .map(|account| format!("https://{}.blob.core.windows.net", account))
        })
    }

    pub fn local_blob_root(&self) -> Option<&str> {
        self.inner().blob.local_root.as_deref()
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} must be set", key))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

impl FunctionAppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: match lookup("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            environment,
            function_key: optional(&lookup, "FUNCTION_KEY"),
            max_request_body_bytes: lookup("MAX_REQUEST_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_REQUEST_BODY_BYTES),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            json_logs: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let media_services = MediaServicesConfig {
            scope: MediaServicesScope::new(
                required(&lookup, "AZURE_SUBSCRIPTION_ID")?,
                required(&lookup, "AZURE_RESOURCE_GROUP")?,
                required(&lookup, "AZURE_MEDIA_SERVICES_ACCOUNT_NAME")?,
            ),
            arm_endpoint: optional(&lookup, "AZURE_ARM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ARM_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            arm_resource: optional(&lookup, "AZURE_ARM_RESOURCE")
                .unwrap_or_else(|| DEFAULT_ARM_RESOURCE.to_string()),
            aad_endpoint: optional(&lookup, "AZURE_AAD_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_AAD_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            tenant_id: optional(&lookup, "AZURE_TENANT_ID"),
            client_id: optional(&lookup, "AZURE_CLIENT_ID"),
            client_secret: optional(&lookup, "AZURE_CLIENT_SECRET"),
            access_token: optional(&lookup, "AZURE_ACCESS_TOKEN"),
        };

        let backend = match optional(&lookup, "BLOB_BACKEND") {
            Some(value) => value.parse()?,
            None => BlobBackend::Azure,
        };

        let blob = BlobConfig {
            backend,
            storage_account_name: optional(&lookup, "MEDIA_SERVICES_STORAGE_ACCOUNT_NAME"),
            storage_account_key: optional(&lookup, "MEDIA_SERVICES_STORAGE_ACCOUNT_KEY"),
            blob_endpoint: optional(&lookup, "BLOB_ENDPOINT")
                .map(|s| s.trim_end_matches('/').to_string()),
            local_root: optional(&lookup, "LOCAL_BLOB_ROOT"),
        };

        Ok(FunctionAppConfig {
            base,
            media_services,
            blob,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let ms = &self.media_services;
        if ms.access_token.is_none()
            && (ms.tenant_id.is_none() || ms.client_id.is_none() || ms.client_secret.is_none())
        {
            return Err(anyhow::anyhow!(
                "Either AZURE_ACCESS_TOKEN or AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET must be set"
            ));
        }

        match self.blob.backend {
            BlobBackend::Azure => {
                if self.blob.storage_account_name.is_none()
                    || self.blob.storage_account_key.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "MEDIA_SERVICES_STORAGE_ACCOUNT_NAME and MEDIA_SERVICES_STORAGE_ACCOUNT_KEY must be set for the azure blob backend"
                    ));
                }
            }
            BlobBackend::Local => {
                if self.blob.local_root.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_BLOB_ROOT must be set for the local blob backend"
                    ));
                }
            }
        }

        if self.base.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS cannot be 0"));
        }

        if self.base.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_BODY_BYTES cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SCOPE: [(&str, &str); 3] = [
        ("AZURE_SUBSCRIPTION_ID", "00000000-0000-0000-0000-000000000001"),
        ("AZURE_RESOURCE_GROUP", "media-rg"),
        ("AZURE_MEDIA_SERVICES_ACCOUNT_NAME", "amsacct"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(vars(&SCOPE)).unwrap();
        assert_eq!(config.server_port(), 7071);
        assert_eq!(config.arm_endpoint(), "https://management.azure.com");
        assert_eq!(config.blob_backend(), BlobBackend::Azure);
        assert_eq!(config.scope().account_name, "amsacct");
        assert!(!config.is_production());
        assert_eq!(config.http_concurrency_limit(), 1_000);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_surface_settings_come_from_lookup() {
        let mut pairs = SCOPE.to_vec();
        pairs.extend([
            ("APP_ENV", "Prod"),
            ("HTTP_CONCURRENCY_LIMIT", "0"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let config = Config::from_lookup(vars(&pairs)).unwrap();
        assert!(config.is_production());
        assert_eq!(config.http_concurrency_limit(), 1);
        assert!(config.json_logs());

        let mut pairs = SCOPE.to_vec();
        pairs.extend([("ENVIRONMENT", "staging"), ("HTTP_CONCURRENCY_LIMIT", "64")]);
        let config = Config::from_lookup(vars(&pairs)).unwrap();
        assert!(!config.is_production());
        assert_eq!(config.http_concurrency_limit(), 64);
    }

    #[test]
    fn test_missing_scope_is_rejected() {
        let err = Config::from_lookup(vars(&[("AZURE_RESOURCE_GROUP", "rg")])).unwrap_err();
        assert!(err.to_string().contains("AZURE_SUBSCRIPTION_ID"));
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config::from_lookup(vars(&SCOPE)).unwrap();
        assert!(config.validate().is_err());

        let mut pairs = SCOPE.to_vec();
        pairs.extend([
            ("AZURE_ACCESS_TOKEN", "token"),
            ("MEDIA_SERVICES_STORAGE_ACCOUNT_NAME", "amsstore"),
            ("MEDIA_SERVICES_STORAGE_ACCOUNT_KEY", "a2V5"),
        ]);
        let config = Config::from_lookup(vars(&pairs)).unwrap();
        config.validate().unwrap();
        assert_eq!(
            config.blob_endpoint().as_deref(),
            Some("https://amsstore.blob.core.windows.net")
        );
    }

    #[test]
    fn test_local_backend_requires_root() {
        let mut pairs = SCOPE.to_vec();
        pairs.extend([("AZURE_ACCESS_TOKEN", "token"), ("BLOB_BACKEND", "local")]);
        let config = Config::from_lookup(vars(&pairs)).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = SCOPE.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert!(Config::from_lookup(vars(&pairs)).is_err());
    }
}
