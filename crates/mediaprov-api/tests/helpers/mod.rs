//! Test helpers: build AppState and router over in-memory doubles.
//!
//! Run from workspace root: `cargo test -p mediaprov-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use mediaprov_api::setup::routes;
use mediaprov_api::AppState;
use mediaprov_core::Config;
use mediaprov_services::test_helpers::{MockBlobStore, MockMediaServices};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_FUNCTION_KEY: &str = "test-function-key";

/// Test application: server plus handles on the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub media: MockMediaServices,
    pub blobs: MockBlobStore,
    pub config: Config,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(function_key: Option<&str>) -> Config {
    test_config_with(function_key, &[])
}

/// Test configuration with additional variables layered on top
pub fn test_config_with(function_key: Option<&str>, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("AZURE_SUBSCRIPTION_ID", "00000000-0000-0000-0000-000000000001"),
        ("AZURE_RESOURCE_GROUP", "media-rg"),
        ("AZURE_MEDIA_SERVICES_ACCOUNT_NAME", "mediaacct"),
        ("AZURE_ACCESS_TOKEN", "test-token"),
        ("BLOB_BACKEND", "local"),
        ("LOCAL_BLOB_ROOT", "/tmp/mediaprov-test"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    if let Some(key) = function_key {
        vars.insert("FUNCTION_KEY".to_string(), key.to_string());
    }
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_lookup(move |key| vars.get(key).cloned()).expect("valid test config")
}

pub fn setup_test_app() -> TestApp {
    build_app(test_config(None))
}

pub fn setup_test_app_with_key() -> TestApp {
    build_app(test_config(Some(TEST_FUNCTION_KEY)))
}

pub fn setup_test_app_with_env(extra: &[(&str, &str)]) -> TestApp {
    build_app(test_config_with(None, extra))
}

fn build_app(config: Config) -> TestApp {
    let media = MockMediaServices::new();
    let blobs = MockBlobStore::new();

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(media.clone()),
        Arc::new(media.clone()),
        Arc::new(blobs.clone()),
    ));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        media,
        blobs,
        config,
    }
}
