// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for typed application configuration over HTTP.

#![cfg(feature = "http")]

mod common;

use common::{init_tracing, tree, FakeConfigServer};
use remcfg::domain::{validators, ConfigError, ConfigNode, ConfigRoot, Result, Settings};
use remcfg::service::{ApplicationConfigProvider, ClientSettings, ConfigSchema, FromSettings};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, PartialEq)]
struct SampleConfig {
    timeout: Duration,
    name: String,
    number: u32,
    rest_url: String,
    connection_string: String,
}

impl FromSettings for SampleConfig {
    fn from_settings(app: &Settings, env: &Settings) -> Result<Self> {
        Ok(SampleConfig {
            timeout: Duration::from_millis(app.get("TimeOut")?.as_u64("TimeOut")?),
            name: app.get("ConfigObject.Name")?.as_string(),
            number: app.get("ConfigObject.Number")?.as_u32("ConfigObject.Number")?,
            rest_url: env.get("RestUrl")?.as_string(),
            connection_string: env.get("ConnectionString")?.as_string(),
        })
    }
}

fn sample_app(timeout: Option<&str>, name: &str) -> ConfigRoot {
    let mut children = Vec::new();
    if let Some(timeout) = timeout {
        children.push(ConfigNode::leaf("TimeOut", timeout));
    }
    children.push(ConfigNode::branch(
        "ConfigObject",
        vec![
            ConfigNode::leaf("Name", name),
            ConfigNode::leaf("Number", "6"),
        ],
    ));
    ConfigRoot::new("sample.app", None, ConfigNode::branch("sample.app", children))
}

fn schema() -> ConfigSchema {
    ConfigSchema::new("sample.app")
        .application("TimeOut", validators::is_valid_integer)
        .application("ConfigObject.Name", validators::exists)
        .application("ConfigObject.Number", validators::is_valid_integer)
        .environment("RestUrl", validators::is_valid_url)
        .environment("ConnectionString", validators::exists)
}

fn provider(server: &FakeConfigServer, cache: &TempDir) -> ApplicationConfigProvider<SampleConfig> {
    let settings = ClientSettings::builder()
        .with_application_name("remcfg-tests")
        .with_base_url(server.base_url())
        .with_request_timeout(Duration::from_secs(5))
        .with_cache_dir(cache.path())
        .build()
        .unwrap();
    ApplicationConfigProvider::from_settings(schema(), &settings).unwrap()
}

fn serve_environment(server: &FakeConfigServer) {
    server.serve(&tree(
        "Environment",
        &[
            ("RestUrl", "http://fake"),
            ("ConnectionString", "Server=db;Database=app"),
        ],
    ));
}

#[test]
fn test_typed_configuration_is_built() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("500"), "Taco"));
    serve_environment(&server);

    let config = provider(&server, &cache).get_configuration().unwrap();

    assert_eq!(
        config,
        SampleConfig {
            timeout: Duration::from_millis(500),
            name: "Taco".to_string(),
            number: 6,
            rest_url: "http://fake".to_string(),
            connection_string: "Server=db;Database=app".to_string(),
        }
    );
    assert_eq!(
        server.requests(),
        vec!["sample.app".to_string(), "Environment".to_string()]
    );
}

#[test]
fn test_missing_application_key_is_reported() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(None, "Taco"));
    serve_environment(&server);

    let err = provider(&server, &cache).get_configuration().unwrap_err();

    assert_eq!(err.component(), Some("sample.app"));
    assert_eq!(err.failed_keys().unwrap(), &["sample.app.TimeOut".to_string()]);
    // The environment is not requested once the application component fails.
    assert_eq!(server.requests(), vec!["sample.app".to_string()]);
}

#[test]
fn test_missing_environment_key_is_reported() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("500"), "Taco"));
    server.serve(&tree("Environment", &[("RestUrl", "http://fake")]));

    let err = provider(&server, &cache).get_configuration().unwrap_err();

    assert!(matches!(err, ConfigError::Unavailable { .. }));
    assert_eq!(err.component(), Some("Environment"));
    assert_eq!(
        err.failed_keys().unwrap(),
        &["Environment.ConnectionString".to_string()]
    );
}

#[test]
fn test_invalid_value_is_reported() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("soon"), "Taco"));
    serve_environment(&server);

    let err = provider(&server, &cache).get_configuration().unwrap_err();

    assert_eq!(err.failed_keys().unwrap(), &["sample.app.TimeOut".to_string()]);
    assert!(err.report().contains("sample.app.TimeOut"));
}

#[test]
fn test_server_changes_are_picked_up_between_calls() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("500"), "Taco"));
    serve_environment(&server);
    let provider = provider(&server, &cache);

    assert_eq!(provider.get_configuration().unwrap().name, "Taco");

    server.serve(&sample_app(Some("750"), "Burrito"));
    let config = provider.get_configuration().unwrap();
    assert_eq!(config.name, "Burrito");
    assert_eq!(config.timeout, Duration::from_millis(750));
}

#[test]
fn test_cached_configuration_is_used_when_service_goes_down() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("500"), "Taco"));
    serve_environment(&server);
    let expected = provider(&server, &cache).get_configuration().unwrap();

    server.set("sample.app", 500, "");
    server.set("Environment", 500, "");
    let config = provider(&server, &cache).get_configuration().unwrap();

    assert_eq!(config, expected);
}

#[test]
fn test_configuration_can_be_read_from_async_code() {
    init_tracing();
    let server = FakeConfigServer::start();
    let cache = TempDir::new().unwrap();
    server.serve(&sample_app(Some("500"), "Taco"));
    serve_environment(&server);
    let provider = provider(&server, &cache);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let config = runtime.block_on(async { provider.get_configuration() }).unwrap();

    assert_eq!(config.name, "Taco");
    assert_eq!(config.timeout, Duration::from_millis(500));
}
