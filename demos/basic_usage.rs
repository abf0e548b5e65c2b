// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the remcfg crate.
//!
//! This example demonstrates:
//! - Declaring required settings for an application and its environment
//! - Building typed configuration from validated settings
//! - Printing the full diagnostic report when configuration is unavailable
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage -- http://localhost:8080/config/
//! ```
//!
//! Without a reachable config service the example falls back to the cache in
//! the OS cache directory, and fails with a report if the cache is empty.

use remcfg::prelude::*;
use std::time::Duration;

#[derive(Debug)]
struct SampleConfig {
    timeout: Duration,
    rest_url: String,
    connection_string: String,
    taco_count: u32,
}

impl FromSettings for SampleConfig {
    fn from_settings(app: &Settings, env: &Settings) -> Result<Self> {
        Ok(SampleConfig {
            timeout: Duration::from_millis(app.get("TimeOut")?.as_u64("TimeOut")?),
            rest_url: env.get("RestUrl")?.as_string(),
            connection_string: env.get("ConnectionString")?.as_string(),
            taco_count: app
                .get_or_default("ConfigObject.Number", "0")
                .as_u32("ConfigObject.Number")?,
        })
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080/config/".to_string());

    let settings = ClientSettings::builder()
        .with_application_name("remcfg-demo")
        .with_base_url(base_url)
        .with_request_timeout(Duration::from_secs(5))
        .build()?;
    println!("Cache directory: {}", settings.cache_directory().display());

    let schema = ConfigSchema::new("sample.app")
        .application("TimeOut", validators::is_valid_integer)
        .application("ConfigObject.Number", validators::is_valid_integer)
        .environment("RestUrl", validators::is_valid_url)
        .environment("ConnectionString", validators::exists);

    let provider = ApplicationConfigProvider::<SampleConfig>::from_settings(schema, &settings)?;

    match provider.get_configuration() {
        Ok(config) => println!("✓ {:#?}", config),
        Err(e) => {
            println!("✗ {}", e.report());
            if let Some(keys) = e.failed_keys() {
                println!("  {} setting(s) need attention", keys.len());
            }
        }
    }

    Ok(())
}
