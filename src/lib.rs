// SPDX-License-Identifier: MIT OR Apache-2.0

//! A resilient remote configuration client.
//!
//! This crate fetches tree-structured configuration for named components from a
//! remote config service, validates it against caller-declared rules, falls back to
//! a durable last-known-good cache when the service is unreachable or serves bad
//! data, and hands the validated settings to caller-supplied conversion code.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Configuration trees, flattening, validation rules, errors
//! - **Ports**: Trait definitions (`ConfigService`, `ConfigRepository`, `ConfigProvider`)
//! - **Adapters**: The HTTP transport and the file-backed cache
//! - **Service**: The config provider, the provider factory and typed application config
//!
//! # Retrieval
//!
//! For every request a provider fetches the component from the service once and
//! loads the cached entry once. Service data that passes validation is returned and
//! written to the cache. Otherwise a cached entry that passes validation is returned.
//! Otherwise the request fails with [`ConfigError::Unavailable`](domain::ConfigError::Unavailable),
//! chaining the transport error or the list of failing keys.
//!
//! # Feature Flags
//!
//! - `http`: Enable the `reqwest`-based HTTP transport (default)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use remcfg::prelude::*;
//!
//! struct AppConfig {
//!     timeout_ms: i32,
//!     rest_url: String,
//! }
//!
//! impl FromSettings for AppConfig {
//!     fn from_settings(app: &Settings, env: &Settings) -> Result<Self> {
//!         Ok(AppConfig {
//!             timeout_ms: app.get("TimeOut")?.as_i32("TimeOut")?,
//!             rest_url: env.get("RestUrl")?.as_string(),
//!         })
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let settings = ClientSettings::builder()
//!     .with_application_name("billing-worker")
//!     .with_base_url("http://configserver/config/")
//!     .build()?;
//! let schema = ConfigSchema::new("billing")
//!     .application("TimeOut", validators::is_valid_integer)
//!     .environment("RestUrl", validators::is_valid_url);
//!
//! let provider = ApplicationConfigProvider::<AppConfig>::from_settings(schema, &settings)?;
//! match provider.get_configuration() {
//!     Ok(config) => println!("timeout {} ms, rest url {}", config.timeout_ms, config.rest_url),
//!     Err(e) => eprintln!("{}", e.report()),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        validators, ConfigError, ConfigKey, ConfigNode, ConfigRoot, ConfigValue, FlatConfig,
        Result, Settings, ValidationMap,
    };
    pub use crate::ports::{
        ConfigProvider, ConfigRepository, ConfigService, ProviderFactory, ServiceResponse,
    };
    pub use crate::service::{
        ApplicationConfigProvider, ClientSettings, ConfigProviderFactory, ConfigSchema,
        DefaultConfigProvider, FromSettings, ENVIRONMENT_COMPONENT,
    };

    pub use crate::adapters::FileConfigRepository;
    // Re-export adapters based on feature flags
    #[cfg(feature = "http")]
    pub use crate::adapters::{HttpConfigService, HttpServiceSettings};
}
