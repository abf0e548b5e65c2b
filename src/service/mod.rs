// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the provider logic.
//!
//! This module contains the config provider that chooses between service and
//! cached configuration, the factory that wires providers to a transport and a
//! cache, and the typed application configuration built on top of them.

pub mod application;
pub mod client_settings;
pub mod config_provider;
pub mod factory;

// Re-export commonly used types
pub use application::{
    ApplicationConfigProvider, ConfigSchema, FromSettings, ENVIRONMENT_COMPONENT,
};
pub use client_settings::{ClientSettings, ClientSettingsBuilder};
pub use config_provider::DefaultConfigProvider;
pub use factory::ConfigProviderFactory;
