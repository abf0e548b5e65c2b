// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the provider logic and the outside world: the config service transport,
//! the durable cache, and the providers themselves. The transport and cache traits
//! are implemented by adapters in the adapters layer.

pub mod provider;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use provider::{ConfigProvider, ProviderFactory};
pub use repository::ConfigRepository;
pub use service::{ConfigService, ServiceResponse};
