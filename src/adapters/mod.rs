// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing transport and cache implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: an HTTP transport for the config service and a file-backed
//! durable cache.

pub mod file_repository;
#[cfg(feature = "http")]
pub mod http_service;

// Re-export adapters based on feature flags
pub use file_repository::FileConfigRepository;
#[cfg(feature = "http")]
pub use http_service::{HttpConfigService, HttpServiceSettings};
