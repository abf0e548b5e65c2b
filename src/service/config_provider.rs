// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration provider implementation.
//!
//! This module provides the default implementation of the `ConfigProvider` trait,
//! which decides between freshly fetched and cached configuration for one component.
//!
//! One call to [`get_and_validate`](ConfigProvider::get_and_validate) performs
//! exactly one fetch and one cache load, in that order:
//!
//! 1. The service tree, if the service produced one, is validated. A valid service
//!    tree is written to the cache; nothing else ever writes the cache.
//! 2. The cache entry, if there is one, is loaded and validated.
//! 3. A valid service tree wins over a valid cache tree.
//! 4. Otherwise the call fails with [`ConfigError::Unavailable`]. Its cause is the
//!    transport failure if the fetch failed outright, else the validation failure of
//!    the service tree, else the validation failure of the cache tree.

use crate::domain::{ConfigError, ConfigRoot, Result, ValidationMap, ValidationReport};
use crate::ports::{ConfigProvider, ConfigRepository, ConfigService, ServiceResponse};
use std::fmt;
use std::sync::Arc;

/// Provider combining a config service, a durable cache and validation rules.
///
/// The provider holds no mutable state; it can be shared across threads and called
/// repeatedly.
///
/// # Examples
///
/// ```rust
/// use remcfg::adapters::FileConfigRepository;
/// use remcfg::domain::{validators, ConfigError, ConfigRoot, ValidationMap};
/// use remcfg::ports::{ConfigProvider, ConfigService, ServiceResponse};
/// use remcfg::service::DefaultConfigProvider;
/// use std::sync::Arc;
///
/// struct Unreachable;
///
/// impl ConfigService for Unreachable {
///     fn name(&self) -> &str {
///         "unreachable"
///     }
///
///     fn fetch(&self, _component: &str) -> ServiceResponse {
///         ServiceResponse::failed(None, ConfigError::ServiceStatus { status: 503 })
///     }
/// }
///
/// # fn main() -> remcfg::domain::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let provider = DefaultConfigProvider::new(
///     "foo",
///     ValidationMap::new().with("foo.N1", validators::exists),
///     Arc::new(Unreachable),
///     Arc::new(FileConfigRepository::new(dir.path())),
/// );
///
/// let err = provider.get_and_validate().unwrap_err();
/// assert_eq!(err.component(), Some("foo"));
/// assert!(err.is_transport_failure());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DefaultConfigProvider {
    component: String,
    validation: ValidationMap,
    service: Arc<dyn ConfigService>,
    repository: Arc<dyn ConfigRepository>,
}

impl DefaultConfigProvider {
    /// Creates a provider for `component`.
    pub fn new(
        component: impl Into<String>,
        validation: ValidationMap,
        service: Arc<dyn ConfigService>,
        repository: Arc<dyn ConfigRepository>,
    ) -> Self {
        Self {
            component: component.into(),
            validation,
            service,
            repository,
        }
    }

    /// The rules this provider enforces.
    pub fn validation(&self) -> &ValidationMap {
        &self.validation
    }

    fn validate(&self, tree: ConfigRoot) -> (ConfigRoot, ValidationReport) {
        let report = self.validation.validate(&tree.flatten());
        (tree, report)
    }

    fn refresh_cache(&self, tree: &ConfigRoot) {
        match self.repository.save(&self.component, tree) {
            Ok(()) => tracing::info!("Refreshed cached configuration for '{}'", self.component),
            Err(e) => tracing::warn!(
                "Failed to cache configuration for '{}': {}",
                self.component,
                e.report()
            ),
        }
    }

    /// A cache that cannot be read, or an entry without data, counts as empty.
    fn load_cache(&self) -> Option<ConfigRoot> {
        match self.repository.load(&self.component) {
            Ok(Some(entry)) if !entry.has_data() => {
                tracing::warn!(
                    "Ignoring cached configuration for '{}' without data",
                    self.component
                );
                None
            }
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable cached configuration for '{}': {}",
                    self.component,
                    e.report()
                );
                None
            }
        }
    }

    fn all_keys_failed(&self) -> ConfigError {
        ConfigError::Validation {
            failed_keys: self.validation.keys().map(|key| key.to_string()).collect(),
        }
    }
}

impl fmt::Debug for DefaultConfigProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultConfigProvider")
            .field("component", &self.component)
            .field("validation", &self.validation)
            .field("service", &self.service.name())
            .finish_non_exhaustive()
    }
}

impl ConfigProvider for DefaultConfigProvider {
    fn component_name(&self) -> &str {
        &self.component
    }

    fn get_and_validate(&self) -> Result<ConfigRoot> {
        let component = self.component.as_str();

        let (server_tree, transport_error) = match self.service.fetch(component) {
            ServiceResponse::Received { status, config } => {
                tracing::debug!(
                    "Config service '{}' answered {} for '{}'",
                    self.service.name(),
                    status,
                    component
                );
                (config.has_data().then_some(config), None)
            }
            ServiceResponse::Failed { error, .. } => {
                tracing::warn!(
                    "Config service '{}' failed for '{}': {}",
                    self.service.name(),
                    component,
                    error
                );
                (None, Some(error))
            }
        };

        let server = server_tree.map(|tree| self.validate(tree));
        if let Some((tree, report)) = &server {
            if report.is_valid() {
                self.refresh_cache(tree);
            }
        }

        let cache = self.load_cache().map(|tree| self.validate(tree));

        let server_failure = match server {
            Some((tree, report)) if report.is_valid() => {
                tracing::debug!("Using configuration from the service for '{}'", component);
                return Ok(tree);
            }
            Some((_, report)) => {
                let failure = report.into_error();
                if let Some(e) = &failure {
                    tracing::warn!("Service configuration for '{}' rejected: {}", component, e);
                }
                failure
            }
            None => None,
        };

        let cache_failure = match cache {
            Some((tree, report)) if report.is_valid() => {
                tracing::debug!("Using cached configuration for '{}'", component);
                return Ok(tree);
            }
            Some((_, report)) => report.into_error(),
            None => {
                tracing::debug!("No cached configuration for '{}'", component);
                None
            }
        };

        let cause = transport_error
            .or(server_failure)
            .or(cache_failure)
            .unwrap_or_else(|| self.all_keys_failed());
        Err(ConfigError::unavailable(component, cause))
    }
}
