// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider factory wiring one transport and one cache into every provider.

#[cfg(feature = "http")]
use crate::adapters::{FileConfigRepository, HttpConfigService};
use crate::domain::ValidationMap;
#[cfg(feature = "http")]
use crate::domain::Result;
use crate::ports::{ConfigProvider, ConfigRepository, ConfigService, ProviderFactory};
use crate::service::config_provider::DefaultConfigProvider;
#[cfg(feature = "http")]
use crate::service::ClientSettings;
use std::fmt;
use std::sync::Arc;

/// Creates [`DefaultConfigProvider`]s that share a transport and a durable cache.
///
/// # Examples
///
/// ```rust,no_run
/// use remcfg::domain::{validators, ValidationMap};
/// use remcfg::ports::ProviderFactory;
/// use remcfg::service::{ClientSettings, ConfigProviderFactory};
///
/// # fn main() -> remcfg::domain::Result<()> {
/// let settings = ClientSettings::builder()
///     .with_application_name("billing-worker")
///     .with_base_url("http://config.internal/")
///     .build()?;
/// let factory = ConfigProviderFactory::from_settings(&settings)?;
///
/// let rules = ValidationMap::new().with("billing.Port", validators::is_valid_integer);
/// let tree = factory.create("billing", rules).get_and_validate()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigProviderFactory {
    service: Arc<dyn ConfigService>,
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigProviderFactory {
    /// Creates a factory from explicit collaborators.
    pub fn new(service: Arc<dyn ConfigService>, repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            service,
            repository,
        }
    }

    /// Creates a factory using the HTTP transport and the file-backed cache.
    #[cfg(feature = "http")]
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let service = HttpConfigService::new(settings.http_settings())?;
        let repository = FileConfigRepository::new(settings.cache_directory());
        tracing::debug!(
            "Config providers use {} with cache directory {}",
            settings.base_url(),
            repository.directory().display()
        );
        Ok(Self::new(Arc::new(service), Arc::new(repository)))
    }

    /// [`from_settings`](Self::from_settings) with [`ClientSettings::default`].
    #[cfg(feature = "http")]
    pub fn with_defaults() -> Result<Self> {
        Self::from_settings(&ClientSettings::default())
    }

    /// Creates a concrete provider for `component`.
    pub fn provider(&self, component: &str, validation: ValidationMap) -> DefaultConfigProvider {
        DefaultConfigProvider::new(
            component,
            validation,
            Arc::clone(&self.service),
            Arc::clone(&self.repository),
        )
    }
}

impl fmt::Debug for ConfigProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigProviderFactory")
            .field("service", &self.service.name())
            .finish_non_exhaustive()
    }
}

impl ProviderFactory for ConfigProviderFactory {
    fn create(&self, component: &str, validation: ValidationMap) -> Box<dyn ConfigProvider> {
        Box::new(self.provider(component, validation))
    }
}
