// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client settings supplied by the embedding application.
//!
//! Nothing here reads the environment; every value is either set through the
//! builder or defaulted.

use crate::adapters::FileConfigRepository;
use crate::domain::{ConfigError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Cache identity used when none is configured.
pub const DEFAULT_APPLICATION_NAME: &str = "remcfg";

/// Config service address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://configserver/config/";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to find the config service and where to keep the durable cache.
///
/// # Examples
///
/// ```rust
/// use remcfg::service::ClientSettings;
/// use std::time::Duration;
///
/// # fn main() -> remcfg::domain::Result<()> {
/// let settings = ClientSettings::builder()
///     .with_application_name("billing-worker")
///     .with_base_url("http://config.internal:8080/")
///     .with_request_timeout(Duration::from_secs(5))
///     .build()?;
/// assert_eq!(settings.application_name(), "billing-worker");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    application_name: String,
    base_url: String,
    request_timeout: Duration,
    cache_dir: Option<PathBuf>,
}

impl ClientSettings {
    /// Creates a settings builder starting from the defaults.
    pub fn builder() -> ClientSettingsBuilder {
        ClientSettingsBuilder::new()
    }

    /// Identity of the consuming application; names the default cache directory.
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Base address of the config service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upper bound on one request to the config service.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Explicit cache directory, if one was set.
    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }

    /// The cache directory in effect: the explicit one, or the OS cache directory
    /// for the application.
    pub fn cache_directory(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => FileConfigRepository::default_directory(&self.application_name),
        }
    }

    /// Transport settings derived from these settings.
    #[cfg(feature = "http")]
    pub fn http_settings(&self) -> crate::adapters::HttpServiceSettings {
        crate::adapters::HttpServiceSettings::new(self.base_url.clone(), self.request_timeout)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_dir: None,
        }
    }
}

/// Builder for [`ClientSettings`].
#[derive(Clone, Debug, Default)]
pub struct ClientSettingsBuilder {
    settings: ClientSettings,
}

impl ClientSettingsBuilder {
    /// Creates a builder starting from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application identity.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.settings.application_name = name.into();
        self
    }

    /// Sets the config service address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    /// Keeps the durable cache in `dir` instead of the OS cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.cache_dir = Some(dir.into());
        self
    }

    /// Checks and returns the settings.
    ///
    /// The application name and base address must be non-blank and the timeout
    /// non-zero. The address itself is parsed when the transport is built.
    pub fn build(self) -> Result<ClientSettings> {
        let settings = self.settings;
        if settings.application_name.trim().is_empty() {
            return Err(ConfigError::InvalidSettings {
                message: "application name must not be empty".to_string(),
            });
        }
        if settings.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidSettings {
                message: "base URL must not be empty".to_string(),
            });
        }
        if settings.request_timeout.is_zero() {
            return Err(ConfigError::InvalidSettings {
                message: "request timeout must be greater than zero".to_string(),
            });
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.application_name(), "remcfg");
        assert_eq!(settings.base_url(), "http://configserver/config/");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert!(settings.cache_dir().is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let settings = ClientSettings::builder()
            .with_application_name("app")
            .with_base_url("http://localhost:9000/")
            .with_request_timeout(Duration::from_millis(250))
            .with_cache_dir("/tmp/app-cache")
            .build()
            .unwrap();
        assert_eq!(settings.base_url(), "http://localhost:9000/");
        assert_eq!(settings.request_timeout(), Duration::from_millis(250));
        assert_eq!(settings.cache_directory(), PathBuf::from("/tmp/app-cache"));
    }

    #[test]
    fn test_default_cache_directory_follows_application_name() {
        let settings = ClientSettings::builder()
            .with_application_name("remcfg-settings-test")
            .build()
            .unwrap();
        assert_eq!(
            settings.cache_directory(),
            FileConfigRepository::default_directory("remcfg-settings-test")
        );
    }

    #[test]
    fn test_rejects_blank_values() {
        assert!(ClientSettings::builder()
            .with_application_name(" ")
            .build()
            .is_err());
        assert!(ClientSettings::builder().with_base_url("").build().is_err());
        assert!(ClientSettings::builder()
            .with_request_timeout(Duration::ZERO)
            .build()
            .is_err());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_settings() {
        let settings = ClientSettings::default().http_settings();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
