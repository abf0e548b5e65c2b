// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed application configuration.
//!
//! An application declares a [`ConfigSchema`]: its own component name, the settings
//! it requires from that component and the settings it requires from the shared
//! [`ENVIRONMENT_COMPONENT`]. An [`ApplicationConfigProvider`] fetches and validates
//! both components and hands the validated [`Settings`] to an explicit conversion
//! function that builds the application's typed configuration.

use crate::domain::{ConfigError, ConfigKey, Result, Settings, ValidationMap};
use crate::ports::{ConfigProvider, ProviderFactory};
#[cfg(feature = "http")]
use crate::service::{ClientSettings, ConfigProviderFactory};
use std::fmt;
use std::sync::Arc;

/// Name of the component shared by every application in an environment.
pub const ENVIRONMENT_COMPONENT: &str = "Environment";

/// Required settings of an application and of the shared environment.
///
/// Names are given relative to their component; the schema qualifies them.
///
/// # Examples
///
/// ```rust
/// use remcfg::domain::validators;
/// use remcfg::service::ConfigSchema;
///
/// let schema = ConfigSchema::new("billing")
///     .application("TimeOut", validators::is_valid_integer)
///     .environment("RestUrl", validators::is_valid_url);
///
/// let keys: Vec<&str> = schema.application_rules().keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, ["billing.TimeOut"]);
/// let keys: Vec<&str> = schema.environment_rules().keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, ["Environment.RestUrl"]);
/// ```
#[derive(Clone, Debug)]
pub struct ConfigSchema {
    component: String,
    application: ValidationMap,
    environment: ValidationMap,
}

impl ConfigSchema {
    /// Creates an empty schema for the application component `component`.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            application: ValidationMap::new(),
            environment: ValidationMap::new(),
        }
    }

    /// Requires `name` from the application component.
    pub fn application<F>(mut self, name: &str, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let key = ConfigKey::qualified(&self.component, name);
        self.application.insert(key, validator);
        self
    }

    /// Requires `name` from the environment component.
    pub fn environment<F>(mut self, name: &str, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let key = ConfigKey::qualified(ENVIRONMENT_COMPONENT, name);
        self.environment.insert(key, validator);
        self
    }

    /// The application component name.
    pub fn component_name(&self) -> &str {
        &self.component
    }

    /// Rules for the application component.
    pub fn application_rules(&self) -> &ValidationMap {
        &self.application
    }

    /// Rules for the environment component.
    pub fn environment_rules(&self) -> &ValidationMap {
        &self.environment
    }
}

/// Types that can be built from validated application and environment settings.
pub trait FromSettings: Sized {
    /// Builds the typed configuration.
    fn from_settings(application: &Settings, environment: &Settings) -> Result<Self>;
}

type Converter<T> = dyn Fn(&Settings, &Settings) -> Result<T> + Send + Sync;

/// Produces an application's typed configuration.
///
/// Every call to [`get_configuration`](Self::get_configuration) fetches both
/// components afresh, so changes made on the config service are picked up without
/// a restart.
///
/// # Examples
///
/// ```rust,no_run
/// use remcfg::domain::{validators, Result, Settings};
/// use remcfg::service::{ApplicationConfigProvider, ClientSettings, ConfigSchema, FromSettings};
///
/// struct AppConfig {
///     timeout_ms: i32,
///     rest_url: String,
/// }
///
/// impl FromSettings for AppConfig {
///     fn from_settings(app: &Settings, env: &Settings) -> Result<Self> {
///         Ok(AppConfig {
///             timeout_ms: app.get("TimeOut")?.as_i32("TimeOut")?,
///             rest_url: env.get("RestUrl")?.as_string(),
///         })
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let schema = ConfigSchema::new("billing")
///     .application("TimeOut", validators::is_valid_integer)
///     .environment("RestUrl", validators::is_valid_url);
/// let provider = ApplicationConfigProvider::<AppConfig>::from_settings(
///     schema,
///     &ClientSettings::default(),
/// )?;
/// let config = provider.get_configuration()?;
/// println!("{} {}", config.timeout_ms, config.rest_url);
/// # Ok(())
/// # }
/// ```
pub struct ApplicationConfigProvider<T> {
    schema: ConfigSchema,
    factory: Arc<dyn ProviderFactory>,
    convert: Box<Converter<T>>,
}

impl<T> ApplicationConfigProvider<T> {
    /// Creates a provider with an explicit conversion function.
    pub fn new<F>(schema: ConfigSchema, factory: Arc<dyn ProviderFactory>, convert: F) -> Self
    where
        F: Fn(&Settings, &Settings) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            schema,
            factory,
            convert: Box::new(convert),
        }
    }

    /// The schema this provider enforces.
    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Fetches, validates and converts the application's configuration.
    ///
    /// The application component is retrieved first, then the environment. A
    /// failing conversion is reported as [`ConfigError::Unavailable`] for the
    /// application component.
    ///
    /// The call blocks; async callers may still use it directly because the HTTP
    /// transport issues its requests off the runtime's worker thread.
    pub fn get_configuration(&self) -> Result<T> {
        let component = self.schema.component_name();

        let application = self
            .factory
            .create(component, self.schema.application.clone())
            .get_and_validate()?;
        let environment = self
            .factory
            .create(ENVIRONMENT_COMPONENT, self.schema.environment.clone())
            .get_and_validate()?;

        let application = Settings::new(component, &application.flatten());
        let environment = Settings::new(ENVIRONMENT_COMPONENT, &environment.flatten());

        (self.convert)(&application, &environment).map_err(|e| {
            tracing::warn!("Failed to build typed configuration for '{}': {}", component, e);
            ConfigError::unavailable(component, e)
        })
    }
}

impl<T: FromSettings + 'static> ApplicationConfigProvider<T> {
    /// Creates a provider that converts with [`FromSettings`].
    pub fn typed(schema: ConfigSchema, factory: Arc<dyn ProviderFactory>) -> Self {
        Self::new(schema, factory, T::from_settings)
    }

    /// Creates a provider backed by the HTTP transport and the file-backed cache.
    #[cfg(feature = "http")]
    pub fn from_settings(schema: ConfigSchema, settings: &ClientSettings) -> Result<Self> {
        let factory = ConfigProviderFactory::from_settings(settings)?;
        Ok(Self::typed(schema, Arc::new(factory)))
    }
}

impl<T> fmt::Debug for ApplicationConfigProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationConfigProvider")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
