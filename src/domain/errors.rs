// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration client.
//!
//! Every failure that reaches a caller of a provider is a [`ConfigError::Unavailable`]
//! carrying the component name, with the transport or validation problem that caused
//! it chained underneath as its `source`.

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// # Examples
///
/// ```
/// use remcfg::domain::errors::ConfigError;
///
/// let error = ConfigError::unavailable(
///     "billing",
///     ConfigError::Validation { failed_keys: vec!["billing.Timeout".to_string()] },
/// );
/// assert_eq!(error.failed_keys(), Some(&["billing.Timeout".to_string()][..]));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No validated configuration could be produced for a component.
    #[error("Config can not be retrieved for component '{component}'")]
    Unavailable {
        /// The component whose configuration was requested
        component: String,
        /// What went wrong
        #[source]
        source: Box<ConfigError>,
    },

    /// One or more required settings were missing or rejected by their validator.
    #[error("One or more config settings invalid or missing ({})", .failed_keys.join(", "))]
    Validation {
        /// Fully-qualified keys that failed, in validation-mapping order
        failed_keys: Vec<String>,
    },

    /// The config service answered with a non-success status code.
    #[error("Could not retrieve config. Service returned status code {status}")]
    ServiceStatus {
        /// The HTTP status code
        status: u16,
    },

    /// The request to the config service could not be completed.
    #[error("Could not retrieve config. Error in web request: {message}")]
    ServiceRequest {
        /// The error message
        message: String,
        /// The underlying client error
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The durable cache could not be read or written.
    #[error("Config cache error: {message}")]
    CacheError {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The requested configuration key was not found.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The client settings are unusable.
    #[error("Invalid client settings: {message}")]
    InvalidSettings {
        /// The error message
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Wraps `cause` in the outer "configuration inaccessible" error for `component`.
    pub fn unavailable(component: impl Into<String>, cause: ConfigError) -> Self {
        ConfigError::Unavailable {
            component: component.into(),
            source: Box::new(cause),
        }
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// The component named by the outermost [`ConfigError::Unavailable`], if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            ConfigError::Unavailable { component, .. } => Some(component),
            _ => None,
        }
    }

    /// The failing keys of the first validation error found in the cause chain.
    pub fn failed_keys(&self) -> Option<&[String]> {
        match self {
            ConfigError::Validation { failed_keys } => Some(failed_keys),
            ConfigError::Unavailable { source, .. } => source.failed_keys(),
            _ => None,
        }
    }

    /// Returns true if the proximate cause is a validation failure.
    pub fn is_validation_failure(&self) -> bool {
        match self {
            ConfigError::Validation { .. } => true,
            ConfigError::Unavailable { source, .. } => source.is_validation_failure(),
            _ => false,
        }
    }

    /// Returns true if the proximate cause is a failure to reach or understand the service.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            ConfigError::ServiceStatus { .. }
            | ConfigError::ServiceRequest { .. }
            | ConfigError::ParseError { .. } => true,
            ConfigError::Unavailable { source, .. } => source.is_transport_failure(),
            _ => false,
        }
    }

    /// Renders the error and its whole cause chain for logs or console output.
    ///
    /// Validation failures list one failing key per line.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        match self {
            ConfigError::Unavailable { source, .. } => {
                let _ = write!(out, "\nCaused by: {}", source.report());
            }
            ConfigError::Validation { failed_keys } => {
                out.push_str("\nConfig variables failing validation:");
                for key in failed_keys {
                    let _ = write!(out, "\n  {key}");
                }
            }
            _ => {
                let mut cause = self.source();
                while let Some(err) = cause {
                    let _ = write!(out, "\nCaused by: {err}");
                    cause = err.source();
                }
            }
        }
        out
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
