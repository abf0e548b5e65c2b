// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaf values of a configuration tree.
//!
//! The config service delivers every leaf as a string. [`ConfigValue`] keeps that
//! string and offers typed conversions for use inside typed-config conversion
//! functions, each failing with a [`ConfigError::TypeConversionError`] that names the
//! offending key.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::validators;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

/// A leaf configuration value.
///
/// # Examples
///
/// ```
/// use remcfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from("500");
/// assert_eq!(value.as_i32("TimeOut").unwrap(), 500);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a `String`.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes (case-insensitive) `true`/`yes`/`1`/`on` and `false`/`no`/`0`/`off`.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        let normalized = self.0.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            other => other
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i32`.
    pub fn as_i32(&self, key: &str) -> Result<i32> {
        self.integer(key)
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.integer(key)
    }

    /// Converts the value to a `u32`.
    pub fn as_u32(&self, key: &str) -> Result<u32> {
        self.integer(key)
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        self.integer(key)
    }

    fn integer<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr<Err = ParseIntError>,
    {
        self.0
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Converts a `[d.]hh:mm[:ss[.fff]]` time interval to a [`Duration`].
    ///
    /// ```
    /// use remcfg::domain::config_value::ConfigValue;
    /// use std::time::Duration;
    ///
    /// let value = ConfigValue::from("1.00:01:30");
    /// assert_eq!(value.as_duration("Interval").unwrap(), Duration::from_secs(86_490));
    /// ```
    pub fn as_duration(&self, key: &str) -> Result<Duration> {
        validators::parse_time_interval(&self.0).ok_or_else(|| {
            ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: "time interval".to_string(),
                source: format!("'{}' is not a [d.]hh:mm[:ss] interval", self.0).into(),
            }
        })
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use remcfg::domain::config_value::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("Database.Host").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
