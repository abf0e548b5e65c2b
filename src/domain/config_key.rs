// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted configuration paths.
//!
//! A [`ConfigKey`] is the path of a leaf in a configuration tree, with node names
//! joined by `.`. Keys used for validation are fully qualified, i.e. they start with
//! the owning component's name (`"billing.Database.Host"`); keys handed to typed
//! conversion code have that prefix stripped (`"Database.Host"`).

use std::fmt;

/// Separator between node names in a dotted path.
pub const PATH_SEPARATOR: char = '.';

/// A type-safe wrapper for dotted configuration paths.
///
/// # Examples
///
/// ```
/// use remcfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::qualified("billing", "Database.Host");
/// assert_eq!(key.as_str(), "billing.Database.Host");
/// assert_eq!(key.strip_component_prefix("billing").as_str(), "Database.Host");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Builds `"{component}.{name}"`.
    pub fn qualified(component: &str, name: &str) -> Self {
        ConfigKey(format!("{component}{PATH_SEPARATOR}{name}"))
    }

    /// Appends a child node name to this path.
    ///
    /// An empty path yields the child name on its own.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            ConfigKey(name.to_string())
        } else {
            ConfigKey(format!("{}{PATH_SEPARATOR}{name}", self.0))
        }
    }

    /// Removes the owning component's prefix from this key.
    ///
    /// Everything up to and including the first occurrence of `"{component}."` is
    /// removed. A key that does not contain the prefix is returned unchanged.
    ///
    /// ```
    /// use remcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("Environment.RestUrl");
    /// assert_eq!(key.strip_component_prefix("Environment").as_str(), "RestUrl");
    ///
    /// let key = ConfigKey::from("Other.RestUrl");
    /// assert_eq!(key.strip_component_prefix("Environment").as_str(), "Other.RestUrl");
    /// ```
    pub fn strip_component_prefix(&self, component: &str) -> Self {
        let prefix = format!("{component}{PATH_SEPARATOR}");
        match self.0.find(&prefix) {
            Some(start) => ConfigKey(self.0[start + prefix.len()..].to_string()),
            None => self.clone(),
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
