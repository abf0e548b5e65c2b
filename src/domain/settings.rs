// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated settings as seen by typed conversion code.
//!
//! [`Settings`] is the flattened configuration of one component after validation,
//! with the component prefix removed from every key. Conversion functions read it
//! through [`Settings::get`] and the typed accessors on [`ConfigValue`].

use crate::domain::config_key::ConfigKey;
use crate::domain::config_tree::{ConfigRoot, FlatConfig};
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};

/// One component's validated settings, keyed by unqualified dotted path.
///
/// # Examples
///
/// ```
/// use remcfg::domain::{ConfigNode, ConfigRoot, Settings};
///
/// let root = ConfigRoot::new(
///     "sample.app",
///     None,
///     ConfigNode::branch("sample.app", vec![ConfigNode::leaf("TimeOut", "500")]),
/// );
/// let settings = Settings::from_root(&root);
/// assert_eq!(settings.get("TimeOut").unwrap().as_i32("TimeOut").unwrap(), 500);
/// assert!(settings.get("sample.app.TimeOut").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    component: String,
    values: FlatConfig,
}

impl Settings {
    /// Strips `component`'s prefix from every key of `flat`.
    pub fn new(component: impl Into<String>, flat: &FlatConfig) -> Self {
        let component = component.into();
        let values = flat.strip_component_prefix(&component);
        Self { component, values }
    }

    /// Flattens `root` and strips its component prefix.
    pub fn from_root(root: &ConfigRoot) -> Self {
        Self::new(root.component_name.clone(), &root.flatten())
    }

    /// Name of the component these settings belong to.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Looks up a setting, failing with [`ConfigError::ConfigKeyNotFound`].
    ///
    /// The error names the fully-qualified key.
    pub fn get(&self, key: &str) -> Result<&ConfigValue> {
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: ConfigKey::qualified(&self.component, key).into_string(),
            })
    }

    /// Looks up a setting that may be absent.
    pub fn get_opt(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Returns the setting or `default` when it is absent.
    pub fn get_or_default(&self, key: &str, default: &str) -> ConfigValue {
        self.get_opt(key)
            .cloned()
            .unwrap_or_else(|| ConfigValue::from(default))
    }

    /// Returns true if the setting is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Unqualified keys in tree order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.values.keys()
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no settings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
