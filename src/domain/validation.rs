// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation of flattened configuration against required keys.
//!
//! A [`ValidationMap`] lists the fully-qualified keys a component must provide, each
//! paired with a [`Validator`] predicate. Validating a [`FlatConfig`] yields a
//! [`ValidationReport`]: a key passes only if it is present and its predicate accepts
//! the value. A predicate that panics fails its key instead of unwinding into the
//! caller.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_tree::FlatConfig;
use crate::domain::errors::ConfigError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A shareable predicate over a leaf value.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Required keys and their validators, in insertion order.
///
/// # Examples
///
/// ```
/// use remcfg::domain::{validators, ConfigNode, ValidationMap};
///
/// let mut rules = ValidationMap::new();
/// rules.insert("foo.Port", validators::is_valid_integer);
/// rules.insert("foo.Host", validators::is_valid_hostname_or_ip);
///
/// let tree = ConfigNode::branch("foo", vec![ConfigNode::leaf("Port", "8080")]);
/// let report = rules.validate(&tree.flatten());
/// assert!(!report.is_valid());
/// assert_eq!(report.failed_keys(), vec!["foo.Host".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct ValidationMap {
    rules: Vec<(ConfigKey, Validator)>,
}

impl ValidationMap {
    /// Creates an empty mapping; an empty mapping accepts any configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. If `key` already has a rule, the existing one is kept.
    pub fn insert<F>(&mut self, key: impl Into<ConfigKey>, validator: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.insert_shared(key, Arc::new(validator));
    }

    /// Adds a rule with an already shared validator.
    pub fn insert_shared(&mut self, key: impl Into<ConfigKey>, validator: Validator) {
        let key = key.into();
        if !self.contains_key(key.as_str()) {
            self.rules.push((key, validator));
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<F>(mut self, key: impl Into<ConfigKey>, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.insert(key, validator);
        self
    }

    /// Returns true if a rule exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.iter().any(|(k, _)| k.as_str() == key)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Required keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.rules.iter().map(|(key, _)| key)
    }

    /// Checks every rule against `config`.
    pub fn validate(&self, config: &FlatConfig) -> ValidationReport {
        let outcomes = self
            .rules
            .iter()
            .map(|(key, validator)| {
                let passed = match config.get(key.as_str()) {
                    Some(value) => run_validator(validator, key, value.as_str()),
                    None => false,
                };
                (key.clone(), passed)
            })
            .collect();
        ValidationReport { outcomes }
    }
}

impl fmt::Debug for ValidationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

fn run_validator(validator: &Validator, key: &ConfigKey, value: &str) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| validator(value))) {
        Ok(passed) => passed,
        Err(_) => {
            tracing::warn!("Validator for '{}' panicked; treating the value as invalid", key);
            false
        }
    }
}

/// Per-key outcome of a validation pass, in mapping order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    outcomes: Vec<(ConfigKey, bool)>,
}

impl ValidationReport {
    /// Returns true if every rule passed (vacuously true for an empty mapping).
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|(_, passed)| *passed)
    }

    /// Keys whose rule failed, in mapping order.
    pub fn failed_keys(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Per-key outcomes.
    pub fn outcomes(&self) -> &[(ConfigKey, bool)] {
        &self.outcomes
    }

    /// Converts a failing report into [`ConfigError::Validation`].
    pub fn into_error(self) -> Option<ConfigError> {
        if self.is_valid() {
            None
        } else {
            Some(ConfigError::Validation {
                failed_keys: self.failed_keys(),
            })
        }
    }
}
