// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration trees and their flattened form.
//!
//! The config service describes one component's configuration as a [`ConfigRoot`]
//! wrapping a tree of named [`ConfigNode`]s. Validation and lookups work on the
//! flattened form, [`FlatConfig`], which maps the dotted path of every leaf to its
//! value in depth-first order.
//!
//! The serde representation matches the service's JSON documents and is also the
//! on-disk format of the durable cache:
//!
//! ```json
//! {
//!   "ComponentName": "foo",
//!   "LastModified": "2024-03-01T12:00:00Z",
//!   "Data": { "Name": "foo", "Children": [ { "Name": "N1", "Value": "V1" } ] }
//! }
//! ```

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A named node in a configuration tree.
///
/// A node without children is a leaf and contributes its value to the flattened
/// configuration. A node with children is an interior node; its own value is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigNode {
    /// Node name, one segment of a dotted path
    pub name: String,
    /// Scalar value of a leaf
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    /// Child nodes in insertion order
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Creates a leaf node.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Creates an interior node.
    pub fn branch(name: impl Into<String>, children: Vec<ConfigNode>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Flattens this subtree, using this node's name as the first path segment.
    ///
    /// ```
    /// use remcfg::domain::{ConfigNode, ConfigValue};
    ///
    /// let node = ConfigNode::branch("app", vec![
    ///     ConfigNode::branch("ConfigObject", vec![
    ///         ConfigNode::leaf("Name", "Taco"),
    ///         ConfigNode::leaf("Number", "6"),
    ///     ]),
    /// ]);
    /// let flat = node.flatten();
    /// let keys: Vec<&str> = flat.keys().map(|k| k.as_str()).collect();
    /// assert_eq!(keys, ["app.ConfigObject.Name", "app.ConfigObject.Number"]);
    /// assert_eq!(flat.get("app.ConfigObject.Number"), Some(&ConfigValue::from("6")));
    /// ```
    pub fn flatten(&self) -> FlatConfig {
        let mut flat = FlatConfig::new();
        self.flatten_into(&ConfigKey::from(""), &mut flat);
        flat
    }

    fn flatten_into(&self, parent: &ConfigKey, flat: &mut FlatConfig) {
        let path = parent.child(&self.name);
        if self.is_leaf() {
            let value = self.value.clone().unwrap_or_default();
            flat.insert(path, ConfigValue::from(value));
        } else {
            for child in &self.children {
                child.flatten_into(&path, flat);
            }
        }
    }
}

/// One component's configuration as delivered by the service or kept in the cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigRoot {
    /// Name of the owning component; also the cache key
    pub component_name: String,
    /// When the service last changed this component's configuration
    #[serde(default, with = "last_modified")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Root of the tree; `None` means the service has no data for the component
    #[serde(default)]
    pub data: Option<ConfigNode>,
}

impl ConfigRoot {
    /// Creates a root carrying a tree.
    pub fn new(
        component_name: impl Into<String>,
        last_modified: Option<DateTime<Utc>>,
        data: ConfigNode,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            last_modified,
            data: Some(data),
        }
    }

    /// Creates a root without data, as produced when the service has nothing for
    /// the component.
    pub fn empty(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            last_modified: None,
            data: None,
        }
    }

    /// Returns true if the root carries a tree.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Flattens the tree; a root without data flattens to an empty map.
    pub fn flatten(&self) -> FlatConfig {
        self.data
            .as_ref()
            .map(ConfigNode::flatten)
            .unwrap_or_default()
    }
}

/// Dotted-path to leaf-value mapping in depth-first encounter order.
///
/// Inserting an existing path replaces its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatConfig {
    entries: Vec<(ConfigKey, ConfigValue)>,
    index: HashMap<ConfigKey, usize>,
}

impl FlatConfig {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value at `key`.
    pub fn insert(&mut self, key: ConfigKey, value: ConfigValue) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Looks up a dotted path.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Returns true if the path is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Entries in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Returns a copy with every path's component prefix removed.
    ///
    /// See [`ConfigKey::strip_component_prefix`].
    pub fn strip_component_prefix(&self, component: &str) -> FlatConfig {
        self.iter()
            .map(|(key, value)| (key.strip_component_prefix(component), value.clone()))
            .collect()
    }
}

impl FromIterator<(ConfigKey, ConfigValue)> for FlatConfig {
    fn from_iter<I: IntoIterator<Item = (ConfigKey, ConfigValue)>>(iter: I) -> Self {
        let mut flat = FlatConfig::new();
        for (key, value) in iter {
            flat.insert(key, value);
        }
        flat
    }
}

/// Accepts string, number and boolean leaves; everything else is a format error.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a scalar node value, found {other}"
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ConfigNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ConfigNode>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `LastModified` is RFC 3339 on the way out; on the way in, timestamps without an
/// offset are read as UTC.
mod last_modified {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(|e| D::Error::custom(format!("invalid LastModified '{raw}': {e}")))
    }
}
