// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and validation.
//!
//! Configuration trees, their flattened form, validation rules and the error type.
//! Nothing here performs I/O.

pub mod config_key;
pub mod config_tree;
pub mod config_value;
pub mod errors;
pub mod settings;
pub mod validation;
pub mod validators;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_tree::{ConfigNode, ConfigRoot, FlatConfig};
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use settings::Settings;
pub use validation::{ValidationMap, ValidationReport, Validator};
