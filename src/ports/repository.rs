// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable cache trait definition.

use crate::domain::{ConfigRoot, Result};

/// A keyed store of last-known-good configuration trees.
///
/// There is at most one entry per component name. Implementations must be safe to
/// share across threads: a [`load`](ConfigRepository::load) that runs concurrently
/// with a [`save`](ConfigRepository::save) for the same component observes either
/// the previous entry or the new one, never a mix.
///
/// # Examples
///
/// ```rust
/// use remcfg::domain::{ConfigRoot, Result};
/// use remcfg::ports::ConfigRepository;
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct MemoryRepository(Mutex<HashMap<String, ConfigRoot>>);
///
/// impl ConfigRepository for MemoryRepository {
///     fn load(&self, component: &str) -> Result<Option<ConfigRoot>> {
///         Ok(self.0.lock().unwrap().get(component).cloned())
///     }
///
///     fn save(&self, component: &str, config: &ConfigRoot) -> Result<()> {
///         self.0.lock().unwrap().insert(component.to_string(), config.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigRepository: Send + Sync {
    /// Returns the most recently saved entry for `component`, or `None`.
    fn load(&self, component: &str) -> Result<Option<ConfigRoot>>;

    /// Replaces the entry for `component`.
    fn save(&self, component: &str, config: &ConfigRoot) -> Result<()>;
}
