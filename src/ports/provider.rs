// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config provider trait definitions.
//!
//! A [`ConfigProvider`] produces one validated configuration tree for one
//! component. A [`ProviderFactory`] builds providers on demand so that callers can
//! swap in fakes without touching transport or cache wiring.

use crate::domain::{ConfigRoot, Result, ValidationMap};

/// Produces a validated configuration tree for one component.
pub trait ConfigProvider: Send + Sync {
    /// The component this provider serves.
    fn component_name(&self) -> &str;

    /// Fetches, validates and returns the component's configuration.
    ///
    /// Every failure is a [`ConfigError::Unavailable`](crate::domain::ConfigError::Unavailable)
    /// for this component, with the underlying cause chained beneath it. The call can
    /// be repeated; each call consults the service and the cache afresh.
    fn get_and_validate(&self) -> Result<ConfigRoot>;
}

/// Builds providers for arbitrary components.
///
/// # Examples
///
/// ```rust
/// use remcfg::domain::{ConfigNode, ConfigRoot, Result, ValidationMap};
/// use remcfg::ports::{ConfigProvider, ProviderFactory};
///
/// struct Fixed(String);
///
/// impl ConfigProvider for Fixed {
///     fn component_name(&self) -> &str {
///         &self.0
///     }
///
///     fn get_and_validate(&self) -> Result<ConfigRoot> {
///         Ok(ConfigRoot::new(&self.0, None, ConfigNode::branch(&self.0, vec![])))
///     }
/// }
///
/// struct FixedFactory;
///
/// impl ProviderFactory for FixedFactory {
///     fn create(&self, component: &str, _validation: ValidationMap) -> Box<dyn ConfigProvider> {
///         Box::new(Fixed(component.to_string()))
///     }
/// }
///
/// let provider = FixedFactory.create("foo", ValidationMap::new());
/// assert_eq!(provider.component_name(), "foo");
/// ```
pub trait ProviderFactory: Send + Sync {
    /// Creates a provider for `component` that enforces `validation`.
    fn create(&self, component: &str, validation: ValidationMap) -> Box<dyn ConfigProvider>;
}
