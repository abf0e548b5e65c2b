// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config service transport trait definition.
//!
//! This module defines the `ConfigService` trait, the port through which a provider
//! asks the remote config service for one component's configuration tree, and the
//! `ServiceResponse` envelope every transport returns.

use crate::domain::{ConfigError, ConfigRoot};

/// Outcome of one fetch against the config service.
///
/// Transports never return `Err`; every failure class is captured here as data.
#[derive(Debug)]
pub enum ServiceResponse {
    /// The service answered. A "not found" answer carries a root without data.
    Received {
        /// HTTP status code of the answer
        status: u16,
        /// Parsed configuration
        config: ConfigRoot,
    },
    /// The call failed: no answer, an error status, or an unreadable body.
    Failed {
        /// HTTP status code, when the service answered at all
        status: Option<u16>,
        /// Underlying failure
        error: ConfigError,
    },
}

impl ServiceResponse {
    /// A successful answer.
    pub fn received(status: u16, config: ConfigRoot) -> Self {
        ServiceResponse::Received { status, config }
    }

    /// A failed call.
    pub fn failed(status: Option<u16>, error: ConfigError) -> Self {
        ServiceResponse::Failed { status, error }
    }

    /// HTTP status code, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceResponse::Received { status, .. } => Some(*status),
            ServiceResponse::Failed { status, .. } => *status,
        }
    }

    /// The received configuration, if the call succeeded.
    pub fn config(&self) -> Option<&ConfigRoot> {
        match self {
            ServiceResponse::Received { config, .. } => Some(config),
            ServiceResponse::Failed { .. } => None,
        }
    }

    /// The failure, if the call failed.
    pub fn error(&self) -> Option<&ConfigError> {
        match self {
            ServiceResponse::Received { .. } => None,
            ServiceResponse::Failed { error, .. } => Some(error),
        }
    }

    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResponse::Received { .. })
    }

    /// Returns true if the call succeeded and produced a tree.
    pub fn has_data(&self) -> bool {
        self.config().is_some_and(ConfigRoot::has_data)
    }
}

/// A trait for config service transports.
///
/// One call to [`fetch`](ConfigService::fetch) is one request to the service for
/// one component. Implementations must enforce their own timeout so that a fetch
/// always returns.
///
/// # Examples
///
/// ```rust
/// use remcfg::domain::{ConfigNode, ConfigRoot};
/// use remcfg::ports::{ConfigService, ServiceResponse};
///
/// struct FixedService;
///
/// impl ConfigService for FixedService {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn fetch(&self, component: &str) -> ServiceResponse {
///         let tree = ConfigNode::branch(component, vec![ConfigNode::leaf("N1", "V1")]);
///         ServiceResponse::received(200, ConfigRoot::new(component, None, tree))
///     }
/// }
///
/// assert!(FixedService.fetch("foo").has_data());
/// ```
pub trait ConfigService: Send + Sync {
    /// Short identifier used in log messages.
    fn name(&self) -> &str;

    /// Fetches the configuration of `component`.
    fn fetch(&self, component: &str) -> ServiceResponse;
}
