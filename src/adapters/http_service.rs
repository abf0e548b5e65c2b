// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP config service adapter.
//!
//! This module provides a transport that fetches one component's configuration
//! tree with a blocking `GET {base_url}/Config/{component}` and normalizes every
//! outcome into a [`ServiceResponse`].

use crate::domain::{ConfigError, ConfigRoot, Result};
use crate::ports::{ConfigService, ServiceResponse};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::thread;
use std::time::Duration;
use url::Url;

const CONFIG_PATH_SEGMENT: &str = "Config";

/// Connection settings for [`HttpConfigService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpServiceSettings {
    /// Base address of the config service; a trailing slash is optional
    pub base_url: String,
    /// Upper bound on one request, connection included
    pub request_timeout: Duration,
}

impl HttpServiceSettings {
    /// Creates settings for `base_url`.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout,
        }
    }
}

/// Config service transport over HTTP.
///
/// Status handling:
///
/// - 2xx with a JSON object body: the parsed [`ConfigRoot`]
/// - 404 and 204: success without data
/// - any other status, connection failure, timeout or unreadable body: a failed
///   response carrying the cause
///
/// Requests block the calling thread. Called from inside a tokio runtime, the
/// request is made from a helper thread instead, so async code may call it too.
///
/// # Examples
///
/// ```rust,no_run
/// use remcfg::adapters::{HttpConfigService, HttpServiceSettings};
/// use remcfg::ports::ConfigService;
/// use std::time::Duration;
///
/// # fn main() -> remcfg::domain::Result<()> {
/// let settings = HttpServiceSettings::new("http://configserver/config/", Duration::from_secs(5));
/// let service = HttpConfigService::new(settings)?;
/// let response = service.fetch("billing");
/// println!("status: {:?}, has data: {}", response.status(), response.has_data());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpConfigService {
    client: Client,
    base_url: Url,
}

impl HttpConfigService {
    /// Creates a transport from explicit settings.
    ///
    /// Fails with [`ConfigError::InvalidSettings`] if the base address is not an
    /// absolute `http` or `https` URL.
    pub fn new(settings: HttpServiceSettings) -> Result<Self> {
        let base_url = parse_base_url(&settings.base_url)?;
        let timeout = settings.request_timeout;
        let client = outside_runtime(|| Client::builder().timeout(timeout).build())
            .map_err(|e| ConfigError::InvalidSettings {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }

    /// The address requested for `component`.
    pub fn component_url(&self, component: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(CONFIG_PATH_SEGMENT).push(component);
        }
        url
    }

    fn request(&self, component: &str) -> ServiceResponse {
        let url = self.component_url(component);
        tracing::debug!("Requesting configuration for '{}' from {}", component, url);

        let response = match self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request to {} failed: {}", url, e);
                let status = e.status().map(|s| s.as_u16());
                return ServiceResponse::failed(status, request_error(e));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            tracing::debug!("Config service has no data for '{}' ({})", component, status);
            return ServiceResponse::received(status.as_u16(), ConfigRoot::empty(component));
        }
        if !status.is_success() {
            tracing::warn!("Config service returned {} for '{}'", status, component);
            return ServiceResponse::failed(
                Some(status.as_u16()),
                ConfigError::ServiceStatus {
                    status: status.as_u16(),
                },
            );
        }

        let body = match response.bytes() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read response body from {}: {}", url, e);
                return ServiceResponse::failed(Some(status.as_u16()), request_error(e));
            }
        };

        match parse_body(&body) {
            Ok(config) => ServiceResponse::received(status.as_u16(), config),
            Err(e) => {
                tracing::warn!("Unusable configuration document for '{}': {}", component, e);
                ServiceResponse::failed(Some(status.as_u16()), e)
            }
        }
    }
}

impl ConfigService for HttpConfigService {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, component: &str) -> ServiceResponse {
        outside_runtime(|| self.request(component))
    }
}

/// Runs `f` on a scoped helper thread when called from inside a tokio runtime,
/// where the blocking client must not be driven.
fn outside_runtime<T, F>(f: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return f();
    }
    thread::scope(|scope| {
        scope
            .spawn(f)
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidSettings {
        message: format!("Invalid base URL '{}': {}", raw, e),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidSettings {
            message: format!("Base URL '{}' must be an absolute http(s) address", raw),
        });
    }
    Ok(url)
}

fn request_error(e: reqwest::Error) -> ConfigError {
    let message = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("could not connect: {}", e)
    } else {
        e.to_string()
    };
    ConfigError::ServiceRequest {
        message,
        source: Box::new(e),
    }
}

/// Parses a service document; the body must be a JSON object.
fn parse_body(body: &[u8]) -> Result<ConfigRoot> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ConfigError::ParseError {
            message: "response body is not valid JSON".to_string(),
            source: Some(Box::new(e)),
        })?;

    if !value.is_object() {
        return Err(ConfigError::ParseError {
            message: format!("expected a JSON object, found {}", json_kind(&value)),
            source: None,
        });
    }

    serde_json::from_value(value).map_err(|e| ConfigError::ParseError {
        message: "response body is not a configuration document".to_string(),
        source: Some(Box::new(e)),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
