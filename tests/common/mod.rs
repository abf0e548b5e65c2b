// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use remcfg::domain::{ConfigError, ConfigNode, ConfigRoot, ValidationMap};
use remcfg::ports::{ConfigService, ServiceResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Routes `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Builds `component` with one leaf per `(name, value)` pair.
pub fn tree(component: &str, leaves: &[(&str, &str)]) -> ConfigRoot {
    let children = leaves
        .iter()
        .map(|(name, value)| ConfigNode::leaf(*name, *value))
        .collect();
    ConfigRoot::new(component, None, ConfigNode::branch(component, children))
}

/// Requires each key to be present.
pub fn require(keys: &[&str]) -> ValidationMap {
    keys.iter().fold(ValidationMap::new(), |rules, key| {
        rules.with(*key, remcfg::domain::validators::exists)
    })
}

type Respond = dyn Fn(&str) -> ServiceResponse + Send + Sync;

/// A config service whose answers are scripted by the test.
pub struct StubConfigService {
    respond: Mutex<Box<Respond>>,
    calls: AtomicUsize,
}

impl StubConfigService {
    /// Answers every fetch with `respond(component)`.
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&str) -> ServiceResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            respond: Mutex::new(Box::new(respond)),
            calls: AtomicUsize::new(0),
        })
    }

    /// Serves `root` with status 200.
    pub fn serving(root: ConfigRoot) -> Arc<Self> {
        Self::new(move |_| ServiceResponse::received(200, root.clone()))
    }

    /// Answers 404 for every component.
    pub fn not_found() -> Arc<Self> {
        Self::new(|component| ServiceResponse::received(404, ConfigRoot::empty(component)))
    }

    /// Fails every fetch as if the service could not be reached.
    pub fn unreachable() -> Arc<Self> {
        Self::new(|_| ServiceResponse::failed(None, connection_refused()))
    }

    /// Fails every fetch as if the service had answered with an unparseable body.
    pub fn gibberish() -> Arc<Self> {
        Self::new(|_| {
            let source = serde_json::from_str::<serde_json::Value>("gibberish").unwrap_err();
            ServiceResponse::failed(
                Some(200),
                ConfigError::ParseError {
                    message: "response body is not valid JSON".to_string(),
                    source: Some(Box::new(source)),
                },
            )
        })
    }

    /// Replaces the script.
    pub fn respond_with<F>(&self, respond: F)
    where
        F: Fn(&str) -> ServiceResponse + Send + Sync + 'static,
    {
        *self.respond.lock().unwrap() = Box::new(respond);
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConfigService for StubConfigService {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch(&self, component: &str) -> ServiceResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let respond = self.respond.lock().unwrap();
        (*respond)(component)
    }
}

pub fn connection_refused() -> ConfigError {
    ConfigError::ServiceRequest {
        message: "could not connect".to_string(),
        source: Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )),
    }
}

#[cfg(feature = "http")]
pub use fake_server::FakeConfigServer;

#[cfg(feature = "http")]
mod fake_server {
    use axum::extract::{Path, State};
    use axum::http::{header, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use tokio::sync::oneshot;

    #[derive(Clone, Default)]
    struct Documents {
        entries: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
        delay: Arc<Mutex<Option<Duration>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    async fn serve_document(
        State(documents): State<Documents>,
        Path(component): Path<String>,
    ) -> Response {
        documents.requests.lock().unwrap().push(component.clone());
        let delay = *documents.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let entry = documents.entries.lock().unwrap().get(&component).cloned();
        match entry {
            Some((status, body)) => {
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// An HTTP config service on an ephemeral local port.
    ///
    /// The server runs on its own runtime so tests can call the blocking
    /// transport from the test thread.
    pub struct FakeConfigServer {
        addr: SocketAddr,
        documents: Documents,
        shutdown: Option<oneshot::Sender<()>>,
        runtime: Option<Runtime>,
    }

    impl FakeConfigServer {
        /// Starts a server that answers 404 until documents are added.
        pub fn start() -> Self {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            let listener = runtime
                .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
                .unwrap();
            let addr = listener.local_addr().unwrap();

            let documents = Documents::default();
            let router = Router::new()
                .route("/config/Config/{component}", get(serve_document))
                .with_state(documents.clone());

            let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
            runtime.spawn(async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });

            Self {
                addr,
                documents,
                shutdown: Some(shutdown_tx),
                runtime: Some(runtime),
            }
        }

        /// Base address to configure the client with.
        pub fn base_url(&self) -> String {
            format!("http://{}/config/", self.addr)
        }

        /// Answers requests for `component` with `status` and `body`.
        pub fn set(&self, component: &str, status: u16, body: impl Into<String>) {
            let status = StatusCode::from_u16(status).unwrap();
            self.documents
                .entries
                .lock()
                .unwrap()
                .insert(component.to_string(), (status, body.into()));
        }

        /// Serves `root` as a 200 JSON document.
        pub fn serve(&self, root: &remcfg::domain::ConfigRoot) {
            self.set(
                &root.component_name,
                200,
                serde_json::to_string(root).unwrap(),
            );
        }

        /// Delays every answer.
        pub fn set_delay(&self, delay: Duration) {
            *self.documents.delay.lock().unwrap() = Some(delay);
        }

        /// Components requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.documents.requests.lock().unwrap().clone()
        }
    }

    impl Drop for FakeConfigServer {
        fn drop(&mut self) {
            if let Some(shutdown) = self.shutdown.take() {
                let _ = shutdown.send(());
            }
            if let Some(runtime) = self.runtime.take() {
                runtime.shutdown_background();
            }
        }
    }
}
