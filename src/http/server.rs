//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app whose fallback dispatches through the route trie
//! - Wire up middleware (request ID, tracing, timeout)
//! - Answer 404 / 405 when the trie has no route for a request
//! - Swap in a rebuilt route table when the configuration changes
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::handler::{run_chain, Handler, RequestInfo};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::routes::{build_router, BuildError};
use crate::observability::metrics;
use crate::routing::SharedRouter;

/// Response header naming the pattern that served the request.
pub const X_MATCHED_ROUTE: &str = "x-matched-route";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<SharedRouter<Handler>>,
}

/// HTTP server fronting a config-driven route table.
pub struct HttpServer {
    app: axum::Router,
    router: Arc<SharedRouter<Handler>>,
    config: ServerConfig,
}

impl HttpServer {
    /// Build the route table from `config` and the app around it.
    pub fn new(config: ServerConfig) -> Result<Self, BuildError> {
        let table = build_router(&config)?;
        metrics::record_routes(table.len());

        let router = Arc::new(SharedRouter::new(table));
        let app = Self::build_app(
            &config,
            AppState {
                router: router.clone(),
            },
        );

        Ok(Self { app, router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new().fallback(dispatch).with_state(state).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request.request_id(),
                    )
                }))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The Axum app, for serving or for driving with `tower::ServiceExt`.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// The live route table.
    pub fn router(&self) -> Arc<SharedRouter<Handler>> {
        self.router.clone()
    }

    /// Get a reference to the config the server started with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Rebuild the route table from `config` and publish it.
    ///
    /// On error the live table is left untouched. Listener and timeout
    /// settings only take effect on restart.
    pub fn reload(&self, config: &ServerConfig) -> Result<usize, BuildError> {
        reload(&self.router, config)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations arriving on `config_updates` replace the route table
    /// while serving. Returns once `shutdown` fires and in-flight requests
    /// have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, routes = self.router.load().len(), "HTTP server starting");

        let shared = self.router.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = reload(&shared, &config) {
                    tracing::error!(error = %e, "Rejected new configuration, keeping current route table");
                }
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn reload(shared: &SharedRouter<Handler>, config: &ServerConfig) -> Result<usize, BuildError> {
    let table = build_router(config)?;
    let count = table.len();
    let previous = shared.replace(table);

    metrics::record_routes(count);
    tracing::info!(previous = previous.len(), routes = count, "Route table reloaded");
    Ok(count)
}

/// Fallback handler: every request goes through the route trie.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let router = state.router.load();
    let method = request.method();
    let path = request.uri().path();

    match router.match_route(method, path) {
        Some(matched) => {
            tracing::debug!(
                request_id = %request.request_id(),
                pattern = matched.pattern,
                params = matched.params.len(),
                "Route matched"
            );

            let info = RequestInfo {
                method,
                path,
                headers: request.headers(),
                pattern: matched.pattern,
                params: &matched.params,
            };
            let mut response = run_chain(matched.handlers, &info);
            if let Ok(value) = HeaderValue::from_str(matched.pattern) {
                response.headers_mut().insert(X_MATCHED_ROUTE, value);
            }

            metrics::record_request(method.as_str(), matched.pattern, response.status().as_u16(), start);
            response
        }
        None => {
            let allowed = router.allowed_methods(path);
            let response = if allowed.is_empty() {
                tracing::debug!(request_id = %request.request_id(), path, "No route matched");
                (StatusCode::NOT_FOUND, "no route matched").into_response()
            } else {
                let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
                tracing::debug!(request_id = %request.request_id(), path, allow = %allow, "Method not allowed");
                let mut response = (StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response();
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            };

            metrics::record_request(method.as_str(), metrics::UNMATCHED, response.status().as_u16(), start);
            response
        }
    }
}
