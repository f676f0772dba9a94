//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, timeout, body limit)
//! - Keep error bodies in the `{"message": ...}` shape
//! - Serve on a bound listener until shutdown

use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware, routing::get, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::{json_error_body, Message};
use crate::http::tutorials;
use crate::observability::metrics;
use crate::store::Database;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
}

/// HTTP server exposing the tutorial API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by a connected database.
    pub fn new(config: ServerConfig, db: Database) -> Self {
        let router = build_router(&config, AppState { db });
        Self { router, config }
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Server is running on port {}.", addr.port());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopping HTTP server");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Layers are applied one `Router::layer` call at a time, innermost first.
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(tutorials::routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.timeouts.request_secs),
        ))
        .layer(middleware::map_response(json_error_body))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(propagate_request_id_layer()),
        )
}

async fn welcome() -> Message {
    Message::new("Welcome to Test application.")
}
