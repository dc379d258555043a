//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers and the 404 fallback
//! - Wire up middleware (request id, tracing, CORS headers, lifecycle guard)
//! - Bind server to listener
//! - Stop accepting on shutdown signal

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ProfileConfig, ServerConfig};
use crate::facts::FactClient;
use crate::http::guard::{lifecycle_guard, LifecycleGuard};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::cors_headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub profile: Arc<ProfileConfig>,
    pub facts: FactClient,
    pub root_delay: Duration,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            profile: Arc::new(config.profile.clone()),
            facts: FactClient::new(&config.facts),
            root_delay: Duration::from_millis(config.routes.root_delay_ms),
        }
    }
}

/// HTTP server for the profile API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed first run first on the request. The guard is innermost
    /// so its 504 still gets CORS headers and the request id.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let guard = LifecycleGuard::new(Duration::from_millis(config.timeouts.request_ms));

        Router::new()
            .route("/", get(handlers::root))
            .route("/me", get(handlers::me))
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(cors_headers())
                    .layer(middleware::from_fn_with_state(guard, lifecycle_guard)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_ms = self.config.timeouts.request_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A handle to the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
