//! `MirageServer` — Axum HTTP + WebSocket server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use mirage_llm::ModelBackend;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::assets;
use crate::config::ServerConfig;
use crate::gateway::ModelGateway;
use crate::health::{self, HealthResponse};
use crate::session::SessionRegistry;
use crate::shutdown::ShutdownCoordinator;
use crate::ws::run_ws_session;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions, one per connection.
    pub registry: Arc<SessionRegistry>,
    /// Bounded bridge to the model backend.
    pub gateway: Arc<ModelGateway>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// When the server started.
    pub start_time: Instant,
    /// Prometheus render handle for `/metrics`.
    pub metrics: PrometheusHandle,
}

/// The Mirage server.
pub struct MirageServer {
    config: Arc<ServerConfig>,
    registry: Arc<SessionRegistry>,
    gateway: Arc<ModelGateway>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
    metrics: PrometheusHandle,
}

impl MirageServer {
    /// Create a new server around a model backend.
    pub fn new(
        config: ServerConfig,
        backend: Arc<dyn ModelBackend>,
        metrics: PrometheusHandle,
    ) -> Self {
        let gateway = Arc::new(ModelGateway::new(backend, config.gateway_workers));
        Self {
            config: Arc::new(config),
            registry: Arc::new(SessionRegistry::new()),
            gateway,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            gateway: self.gateway.clone(),
            shutdown: self.shutdown.clone(),
            config: self.config.clone(),
            start_time: self.start_time,
            metrics: self.metrics.clone(),
        };

        Router::new()
            .route("/", get(shell_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind the configured address and start serving.
    ///
    /// Returns the bound address (port 0 auto-assigns) and the serve task's
    /// join handle. The task exits after [`ShutdownCoordinator::shutdown`].
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        let router = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, router)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "server error");
            }
        });

        Ok((addr, handle))
    }

    /// Get the session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Get the model gateway.
    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET / — the static shell, bytes unmodified.
async fn shell_handler(State(state): State<AppState>) -> Html<String> {
    Html(assets::load_shell(state.config.index_path.as_deref()).await)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.registry.len(),
        state.gateway.model(),
    ))
}

/// GET /metrics — Prometheus text format.
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// GET /ws — WebSocket upgrade into a session loop.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    if state.registry.len() >= state.config.max_connections {
        warn!(
            limit = state.config.max_connections,
            "refusing connection: at capacity"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    ws.on_upgrade(move |socket| run_ws_session(socket, state))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
