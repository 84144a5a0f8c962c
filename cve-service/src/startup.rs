//! Application startup and lifecycle management.

use crate::config::CveConfig;
use crate::handlers;
use crate::services::{init_metrics, ConnectionManager, CveQueryService};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    cors::cors_layer, metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: CveConfig,
    pub query: CveQueryService,
}

/// Builds the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/cves", get(handlers::list_cves))
        .route("/cve/:id", get(handlers::get_cve))
        .route("/count", get(handlers::count_cves))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to MongoDB and binds the listener. A store that cannot be
    /// reached does not fail the build; the data routes answer 503 instead.
    pub async fn build(config: CveConfig) -> Result<Self, AppError> {
        let connection = ConnectionManager::connect(&config.mongodb).await;
        Self::build_with_connection(config, connection).await
    }

    /// Builds the application around an existing connection.
    pub async fn build_with_connection(
        config: CveConfig,
        connection: ConnectionManager,
    ) -> Result<Self, AppError> {
        init_metrics();

        let query = CveQueryService::new(connection, config.pagination.max_limit);
        let state = AppState {
            config: config.clone(),
            query,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            database_available = state.query.is_available(),
            "CVE service listening"
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
