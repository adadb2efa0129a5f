//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router that feeds every request to the Engine
//! - Wire up middleware layers (tracing, request timeout)
//! - Buffer request bodies under the configured limit (413 above it,
//!   400 when the body cannot be read)
//! - Run each dispatch on the blocking pool, one per request
//! - Contain handler panics to the request that raised them

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::dispatch::Engine;
use crate::http::request::{buffer_request, rejection_status};

/// State injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub max_body_size: usize,
}

/// HTTP server hosting an [`Engine`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Freeze `engine` and build the host router around it.
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        let state = AppState {
            engine: Arc::new(engine),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The host router, e.g. to drive it without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve connections from `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
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

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Fallback handler: every request goes through the engine.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request = match buffer_request(request, state.max_body_size).await {
        Ok(request) => request,
        Err(e) => {
            let status = rejection_status(&e);
            tracing::warn!(
                error = %e,
                status = %status,
                limit = state.max_body_size,
                "Rejected request body"
            );
            return status.into_response();
        }
    };

    let engine = state.engine.clone();
    match tokio::task::spawn_blocking(move || engine.handle(request)).await {
        Ok(response) => response,
        Err(e) => {
            // Panicked without a recovery middleware; only this request fails.
            tracing::error!(error = %e, "Request dispatch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
