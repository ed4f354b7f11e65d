//! Web server
//!
//! - [`handlers`] - Route handlers for the dashboard and JSON endpoints
//! - [`render`] - HTML pages

pub mod handlers;
pub mod render;

use crate::aws::ComputeApi;
use crate::resource::ConnectionStatus;
use anyhow::{Context, Result};
use axum::response::{Html, IntoResponse, Response};
use axum::{http::StatusCode, routing::get, Router};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Read-only settings shown on the pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub region: String,
    pub environment: String,
    pub access_key_configured: bool,
    pub secret_key_configured: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: Arc<dyn ComputeApi>,
    settings: DashboardSettings,
    /// Most recent probe result, read by the health endpoint
    last_status: RwLock<ConnectionStatus>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn ComputeApi>,
        settings: DashboardSettings,
        initial_status: ConnectionStatus,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                api,
                settings,
                last_status: RwLock::new(initial_status),
            }),
        }
    }

    pub fn api(&self) -> &dyn ComputeApi {
        self.inner.api.as_ref()
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.inner.settings
    }

    pub async fn last_status(&self) -> ConnectionStatus {
        self.inner.last_status.read().await.clone()
    }

    pub async fn record_status(&self, status: ConnectionStatus) {
        *self.inner.last_status.write().await = status;
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::api_status))
        .route("/api/resources", get(handlers::api_resources))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

// Anything a handler did not anticipate ends up here
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::render_internal_error()),
    )
        .into_response()
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}
