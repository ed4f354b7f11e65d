//! Route handlers

use super::{render, AppState};
use crate::resource::{build_view, load_dashboard, view, Dashboard};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

pub const SERVICE_NAME: &str = "aws-resources-dashboard";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Probe and aggregate, remembering the probe result for `/health`
async fn load(state: &AppState) -> Dashboard {
    let region = state.settings().region.clone();
    let dashboard = load_dashboard(state.api(), &region).await;
    state.record_status(dashboard.status()).await;
    dashboard
}

/// `GET /` - the HTML dashboard, or the guidance page when disconnected.
///
/// Anticipated failures still render with 200.
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("dashboard", %request_id);

    async move {
        let settings = state.settings();
        match load(&state).await {
            Dashboard::Ready(result) => {
                let sections = build_view(&result);
                Html(render::render_dashboard(settings, &sections))
            }
            Dashboard::Disconnected(status) => {
                Html(render::render_connection_error(settings, &status))
            }
        }
    }
    .instrument(span)
    .await
}

/// `GET /health` - reports the last probe result without probing again
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let connected = state.last_status().await.is_connected();
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "aws_connection": if connected { "ok" } else { "error" },
    }))
}

/// `GET /api/status`
pub async fn api_status(State(state): State<AppState>) -> Json<Value> {
    let status = state.last_status().await;
    Json(json!({
        "connected": status.is_connected(),
        "status": status.label(),
        "message": status.error_message(),
        "region": state.settings().region,
    }))
}

/// `GET /api/resources` - the aggregate as JSON; 503 when disconnected
pub async fn api_resources(State(state): State<AppState>) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("api_resources", %request_id);

    async move {
        match load(&state).await {
            Dashboard::Ready(result) => {
                let sections = build_view(&result);
                Json(json!({
                    "region": state.settings().region,
                    "total": view::total_count(&sections),
                    "sections": sections,
                }))
                .into_response()
            }
            Dashboard::Disconnected(status) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": status.label(),
                    "error": status.error_message(),
                })),
            )
                .into_response(),
        }
    }
    .instrument(span)
    .await
}
