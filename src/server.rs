use std::sync::Arc;
use axum::{extract::{Query, State}, routing::get, Router, Json};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{CorsLayer, Any};
use serde::Deserialize;
use serde_json::json;
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::executor::SqliteConnector;
use crate::page::ReportPage;

pub struct AppState {
    pub page: ReportPage,
    pub connector: SqliteConnector,
    pub concurrent: bool,
}

#[derive(Deserialize)]
pub struct PageRequest {
    /// Raw contents of the year field, e.g. `2019, 2020`.
    #[serde(default)]
    pub years: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);
    Router::new()
        .route("/v1/page", get(render_page))
        .layer(cors)
        .with_state(state)
}

async fn render_page(State(state): State<Arc<AppState>>, Query(req): Query<PageRequest>) -> Response {
    let started = std::time::Instant::now();
    // Rendering is synchronous (rusqlite), so keep it off the async workers.
    let joined = tokio::task::spawn_blocking(move || {
        if state.concurrent {
            state.page.render_concurrent(&req.years, &state.connector)
        } else {
            state.page.render(&req.years, &state.connector)
        }
    }).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match joined {
        Ok(Ok(view)) => {
            info!(ms = elapsed_ms, ok = view.successes(), failed = view.failures(), "page served");
            (StatusCode::OK, Json(view)).into_response()
        }
        Ok(Err(e)) => {
            let msg = format!("{e}");
            warn!(%msg, "page render aborted");
            let body = json!({ "status": "error", "elapsed_ms": elapsed_ms, "error": msg });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Join error");
            let body = json!({ "status": "error", "elapsed_ms": elapsed_ms, "error": "Join error" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
