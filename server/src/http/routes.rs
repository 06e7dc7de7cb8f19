use crate::http::quotes_routes::{
    export_pdf_handler, quote_figures_handler, quote_html_handler, quote_pdf_handler,
};
use crate::http::{AppState, CatalogQuery, CatalogResponse, HealthResponse};
use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::time::SystemTime;
use tower_http::trace::TraceLayer;

// Proformas con imágenes embebidas superan el límite por defecto de 2 MB
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/catalog", get(catalog_handler))
        .route("/api/v1/quote", post(quote_figures_handler))
        .route("/api/v1/quote/html", post(quote_html_handler))
        .route("/api/v1/quote/pdf", post(quote_pdf_handler))
        .route("/export-pdf", post(export_pdf_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SystemTime::now()
        .duration_since(state.start_time)
        .unwrap_or_default()
        .as_secs();

    let response = HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        catalog_items: state.catalog.len(),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response))
}

async fn catalog_handler(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> impl IntoResponse {
    let items = state.catalog.search(params.q.as_deref().unwrap_or_default());
    let total = items.len();

    (StatusCode::OK, Json(CatalogResponse { items, total })).into_response()
}
