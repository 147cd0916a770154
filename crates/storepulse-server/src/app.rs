//! Router assembly and shared request state

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use storepulse_analytics::logger::SearchLogHandle;
use storepulse_core::store::{CatalogStore, EventStore};

use crate::handlers::{catalog, events, health, reports};

/// Store handles plus the search log handle, shared by every request
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub search_log: SearchLogHandle,
}

/// Build the full API router
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/products", get(catalog::search_products))
        .route("/api/reports", get(reports::get_report))
        .route("/api/events/page-view", post(events::record_page_view))
        .route("/api/events/product-view", post(events::record_product_view))
        .route("/api/events/interaction", post(events::record_interaction))
        .route("/api/events/session", post(events::record_session))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .with_state(state)
}
