//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{info, population, prometheus_metrics, status, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/countryinfo/v1/info/:code", get(info))
        .route("/countryinfo/v1/population/:code", get(population))
        // The documented path carries a trailing slash; accept both.
        .route("/countryinfo/v1/status", get(status))
        .route("/countryinfo/v1/status/", get(status))
        .route("/metrics", get(prometheus_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
