//! Villa pricing service
//!
//! Season-based stay pricing and booking date validation for the villa
//! booking site, served as JSON over HTTP.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use axum::{extract::State, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::SeasonCache;
use crate::pricing::responses::HealthResponse;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: SeasonCache,
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats().await,
    })
}
