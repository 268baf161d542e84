use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::UserLibrary,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::MovieMetadataProvider, RecommendationService},
};

pub mod library;
pub mod matching;
pub mod movies;
pub mod recommendations;

/// Bounds applied to caller-supplied recommendation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub default: usize,
    pub max: usize,
}

impl RecommendationLimits {
    /// Falls back to the default when absent and caps at the maximum
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default).min(self.max)
    }
}

/// Shared application state
pub struct AppState {
    pub library: Arc<dyn UserLibrary>,
    pub metadata: Arc<dyn MovieMetadataProvider>,
    pub recommendations: RecommendationService,
    pub limits: RecommendationLimits,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Movie metadata
        .route("/movies/search", get(movies::search))
        .route("/movies/filter", post(movies::filter))
        .route("/movies/:movie_id", get(movies::details))
        // Per-user library
        .route(
            "/users/:user_id/library/:collection",
            get(library::list).post(library::add),
        )
        .route(
            "/users/:user_id/library/:collection/:movie_id",
            delete(library::remove),
        )
        .route(
            "/users/:user_id/ratings",
            get(library::ratings).put(library::rate),
        )
        // Taste matching
        .route("/users/:user_id/match/:other_id", get(matching::match_users))
        .route("/match", post(matching::match_profiles))
        // Recommendations
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::for_user),
        )
        .route("/recommendations/rank", post(recommendations::rank))
        .route("/recommendations/content", post(recommendations::content))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
