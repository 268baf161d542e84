use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{MovieRecord, RecommendationSignal, UserMovieProfile},
    routes::AppState,
    services::recommendations::{rank_recommendations, recommend_by_content},
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Handler recommending movies for a stored user
pub async fn for_user(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let limit = state.limits.resolve(params.limit);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        limit,
        "Processing recommendation request"
    );

    let movies = state
        .recommendations
        .recommend_for_user(&user_id, limit)
        .await?;

    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub signal: RecommendationSignal,
    pub candidates: Vec<MovieRecord>,
    pub limit: Option<usize>,
}

/// Handler ranking a caller-supplied candidate pool
pub async fn rank(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RankRequest>,
) -> Json<Vec<MovieRecord>> {
    let limit = state.limits.resolve(request.limit);
    Json(rank_recommendations(
        &request.signal,
        request.candidates,
        limit,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub profile: UserMovieProfile,
    pub candidates: Vec<MovieRecord>,
    pub limit: Option<usize>,
}

/// Handler ordering candidates by similarity to a profile
pub async fn content(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Json<Vec<MovieRecord>> {
    let limit = state.limits.resolve(request.limit);
    let signal = RecommendationSignal::from_profile(&request.profile);
    Json(recommend_by_content(
        &request.profile,
        &signal,
        request.candidates,
        limit,
    ))
}
