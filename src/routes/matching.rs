use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{TasteMatchBreakdown, UserMovieProfile},
    routes::AppState,
    services::calculate_taste_match,
};

/// Handler comparing two stored users
pub async fn match_users(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, other_id)): Path<(String, String)>,
) -> AppResult<Json<TasteMatchBreakdown>> {
    let profile_a = state.library.profile(&user_id).await?;
    let profile_b = state.library.profile(&other_id).await?;

    let breakdown = calculate_taste_match(&profile_a, &profile_b);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        other_id = %other_id,
        overall = breakdown.overall,
        "Taste match calculated"
    );

    Ok(Json(breakdown))
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub profile_a: UserMovieProfile,
    pub profile_b: UserMovieProfile,
}

/// Handler comparing two caller-supplied profiles
pub async fn match_profiles(Json(request): Json<MatchRequest>) -> Json<TasteMatchBreakdown> {
    Json(calculate_taste_match(&request.profile_a, &request.profile_b))
}
