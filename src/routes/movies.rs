use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{MovieId, MovieRecord},
    routes::AppState,
    services::filters::{apply_filter, MovieFilter},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for movie title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let movies = state.metadata.search(&params.q).await?;

    tracing::info!(
        request_id = %request_id,
        provider = state.metadata.name(),
        results = movies.len(),
        "Movie search completed"
    );

    Ok(Json(movies))
}

/// Handler for full movie details
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<MovieRecord>> {
    let movie_id = MovieId::parse(&movie_id)?;
    let movie = state.metadata.details(&movie_id).await?;
    Ok(Json(movie))
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub movies: Vec<MovieRecord>,
    #[serde(default)]
    pub filter: MovieFilter,
}

/// Handler for filtering and sorting a caller-supplied movie list
pub async fn filter(Json(request): Json<FilterRequest>) -> Json<Vec<MovieRecord>> {
    Json(apply_filter(request.movies, &request.filter))
}
