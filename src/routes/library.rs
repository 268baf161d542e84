use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{LibraryCollection, MovieId, MovieRecord, Rating},
    routes::AppState,
};

/// Handler listing one of a user's collections
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path((user_id, collection)): Path<(String, String)>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let collection: LibraryCollection = collection.parse()?;
    let movies = state.library.list(&user_id, collection).await?;
    Ok(Json(movies))
}

/// Handler adding a movie to a collection
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, collection)): Path<(String, String)>,
    Json(movie): Json<MovieRecord>,
) -> AppResult<(StatusCode, Json<MovieRecord>)> {
    let collection: LibraryCollection = collection.parse()?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        collection = %collection,
        movie_id = %movie.movie_id,
        "Adding movie to library"
    );

    state
        .library
        .add_movie(&user_id, collection, movie.clone())
        .await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Handler removing a movie from a collection
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, collection, movie_id)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let collection: LibraryCollection = collection.parse()?;
    let movie_id = MovieId::parse(&movie_id)?;

    if !state
        .library
        .remove_movie(&user_id, collection, &movie_id)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "Movie {} is not in {}",
            movie_id, collection
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        collection = %collection,
        movie_id = %movie_id,
        "Removed movie from library"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub movie_id: MovieId,
    pub score: f64,
}

/// Handler listing a user's ratings
pub async fn ratings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    Ok(Json(state.library.ratings(&user_id).await?))
}

/// Handler setting a user's score for a movie
pub async fn rate(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<Rating>> {
    let rating = state
        .library
        .rate(&user_id, &request.movie_id, request.score)
        .await?;
    Ok(Json(rating))
}
