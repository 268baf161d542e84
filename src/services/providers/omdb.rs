//! OMDb API provider
//!
//! Search: `?s={query}` returns lightweight hits (title, year, poster).
//! Details: `?i={imdb_id}&plot=full` returns the full record used for scoring.
//!
//! OMDb answers HTTP 200 with `"Response": "False"` for misses, so the body
//! has to be inspected rather than the status alone.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, OmdbMovie, OmdbSearchResponse},
    services::providers::MovieMetadataProvider,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl OmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .get(format!("{}/", self.api_url))
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

/// Converts a search response into records, skipping unusable hits
pub(crate) fn search_results(response: OmdbSearchResponse) -> Vec<MovieRecord> {
    if !response.response.eq_ignore_ascii_case("true") {
        tracing::debug!(error = ?response.error, "OMDb search returned no results");
        return Vec::new();
    }

    response
        .search
        .unwrap_or_default()
        .into_iter()
        .filter_map(|hit| MovieRecord::try_from(hit).ok())
        .collect()
}

/// Converts a details response into a record
pub(crate) fn details_result(movie_id: &MovieId, movie: OmdbMovie) -> AppResult<MovieRecord> {
    if !movie.is_found() {
        return Err(AppError::NotFound(format!(
            "Movie {} not found: {}",
            movie_id,
            movie.error.as_deref().unwrap_or("unknown error")
        )));
    }

    MovieRecord::try_from(movie)
}

#[async_trait::async_trait]
impl MovieMetadataProvider for OmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let response: OmdbSearchResponse = self
                    .get(&[("s", query), ("type", "movie")])
                    .await?
                    .json()
                    .await?;

                let movies = search_results(response);

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "omdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn details(&self, movie_id: &MovieId) -> AppResult<MovieRecord> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id.to_string()),
            DETAILS_CACHE_TTL,
            async move {
                let response_text = self
                    .get(&[("i", movie_id.as_str()), ("plot", "full")])
                    .await?
                    .text()
                    .await?;
                tracing::debug!(response = %response_text, "Raw OMDb response");

                let movie: OmdbMovie = serde_json::from_str(&response_text).map_err(|e| {
                    tracing::error!(
                        error = %e,
                        response = %response_text,
                        "Failed to deserialize OMDb response"
                    );
                    AppError::ExternalApi(format!("Failed to parse OMDb response: {}", e))
                })?;

                let record = details_result(movie_id, movie)?;

                tracing::info!(
                    movie_id = %movie_id,
                    title = %record.title,
                    provider = "omdb",
                    "Movie details fetched"
                );

                Ok::<_, AppError>(record)
            }
        )
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
