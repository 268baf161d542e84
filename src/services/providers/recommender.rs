//! Remote candidate recommender
//!
//! Talks to a content-similarity service exposing `POST /recommend`, which
//! takes the user's three ID lists plus a count and answers with a
//! pre-ranked JSON array of movie records.

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, RecommendationSignal},
    services::providers::CandidateSource,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Request body expected by the recommender
#[derive(Debug, Serialize)]
pub struct RecommendRequest<'a> {
    pub favorite_movie_ids: &'a [MovieId],
    pub watched_movie_ids: &'a [MovieId],
    pub watchlist_movie_ids: &'a [MovieId],
    pub num_recommendations: usize,
}

impl<'a> RecommendRequest<'a> {
    pub fn new(signal: &'a RecommendationSignal, count: usize) -> Self {
        Self {
            favorite_movie_ids: &signal.favorite_ids,
            watched_movie_ids: &signal.watched_ids,
            watchlist_movie_ids: &signal.watchlist_ids,
            num_recommendations: count,
        }
    }
}

/// The recommender answers either a list of movies or `{"error": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendResponse {
    Movies(Vec<MovieRecord>),
    Error { error: String },
}

#[derive(Clone)]
pub struct RemoteRecommender {
    http_client: HttpClient,
    base_url: String,
}

impl RemoteRecommender {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn parse_response(body: &str) -> AppResult<Vec<MovieRecord>> {
    match serde_json::from_str::<RecommendResponse>(body) {
        Ok(RecommendResponse::Movies(movies)) => Ok(movies),
        Ok(RecommendResponse::Error { error }) => Err(AppError::ExternalApi(format!(
            "Recommender returned error: {}",
            error
        ))),
        Err(e) => Err(AppError::ExternalApi(format!(
            "Failed to parse recommender response: {}",
            e
        ))),
    }
}

#[async_trait::async_trait]
impl CandidateSource for RemoteRecommender {
    async fn candidates(
        &self,
        signal: &RecommendationSignal,
        count: usize,
    ) -> AppResult<Vec<MovieRecord>> {
        let url = format!("{}/recommend", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&RecommendRequest::new(signal, count))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Recommender returned status {}: {}",
                status, body
            )));
        }

        let movies = parse_response(&body)?;

        tracing::info!(
            requested = count,
            received = movies.len(),
            source = "remote",
            "Recommendation candidates fetched"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
