//! External movie data collaborators
//!
//! Metadata providers resolve searches and IMDb IDs into `MovieRecord`s.
//! Candidate sources produce a pre-ranked pool of movies for a user's
//! recommendation signal. Both sit behind traits so the HTTP layer and the
//! ranking code never depend on a concrete API.

use crate::{
    error::AppResult,
    models::{MovieId, MovieRecord, RecommendationSignal},
};

pub mod omdb;
pub mod recommender;

pub use omdb::OmdbProvider;
pub use recommender::RemoteRecommender;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieMetadataProvider: Send + Sync {
    /// Search for movies by title
    async fn search(&self, query: &str) -> AppResult<Vec<MovieRecord>>;

    /// Fetch full details for one movie
    ///
    /// Returns `NotFound` when the provider doesn't know the ID.
    async fn details(&self, movie_id: &MovieId) -> AppResult<MovieRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for recommendation candidate generators
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Returns up to `count` candidate movies for the signal, best first
    ///
    /// Implementations may return movies the user already engaged with; the
    /// ranker removes them.
    async fn candidates(
        &self,
        signal: &RecommendationSignal,
        count: usize,
    ) -> AppResult<Vec<MovieRecord>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}
