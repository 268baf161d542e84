use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{validate_score, LibraryCollection, MovieId, MovieRecord, Rating, UserMovieProfile},
};

/// Per-user movie collections and ratings
///
/// Collections are keyed by `movie_id` and keep insertion order. Adding a
/// movie that is already present replaces the stored record in place.
#[async_trait::async_trait]
pub trait UserLibrary: Send + Sync {
    /// Adds or replaces a movie in one of the user's collections
    async fn add_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie: MovieRecord,
    ) -> AppResult<()>;

    /// Removes a movie, returning whether it was present
    async fn remove_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie_id: &MovieId,
    ) -> AppResult<bool>;

    /// Lists a collection in insertion order
    async fn list(&self, user_id: &str, collection: LibraryCollection)
        -> AppResult<Vec<MovieRecord>>;

    /// Sets the user's 0-10 score for a movie
    async fn rate(&self, user_id: &str, movie_id: &MovieId, score: f64) -> AppResult<Rating>;

    /// All of the user's ratings, oldest first
    async fn ratings(&self, user_id: &str) -> AppResult<Vec<Rating>>;

    /// Assembles the three collections into a profile
    async fn profile(&self, user_id: &str) -> AppResult<UserMovieProfile> {
        Ok(UserMovieProfile {
            favorites: self.list(user_id, LibraryCollection::Favorites).await?,
            films: self.list(user_id, LibraryCollection::Films).await?,
            watchlist: self.list(user_id, LibraryCollection::Watchlist).await?,
        })
    }
}

/// Trims and checks a user identifier
pub fn validate_user_id(user_id: &str) -> AppResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("user_id cannot be empty".to_string()));
    }
    Ok(trimmed)
}

type CollectionKey = (String, LibraryCollection);

/// Library kept in process memory; used when no database is configured
#[derive(Default)]
pub struct InMemoryLibrary {
    collections: RwLock<HashMap<CollectionKey, Vec<MovieRecord>>>,
    ratings: RwLock<HashMap<String, Vec<Rating>>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserLibrary for InMemoryLibrary {
    async fn add_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie: MovieRecord,
    ) -> AppResult<()> {
        let user_id = validate_user_id(user_id)?;
        let mut collections = self.collections.write().await;
        let movies = collections
            .entry((user_id.to_string(), collection))
            .or_default();

        match movies.iter_mut().find(|m| m.movie_id == movie.movie_id) {
            Some(existing) => *existing = movie,
            None => movies.push(movie),
        }

        Ok(())
    }

    async fn remove_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie_id: &MovieId,
    ) -> AppResult<bool> {
        let user_id = validate_user_id(user_id)?;
        let mut collections = self.collections.write().await;

        let Some(movies) = collections.get_mut(&(user_id.to_string(), collection)) else {
            return Ok(false);
        };

        let before = movies.len();
        movies.retain(|m| &m.movie_id != movie_id);
        Ok(movies.len() != before)
    }

    async fn list(
        &self,
        user_id: &str,
        collection: LibraryCollection,
    ) -> AppResult<Vec<MovieRecord>> {
        let user_id = validate_user_id(user_id)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&(user_id.to_string(), collection))
            .cloned()
            .unwrap_or_default())
    }

    async fn rate(&self, user_id: &str, movie_id: &MovieId, score: f64) -> AppResult<Rating> {
        let user_id = validate_user_id(user_id)?;
        let score = validate_score(score)?;

        let rating = Rating {
            movie_id: movie_id.clone(),
            score,
            rated_at: Utc::now(),
        };

        let mut ratings = self.ratings.write().await;
        let user_ratings = ratings.entry(user_id.to_string()).or_default();
        user_ratings.retain(|r| &r.movie_id != movie_id);
        user_ratings.push(rating.clone());

        Ok(rating)
    }

    async fn ratings(&self, user_id: &str) -> AppResult<Vec<Rating>> {
        let user_id = validate_user_id(user_id)?;
        let ratings = self.ratings.read().await;
        Ok(ratings.get(user_id).cloned().unwrap_or_default())
    }
}
