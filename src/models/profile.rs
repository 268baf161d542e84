use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{MovieId, MovieRecord, Rating};

/// Ratings at or above this score count as "watched" for recommendations
pub const HIGH_RATING_THRESHOLD: f64 = 8.0;

/// A user's three movie collections, assembled per call from the library
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMovieProfile {
    #[serde(default)]
    pub favorites: Vec<MovieRecord>,
    #[serde(default)]
    pub films: Vec<MovieRecord>,
    #[serde(default)]
    pub watchlist: Vec<MovieRecord>,
}

impl UserMovieProfile {
    /// Favorites followed by films; the movies taste features are derived from
    pub fn seen_and_loved(&self) -> impl Iterator<Item = &MovieRecord> {
        self.favorites.iter().chain(self.films.iter())
    }
}

/// Per-dimension and overall compatibility between two users, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TasteMatchBreakdown {
    pub favorites: u8,
    pub films: u8,
    pub watchlist: u8,
    pub genres: u8,
    pub directors: u8,
    pub actors: u8,
    pub decades: u8,
    pub overall: u8,
}

/// A user's aggregated preference signal, as movie IDs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSignal {
    #[serde(default, alias = "favorite_movie_ids")]
    pub favorite_ids: Vec<MovieId>,
    #[serde(default, alias = "watched_movie_ids")]
    pub watched_ids: Vec<MovieId>,
    #[serde(default, alias = "watchlist_movie_ids")]
    pub watchlist_ids: Vec<MovieId>,
}

impl RecommendationSignal {
    /// Builds the signal from a user's library.
    ///
    /// Watched IDs are the films collection plus every movie rated at or
    /// above [`HIGH_RATING_THRESHOLD`], deduplicated in first-seen order.
    pub fn from_library(
        favorites: &[MovieRecord],
        films: &[MovieRecord],
        watchlist: &[MovieRecord],
        ratings: &[Rating],
    ) -> Self {
        let watched = films.iter().map(|m| &m.movie_id).chain(
            ratings
                .iter()
                .filter(|r| r.score >= HIGH_RATING_THRESHOLD)
                .map(|r| &r.movie_id),
        );

        Self {
            favorite_ids: dedup_ids(favorites.iter().map(|m| &m.movie_id)),
            watched_ids: dedup_ids(watched),
            watchlist_ids: dedup_ids(watchlist.iter().map(|m| &m.movie_id)),
        }
    }

    /// Builds the signal from a profile with no ratings
    pub fn from_profile(profile: &UserMovieProfile) -> Self {
        Self::from_library(&profile.favorites, &profile.films, &profile.watchlist, &[])
    }

    /// True when the user has not engaged with any movie
    pub fn is_empty(&self) -> bool {
        self.favorite_ids.is_empty() && self.watched_ids.is_empty() && self.watchlist_ids.is_empty()
    }

    /// Every ID that must never be recommended back to the user
    pub fn excluded(&self) -> HashSet<&MovieId> {
        self.favorite_ids
            .iter()
            .chain(self.watched_ids.iter())
            .chain(self.watchlist_ids.iter())
            .collect()
    }
}

fn dedup_ids<'a>(ids: impl Iterator<Item = &'a MovieId>) -> Vec<MovieId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}
