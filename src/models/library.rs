use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::MovieId;
use crate::error::AppError;

/// One of a user's per-movie collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryCollection {
    Favorites,
    /// Movies marked as watched
    Films,
    Watchlist,
}

impl LibraryCollection {
    pub const ALL: [LibraryCollection; 3] = [
        LibraryCollection::Favorites,
        LibraryCollection::Films,
        LibraryCollection::Watchlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryCollection::Favorites => "favorites",
            LibraryCollection::Films => "films",
            LibraryCollection::Watchlist => "watchlist",
        }
    }
}

impl Display for LibraryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryCollection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if name == "watched" {
            return Ok(LibraryCollection::Films);
        }

        LibraryCollection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == name)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown collection '{}'", name)))
    }
}

/// A user's score for a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub movie_id: MovieId,
    pub score: f64,
    pub rated_at: DateTime<Utc>,
}

/// Lowest accepted rating score
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating score
pub const MAX_RATING: f64 = 10.0;

/// Checks a rating score is a number within 0-10
pub fn validate_score(score: f64) -> Result<f64, AppError> {
    if score.is_finite() && (MIN_RATING..=MAX_RATING).contains(&score) {
        Ok(score)
    } else {
        Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, score
        )))
    }
}
