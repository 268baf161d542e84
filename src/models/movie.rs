use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Stable external identifier of a movie (an IMDb ID such as "tt0111161")
///
/// The only field used for movie identity. Construction trims surrounding
/// whitespace and rejects empty identifiers, so every `MovieRecord` in the
/// process carries a usable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MovieId(String);

impl MovieId {
    /// Parses a movie identifier, rejecting empty or whitespace-only input
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "movie_id cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MovieId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MovieId::parse(&value)
    }
}

impl From<MovieId> for String {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie as stored in a user's library and returned by metadata lookups
///
/// Descriptive fields are free text exactly as the metadata source delivered
/// them. Scoring only reads `genre`, `director`, `actors` (comma separated)
/// and the year prefix of `release_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(rename = "movie_id", alias = "movieId")]
    pub movie_id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub imdb_rating: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub production: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
}

impl MovieRecord {
    /// Creates a record with only an identifier and title set
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            description: String::new(),
            release_date: String::new(),
            poster_path: String::new(),
            director: String::new(),
            actors: String::new(),
            genre: String::new(),
            imdb_rating: String::new(),
            language: String::new(),
            production: String::new(),
            runtime: String::new(),
            rating: None,
            country: None,
            box_office: None,
        }
    }

    /// Release year taken from the first four characters of `release_date`
    pub fn release_year(&self) -> Option<i32> {
        leading_year(&self.release_date)
    }

    /// IMDb rating as a number; `None` for "N/A" or "No IMDb Rating"
    pub fn imdb_score(&self) -> Option<f64> {
        self.imdb_rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
    }

    /// Runtime in minutes parsed from text such as "142 min"
    pub fn runtime_minutes(&self) -> Option<u32> {
        let digits: String = self
            .runtime
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Parses the year out of a date-like string.
///
/// Only the first four characters are considered; leading whitespace and a
/// sign are accepted and parsing stops at the first non-digit, so "1994-03-01"
/// gives 1994, "Unknown" gives `None`.
pub fn leading_year(release_date: &str) -> Option<i32> {
    let prefix: String = release_date.chars().take(4).collect();
    let prefix = prefix.trim_start();

    let (negative, rest) = match prefix.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, prefix.strip_prefix('+').unwrap_or(prefix)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let year: i32 = digits.parse().ok()?;

    Some(if negative { -year } else { year })
}
