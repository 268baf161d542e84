//! Filtering and sorting of movie lists, mirroring the library filter bar.
//!
//! Every criterion is optional. Range criteria only exclude movies once the
//! range is set; a movie without the value (no rating, unknown runtime) is
//! then excluded.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{
    models::MovieRecord,
    services::features::{decade_token, tokenize},
};

/// Sort orders offered to library views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the incoming order
    #[default]
    None,
    TitleAsc,
    TitleDesc,
    RatingDesc,
    RatingAsc,
    ReleaseNewest,
    ReleaseOldest,
    RuntimeAsc,
    RuntimeDesc,
}

/// Criteria for narrowing a list of movies
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive title substring
    #[serde(default)]
    pub search: Option<String>,
    /// Every listed genre must be present
    #[serde(default)]
    pub genres: Vec<String>,
    /// Decade label such as "1990s"
    #[serde(default)]
    pub decade: Option<String>,
    #[serde(default)]
    pub year_range: Option<(i32, i32)>,
    #[serde(default)]
    pub imdb_rating: Option<(f64, f64)>,
    /// Inclusive runtime range in minutes
    #[serde(default)]
    pub runtime: Option<(u32, u32)>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Non-empty, trimmed, lower-cased criterion text
fn criterion(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn in_range<T: PartialOrd>(value: Option<T>, range: &Option<(T, T)>) -> bool {
    match range {
        None => true,
        Some((low, high)) => value.is_some_and(|v| v >= *low && v <= *high),
    }
}

impl MovieFilter {
    /// Whether a single movie satisfies every set criterion
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        if let Some(search) = criterion(&self.search) {
            if !contains_ci(&movie.title, &search) {
                return false;
            }
        }

        if !self.genres.is_empty() {
            let genres: Vec<String> = tokenize(&movie.genre).collect();
            let wanted = self
                .genres
                .iter()
                .map(|g| g.trim().to_lowercase())
                .filter(|g| !g.is_empty());
            for genre in wanted {
                if !genres.contains(&genre) {
                    return false;
                }
            }
        }

        if let Some(decade) = criterion(&self.decade) {
            if decade_token(&movie.release_date).as_deref() != Some(decade.as_str()) {
                return false;
            }
        }

        if !in_range(movie.release_year(), &self.year_range)
            || !in_range(movie.imdb_score(), &self.imdb_rating)
            || !in_range(movie.runtime_minutes(), &self.runtime)
        {
            return false;
        }

        if let Some(country) = criterion(&self.country) {
            if !movie
                .country
                .as_deref()
                .is_some_and(|c| contains_ci(c, &country))
            {
                return false;
            }
        }

        if let Some(language) = criterion(&self.language) {
            if !contains_ci(&movie.language, &language) {
                return false;
            }
        }

        if let Some(director) = criterion(&self.director) {
            if !contains_ci(&movie.director, &director) {
                return false;
            }
        }

        true
    }
}

/// Orders `Some` values by `ordering` and always puts `None` last
fn missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort by the given order
pub fn sort_movies(movies: &mut [MovieRecord], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::TitleAsc => movies.sort_by_key(|m| m.title.to_lowercase()),
        SortOrder::TitleDesc => {
            movies.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortOrder::RatingDesc => {
            movies.sort_by(|a, b| missing_last(a.imdb_score(), b.imdb_score(), true))
        }
        SortOrder::RatingAsc => {
            movies.sort_by(|a, b| missing_last(a.imdb_score(), b.imdb_score(), false))
        }
        SortOrder::ReleaseNewest => {
            movies.sort_by(|a, b| missing_last(a.release_year(), b.release_year(), true))
        }
        SortOrder::ReleaseOldest => {
            movies.sort_by(|a, b| missing_last(a.release_year(), b.release_year(), false))
        }
        SortOrder::RuntimeAsc => {
            movies.sort_by(|a, b| missing_last(a.runtime_minutes(), b.runtime_minutes(), false))
        }
        SortOrder::RuntimeDesc => {
            movies.sort_by(|a, b| missing_last(a.runtime_minutes(), b.runtime_minutes(), true))
        }
    }
}

/// Keeps the movies matching `filter`, then sorts them by `filter.sort`
pub fn apply_filter(movies: Vec<MovieRecord>, filter: &MovieFilter) -> Vec<MovieRecord> {
    let total = movies.len();
    let mut kept: Vec<MovieRecord> = movies.into_iter().filter(|m| filter.matches(m)).collect();
    sort_movies(&mut kept, filter.sort);

    tracing::debug!(total, kept = kept.len(), sort = ?filter.sort, "Movie filter applied");

    kept
}
