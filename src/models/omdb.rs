use chrono::NaiveDate;
use serde::Deserialize;

use super::{MovieId, MovieRecord};
use crate::error::{AppError, AppResult};

/// Value OMDb uses for every missing field
const NOT_AVAILABLE: &str = "N/A";

/// Raw response from OMDb `?i={imdb_id}&plot=full`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbMovie {
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub rated: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub box_office: Option<String>,
    #[serde(default)]
    pub production: Option<String>,
}

impl OmdbMovie {
    pub fn is_found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Raw response from OMDb `?s={query}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchResponse {
    #[serde(default)]
    pub search: Option<Vec<OmdbSearchHit>>,
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// A single OMDb search hit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchHit {
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Returns the field unless it is absent, blank or "N/A"
fn available(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// Converts OMDb's "14 Oct 1994" release format to "1994-10-14"
fn normalize_release_date(released: Option<String>, year: Option<String>) -> String {
    if let Some(released) = available(released) {
        if let Ok(date) = NaiveDate::parse_from_str(&released, "%d %b %Y") {
            return date.format("%Y-%m-%d").to_string();
        }
        return released;
    }

    available(year).unwrap_or_else(|| "Unknown Release Date".to_string())
}

impl TryFrom<OmdbMovie> for MovieRecord {
    type Error = AppError;

    fn try_from(movie: OmdbMovie) -> AppResult<Self> {
        let imdb_id = available(movie.imdb_id).ok_or_else(|| {
            AppError::ExternalApi("OMDb response missing imdbID".to_string())
        })?;

        Ok(MovieRecord {
            movie_id: MovieId::parse(&imdb_id)?,
            title: available(movie.title).unwrap_or_else(|| "No Title".to_string()),
            description: available(movie.plot).unwrap_or_else(|| "No Description".to_string()),
            release_date: normalize_release_date(movie.released, movie.year),
            poster_path: available(movie.poster).unwrap_or_default(),
            // Left empty rather than given a placeholder so they add no tokens
            director: available(movie.director).unwrap_or_default(),
            actors: available(movie.actors).unwrap_or_default(),
            genre: available(movie.genre).unwrap_or_default(),
            imdb_rating: available(movie.imdb_rating)
                .unwrap_or_else(|| "No IMDb Rating".to_string()),
            language: available(movie.language).unwrap_or_else(|| "No Language".to_string()),
            production: available(movie.production)
                .unwrap_or_else(|| "Unknown Production".to_string()),
            runtime: available(movie.runtime).unwrap_or_else(|| "No Runtime".to_string()),
            rating: available(movie.rated),
            country: available(movie.country),
            box_office: Some(
                available(movie.box_office).unwrap_or_else(|| "Unknown Box Office".to_string()),
            ),
        })
    }
}

impl TryFrom<OmdbSearchHit> for MovieRecord {
    type Error = AppError;

    fn try_from(hit: OmdbSearchHit) -> AppResult<Self> {
        let mut record = MovieRecord::new(MovieId::parse(&hit.imdb_id)?, hit.title);
        record.release_date = available(hit.year).unwrap_or_default();
        record.poster_path = available(hit.poster).unwrap_or_default();
        Ok(record)
    }
}
