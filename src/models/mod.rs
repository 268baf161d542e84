mod library;
mod movie;
mod omdb;
mod profile;

pub use library::{validate_score, LibraryCollection, Rating, MAX_RATING, MIN_RATING};
pub use movie::{leading_year, MovieId, MovieRecord};
pub use omdb::{OmdbMovie, OmdbSearchHit, OmdbSearchResponse};
pub use profile::{
    RecommendationSignal, TasteMatchBreakdown, UserMovieProfile, HIGH_RATING_THRESHOLD,
};
