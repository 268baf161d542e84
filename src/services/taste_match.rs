use std::collections::HashSet;

use crate::{
    models::{MovieRecord, TasteMatchBreakdown, UserMovieProfile},
    services::features::{id_token, jaccard, DerivedFeatureSet},
};

/// Raw similarity per dimension, each in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub favorites: f64,
    pub films: f64,
    pub watchlist: f64,
    pub genres: f64,
    pub directors: f64,
    pub actors: f64,
    pub decades: f64,
}

/// Weights of each dimension in the overall match; they sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TasteWeights {
    pub favorites: f64,
    pub films: f64,
    pub watchlist: f64,
    pub genres: f64,
    pub directors: f64,
    pub actors: f64,
    pub decades: f64,
}

impl TasteWeights {
    pub const DEFAULT: TasteWeights = TasteWeights {
        favorites: 0.25,
        films: 0.20,
        watchlist: 0.10,
        genres: 0.15,
        directors: 0.10,
        actors: 0.10,
        decades: 0.10,
    };

    pub fn total(&self) -> f64 {
        self.favorites
            + self.films
            + self.watchlist
            + self.genres
            + self.directors
            + self.actors
            + self.decades
    }

    /// Weighted linear combination of the component scores
    pub fn combine(&self, scores: &ComponentScores) -> f64 {
        scores.favorites * self.favorites
            + scores.films * self.films
            + scores.watchlist * self.watchlist
            + scores.genres * self.genres
            + scores.directors * self.directors
            + scores.actors * self.actors
            + scores.decades * self.decades
    }
}

impl Default for TasteWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn id_set(movies: &[MovieRecord]) -> HashSet<String> {
    movies.iter().map(id_token).collect()
}

/// Converts a `[0, 1]` similarity to a rounded percentage
fn to_percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Unrounded similarity of two profiles on every dimension.
///
/// Movie overlap compares the raw collections; the four feature dimensions
/// are derived from favorites plus films only.
pub fn component_scores(a: &UserMovieProfile, b: &UserMovieProfile) -> ComponentScores {
    let features_a = DerivedFeatureSet::from_movies(a.seen_and_loved());
    let features_b = DerivedFeatureSet::from_movies(b.seen_and_loved());

    ComponentScores {
        favorites: jaccard(&id_set(&a.favorites), &id_set(&b.favorites)),
        films: jaccard(&id_set(&a.films), &id_set(&b.films)),
        watchlist: jaccard(&id_set(&a.watchlist), &id_set(&b.watchlist)),
        genres: jaccard(&features_a.genres, &features_b.genres),
        directors: jaccard(&features_a.directors, &features_b.directors),
        actors: jaccard(&features_a.actors, &features_b.actors),
        decades: jaccard(&features_a.decades, &features_b.decades),
    }
}

/// Turns component scores into the percentage breakdown.
///
/// `overall` is computed from the unrounded components and rounded once.
pub fn breakdown(scores: &ComponentScores, weights: &TasteWeights) -> TasteMatchBreakdown {
    TasteMatchBreakdown {
        favorites: to_percent(scores.favorites),
        films: to_percent(scores.films),
        watchlist: to_percent(scores.watchlist),
        genres: to_percent(scores.genres),
        directors: to_percent(scores.directors),
        actors: to_percent(scores.actors),
        decades: to_percent(scores.decades),
        overall: to_percent(weights.combine(scores)),
    }
}

/// Computes how closely two users' tastes match.
///
/// Symmetric in its arguments. Empty collections on both sides count as a
/// full match for that dimension, so two empty profiles score 100 everywhere.
pub fn calculate_taste_match(a: &UserMovieProfile, b: &UserMovieProfile) -> TasteMatchBreakdown {
    let scores = component_scores(a, b);
    let result = breakdown(&scores, &TasteWeights::DEFAULT);

    tracing::debug!(
        favorites = result.favorites,
        films = result.films,
        watchlist = result.watchlist,
        overall = result.overall,
        "Taste match computed"
    );

    result
}
