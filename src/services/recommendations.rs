use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::{
    db::UserLibrary,
    error::AppResult,
    models::{MovieId, MovieRecord, RecommendationSignal, UserMovieProfile},
    services::{
        features::{decade_token, tokenize, DerivedFeatureSet},
        providers::CandidateSource,
    },
};

/// Filters and truncates an upstream-ranked candidate pool.
///
/// Drops every candidate whose ID is in the user's favorites, watched or
/// watchlist IDs, keeps the first occurrence of duplicate IDs, preserves the
/// incoming order and returns at most `limit` movies. A user with no signal
/// gets no recommendations.
pub fn rank_recommendations(
    signal: &RecommendationSignal,
    candidates: Vec<MovieRecord>,
    limit: usize,
) -> Vec<MovieRecord> {
    if signal.is_empty() {
        tracing::debug!("Empty recommendation signal, skipping ranking");
        return Vec::new();
    }

    let excluded = signal.excluded();
    let pool_size = candidates.len();
    let mut seen: HashSet<MovieId> = HashSet::new();

    let ranked: Vec<MovieRecord> = candidates
        .into_iter()
        .filter(|movie| !excluded.contains(&movie.movie_id))
        .filter(|movie| seen.insert(movie.movie_id.clone()))
        .take(limit)
        .collect();

    tracing::debug!(
        pool_size,
        excluded = excluded.len(),
        returned = ranked.len(),
        limit,
        "Recommendations ranked"
    );

    ranked
}

/// Per-dimension weights for content-based candidate scoring
const GENRE_WEIGHT: f64 = 0.40;
const DIRECTOR_WEIGHT: f64 = 0.25;
const ACTOR_WEIGHT: f64 = 0.20;
const DECADE_WEIGHT: f64 = 0.15;

/// A candidate movie with its affinity to the user's taste
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredCandidate {
    pub movie: MovieRecord,
    pub score: f64,
}

/// Share of `tokens` found in `profile`; 0 when the candidate has none
fn coverage(tokens: &HashSet<String>, profile: &HashSet<String>) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    tokens.intersection(profile).count() as f64 / tokens.len() as f64
}

/// Scores one movie against the user's derived taste features, in `[0, 1]`
pub fn content_score(profile: &DerivedFeatureSet, movie: &MovieRecord) -> f64 {
    let genres: HashSet<String> = tokenize(&movie.genre).collect();
    let directors: HashSet<String> = tokenize(&movie.director).collect();
    let actors: HashSet<String> = tokenize(&movie.actors).collect();
    let decades: HashSet<String> = decade_token(&movie.release_date).into_iter().collect();

    GENRE_WEIGHT * coverage(&genres, &profile.genres)
        + DIRECTOR_WEIGHT * coverage(&directors, &profile.directors)
        + ACTOR_WEIGHT * coverage(&actors, &profile.actors)
        + DECADE_WEIGHT * coverage(&decades, &profile.decades)
}

/// Scores candidates by feature overlap and orders them best first.
///
/// The sort is stable, so equally scored candidates keep their pool order.
pub fn score_candidates(
    profile: &DerivedFeatureSet,
    candidates: Vec<MovieRecord>,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|movie| ScoredCandidate {
            score: content_score(profile, &movie),
            movie,
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Ranks a candidate pool by similarity to the profile's favorites and films,
/// then applies the usual exclusion and limit.
pub fn recommend_by_content(
    profile: &UserMovieProfile,
    signal: &RecommendationSignal,
    candidates: Vec<MovieRecord>,
    limit: usize,
) -> Vec<MovieRecord> {
    let features = DerivedFeatureSet::from_movies(profile.seen_and_loved());
    let ordered = score_candidates(&features, candidates)
        .into_iter()
        .map(|scored| scored.movie)
        .collect();

    rank_recommendations(signal, ordered, limit)
}

/// Produces recommendations for a stored user
pub struct RecommendationService {
    library: Arc<dyn UserLibrary>,
    candidates: Arc<dyn CandidateSource>,
}

impl RecommendationService {
    pub fn new(library: Arc<dyn UserLibrary>, candidates: Arc<dyn CandidateSource>) -> Self {
        Self {
            library,
            candidates,
        }
    }

    /// Builds the user's signal from their library and ratings
    pub async fn signal_for(&self, user_id: &str) -> AppResult<RecommendationSignal> {
        let profile = self.library.profile(user_id).await?;
        let ratings = self.library.ratings(user_id).await?;

        Ok(RecommendationSignal::from_library(
            &profile.favorites,
            &profile.films,
            &profile.watchlist,
            &ratings,
        ))
    }

    /// Recommends up to `limit` movies the user hasn't engaged with.
    ///
    /// The candidate source is asked for enough extra movies to survive
    /// exclusion. If it fails the user simply gets no recommendations, and a
    /// zero `limit` never reaches it.
    pub async fn recommend_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<MovieRecord>> {
        let signal = self.signal_for(user_id).await?;

        if signal.is_empty() {
            tracing::info!(user_id = %user_id, "No library signal, no recommendations");
            return Ok(Vec::new());
        }

        if limit == 0 {
            return Ok(Vec::new());
        }

        let requested = limit.saturating_add(signal.excluded().len());
        let pool = match self.candidates.candidates(&signal, requested).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    source = self.candidates.name(),
                    error = %e,
                    "Candidate source failed, returning no recommendations"
                );
                return Ok(Vec::new());
            }
        };

        let recommendations = rank_recommendations(&signal, pool, limit);

        tracing::info!(
            user_id = %user_id,
            favorites = signal.favorite_ids.len(),
            watched = signal.watched_ids.len(),
            watchlist = signal.watchlist_ids.len(),
            returned = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}
