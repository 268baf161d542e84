//! Set primitives shared by taste matching and content-based ranking.
//!
//! Every token is trimmed and lower-cased before it enters a set; empty
//! fragments and unparseable years contribute nothing.

use std::collections::HashSet;

use crate::models::{leading_year, MovieRecord};

/// Splits a comma-separated field into normalized tokens
pub fn tokenize(field: &str) -> impl Iterator<Item = String> + '_ {
    field
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
}

/// Decade label for a release date: "1994-03-01" becomes "1990s"
pub fn decade_token(release_date: &str) -> Option<String> {
    leading_year(release_date).map(|year| format!("{}s", year.div_euclid(10) * 10))
}

/// Normalized identifier token used for movie-ID set comparisons
pub fn id_token(movie: &MovieRecord) -> String {
    movie.movie_id.as_str().trim().to_lowercase()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets are a perfect match (1.0), not `0/0`.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;

    intersection / union
}

/// Genre, director, actor and decade tokens extracted from a set of movies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFeatureSet {
    pub genres: HashSet<String>,
    pub directors: HashSet<String>,
    pub actors: HashSet<String>,
    pub decades: HashSet<String>,
}

impl DerivedFeatureSet {
    /// Extracts the four feature sets from the given movies
    pub fn from_movies<'a>(movies: impl IntoIterator<Item = &'a MovieRecord>) -> Self {
        let mut features = Self::default();
        for movie in movies {
            features.add(movie);
        }
        features
    }

    /// Features of a single movie
    pub fn of(movie: &MovieRecord) -> Self {
        Self::from_movies(std::iter::once(movie))
    }

    fn add(&mut self, movie: &MovieRecord) {
        self.genres.extend(tokenize(&movie.genre));
        self.directors.extend(tokenize(&movie.director));
        self.actors.extend(tokenize(&movie.actors));
        self.decades.extend(decade_token(&movie.release_date));
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
            && self.directors.is_empty()
            && self.actors.is_empty()
            && self.decades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn movie(id: &str, genre: &str, director: &str, actors: &str, date: &str) -> MovieRecord {
        let mut record = MovieRecord::new(MovieId::parse(id).unwrap(), id);
        record.genre = genre.to_string();
        record.director = director.to_string();
        record.actors = actors.to_string();
        record.release_date = date.to_string();
        record
    }

    #[test]
    fn test_tokenize_normalizes() {
        let tokens: Vec<String> = tokenize(" Crime,  DRAMA ,, Thriller,").collect();
        assert_eq!(tokens, vec!["crime", "drama", "thriller"]);
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" , ").count(), 0);
    }

    #[test]
    fn test_decade_token() {
        assert_eq!(decade_token("1994-03-01"), Some("1990s".to_string()));
        assert_eq!(decade_token("2000"), Some("2000s".to_string()));
        assert_eq!(decade_token("2019-12-31"), Some("2010s".to_string()));
        assert_eq!(decade_token(""), None);
        assert_eq!(decade_token("Unknown Release Date"), None);
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&[]), &set(&[])), 1.0);
        assert_eq!(jaccard(&set(&[]), &set(&["a"])), 0.0);
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["a", "b"])), 1.0);
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), 1.0 / 3.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&["b"])), 0.0);
    }

    #[test]
    fn test_jaccard_symmetric() {
        let a = set(&["x", "y", "z"]);
        let b = set(&["y", "w"]);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
    }

    #[test]
    fn test_feature_set_from_movies() {
        let movies = vec![
            movie(
                "tt0110912",
                "Crime, Drama",
                "Quentin Tarantino",
                "John Travolta, Uma Thurman",
                "1994-10-14",
            ),
            movie(
                "tt0266697",
                "Action, Crime",
                "Quentin Tarantino",
                "Uma Thurman",
                "2003-10-10",
            ),
        ];

        let features = DerivedFeatureSet::from_movies(&movies);
        assert_eq!(features.genres, set(&["crime", "drama", "action"]));
        assert_eq!(features.directors, set(&["quentin tarantino"]));
        assert_eq!(features.actors, set(&["john travolta", "uma thurman"]));
        assert_eq!(features.decades, set(&["1990s", "2000s"]));
    }

    #[test]
    fn test_feature_set_skips_missing_fields() {
        let features = DerivedFeatureSet::of(&movie("tt1", "", "", "", ""));
        assert!(features.is_empty());
    }
}
