use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use cinematch_api::{
    db::{InMemoryLibrary, UserLibrary},
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, RecommendationSignal},
    routes::{create_router, AppState, RecommendationLimits},
    services::{
        providers::{CandidateSource, MovieMetadataProvider},
        RecommendationService,
    },
};

/// Metadata provider serving a fixed catalogue
struct StubMetadata {
    catalogue: Vec<MovieRecord>,
}

#[async_trait::async_trait]
impl MovieMetadataProvider for StubMetadata {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieRecord>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Search query cannot be empty".to_string()));
        }
        Ok(self
            .catalogue
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn details(&self, movie_id: &MovieId) -> AppResult<MovieRecord> {
        self.catalogue
            .iter()
            .find(|m| &m.movie_id == movie_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Candidate source returning the whole catalogue in order
struct StubCandidates {
    pool: Vec<MovieRecord>,
}

#[async_trait::async_trait]
impl CandidateSource for StubCandidates {
    async fn candidates(
        &self,
        _signal: &RecommendationSignal,
        count: usize,
    ) -> AppResult<Vec<MovieRecord>> {
        Ok(self.pool.iter().take(count).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn movie(id: &str, title: &str, genre: &str, director: &str, date: &str) -> MovieRecord {
    let mut record = MovieRecord::new(MovieId::parse(id).unwrap(), title);
    record.genre = genre.to_string();
    record.director = director.to_string();
    record.release_date = date.to_string();
    record
}

fn catalogue() -> Vec<MovieRecord> {
    vec![
        movie("tt0078748", "Alien", "Horror, Sci-Fi", "Ridley Scott", "1979-05-25"),
        movie("tt0090605", "Aliens", "Action, Sci-Fi", "James Cameron", "1986-07-18"),
        movie("tt0083658", "Blade Runner", "Sci-Fi, Thriller", "Ridley Scott", "1982-06-25"),
        movie("tt0088247", "The Terminator", "Action, Sci-Fi", "James Cameron", "1984-10-26"),
        movie("tt0062622", "2001: A Space Odyssey", "Sci-Fi", "Stanley Kubrick", "1968-04-02"),
    ]
}

fn create_test_server() -> TestServer {
    let library: Arc<dyn UserLibrary> = Arc::new(InMemoryLibrary::new());
    let candidates = Arc::new(StubCandidates { pool: catalogue() });

    let state = Arc::new(AppState {
        recommendations: RecommendationService::new(library.clone(), candidates),
        library,
        metadata: Arc::new(StubMetadata {
            catalogue: catalogue(),
        }),
        limits: RecommendationLimits { default: 2, max: 3 },
    });

    TestServer::new(create_router(state)).unwrap()
}

fn ids(body: &[Value]) -> Vec<&str> {
    body.iter().map(|m| m["movie_id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_search_movies() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/search").add_query_param("q", "alien").await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0078748", "tt0090605"]);
}

#[tokio::test]
async fn test_search_blank_query_is_bad_request() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/search").add_query_param("q", "  ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_details_and_not_found() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/tt0083658").await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["title"], "Blade Runner");
    assert_eq!(movie["releaseDate"], "1982-06-25");

    let response = server.get("/api/v1/movies/tt9999999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("tt9999999"));
}

#[tokio::test]
async fn test_library_add_list_remove() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/users/alice/library/favorites")
        .json(&json!({ "movie_id": "tt0078748", "title": "Alien", "genre": "Horror" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server.get("/api/v1/users/alice/library/favorites").await;
    response.assert_status_ok();
    let favorites: Vec<Value> = response.json();
    assert_eq!(ids(&favorites), vec!["tt0078748"]);

    let response = server
        .delete("/api/v1/users/alice/library/favorites/tt0078748")
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .delete("/api/v1/users/alice/library/favorites/tt0078748")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_library_rejects_unknown_collection() {
    let server = create_test_server();
    let response = server.get("/api/v1/users/alice/library/queue").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_library_rejects_movie_without_id() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/users/alice/library/films")
        .json(&json!({ "movie_id": "   ", "title": "Nameless" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ratings() {
    let server = create_test_server();

    let response = server
        .put("/api/v1/users/alice/ratings")
        .json(&json!({ "movie_id": "tt0090605", "score": 9 }))
        .await;
    response.assert_status_ok();

    let response = server
        .put("/api/v1/users/alice/ratings")
        .json(&json!({ "movie_id": "tt0090605", "score": 12 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/users/alice/ratings").await;
    let ratings: Vec<Value> = response.json();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["score"], 9.0);
}

#[tokio::test]
async fn test_match_profiles() {
    let server = create_test_server();
    let alien = json!({
        "movie_id": "tt0078748",
        "genre": "Horror, Sci-Fi",
        "releaseDate": "1979"
    });

    let response = server
        .post("/api/v1/match")
        .json(&json!({
            "profile_a": { "favorites": [alien.clone()] },
            "profile_b": { "favorites": [alien] }
        }))
        .await;
    response.assert_status_ok();

    let breakdown: Value = response.json();
    assert_eq!(breakdown["overall"], 100);
    assert_eq!(breakdown["favorites"], 100);
}

#[tokio::test]
async fn test_match_stored_users() {
    let server = create_test_server();

    for (user, body) in [
        ("alice", json!({ "movie_id": "tt0078748", "genre": "Horror, Sci-Fi" })),
        ("bob", json!({ "movie_id": "tt0090605", "genre": "Action, Sci-Fi" })),
    ] {
        server
            .post(&format!("/api/v1/users/{}/library/favorites", user))
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/api/v1/users/alice/match/bob").await;
    response.assert_status_ok();

    let breakdown: Value = response.json();
    assert_eq!(breakdown["favorites"], 0);
    assert_eq!(breakdown["genres"], 33);
}

#[tokio::test]
async fn test_rank_endpoint_excludes_and_caps() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/rank")
        .json(&json!({
            "signal": { "favorite_ids": ["tt0078748"] },
            "candidates": catalogue(),
            "limit": 10
        }))
        .await;
    response.assert_status_ok();

    // Capped at the configured maximum of 3
    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0090605", "tt0083658", "tt0088247"]);
}

#[tokio::test]
async fn test_rank_endpoint_empty_signal() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/rank")
        .json(&json!({ "signal": {}, "candidates": catalogue() }))
        .await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_content_endpoint_orders_by_similarity() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/content")
        .json(&json!({
            "profile": {
                "favorites": [
                    {
                        "movie_id": "tt0078748",
                        "genre": "Horror, Sci-Fi",
                        "director": "Ridley Scott",
                        "releaseDate": "1979-05-25"
                    }
                ]
            },
            "candidates": catalogue(),
            "limit": 1
        }))
        .await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0083658"]);
}

#[tokio::test]
async fn test_user_recommendations() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/alice/recommendations").await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert!(movies.is_empty());

    server
        .post("/api/v1/users/alice/library/films")
        .json(&json!({ "movie_id": "tt0078748", "title": "Alien" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/v1/users/alice/recommendations").await;
    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0090605", "tt0083658"]);

    let response = server
        .get("/api/v1/users/alice/recommendations")
        .add_query_param("limit", 1)
        .await;
    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0090605"]);
}

#[tokio::test]
async fn test_filter_endpoint() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/movies/filter")
        .json(&json!({
            "movies": catalogue(),
            "filter": { "genres": ["action"], "sort": "release_oldest" }
        }))
        .await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    assert_eq!(ids(&movies), vec!["tt0088247", "tt0090605"]);
}
