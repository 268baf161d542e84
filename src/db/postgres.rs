use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::{
    db::library::{validate_user_id, UserLibrary},
    error::AppResult,
    models::{validate_score, LibraryCollection, MovieId, MovieRecord, Rating},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Library stored in PostgreSQL
///
/// Movies are kept as JSONB so the record shape can grow without
/// migrations; ordering follows the serial `id` column.
#[derive(Clone)]
pub struct PgLibrary {
    pool: PgPool,
}

impl PgLibrary {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        tracing::info!("Library migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserLibrary for PgLibrary {
    async fn add_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie: MovieRecord,
    ) -> AppResult<()> {
        let user_id = validate_user_id(user_id)?;
        sqlx::query(
            r#"
            INSERT INTO library_entries (user_id, collection, movie_id, movie)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, collection, movie_id)
            DO UPDATE SET movie = EXCLUDED.movie
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(movie.movie_id.as_str().to_string())
        .bind(Json(&movie))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_movie(
        &self,
        user_id: &str,
        collection: LibraryCollection,
        movie_id: &MovieId,
    ) -> AppResult<bool> {
        let user_id = validate_user_id(user_id)?;
        let result = sqlx::query(
            r#"
            DELETE FROM library_entries
            WHERE user_id = $1 AND collection = $2 AND movie_id = $3
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(movie_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        user_id: &str,
        collection: LibraryCollection,
    ) -> AppResult<Vec<MovieRecord>> {
        let user_id = validate_user_id(user_id)?;
        let rows: Vec<(Json<MovieRecord>,)> = sqlx::query_as(
            r#"
            SELECT movie
            FROM library_entries
            WHERE user_id = $1 AND collection = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(movie),)| movie).collect())
    }

    async fn rate(&self, user_id: &str, movie_id: &MovieId, score: f64) -> AppResult<Rating> {
        let user_id = validate_user_id(user_id)?;
        let score = validate_score(score)?;

        let (rated_at,): (DateTime<Utc>,) = sqlx::query_as(
            r#"
            INSERT INTO ratings (user_id, movie_id, score, rated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, movie_id)
            DO UPDATE SET score = EXCLUDED.score, rated_at = EXCLUDED.rated_at
            RETURNING rated_at
            "#,
        )
        .bind(user_id)
        .bind(movie_id.as_str())
        .bind(score)
        .fetch_one(&self.pool)
        .await?;

        Ok(Rating {
            movie_id: movie_id.clone(),
            score,
            rated_at,
        })
    }

    async fn ratings(&self, user_id: &str) -> AppResult<Vec<Rating>> {
        let user_id = validate_user_id(user_id)?;
        let rows: Vec<(String, f64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT movie_id, score, rated_at
            FROM ratings
            WHERE user_id = $1
            ORDER BY rated_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut ratings = Vec::with_capacity(rows.len());
        for (movie_id, score, rated_at) in rows {
            match MovieId::parse(&movie_id) {
                Ok(movie_id) => ratings.push(Rating {
                    movie_id,
                    score,
                    rated_at,
                }),
                Err(_) => {
                    tracing::warn!(user_id = %user_id, "Skipping stored rating with blank movie_id")
                }
            }
        }

        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str) -> MovieRecord {
        let mut record = MovieRecord::new(MovieId::parse(id).unwrap(), title);
        record.genre = "Crime, Drama".to_string();
        record.release_date = "1995-12-15".to_string();
        record.country = Some("United States".to_string());
        record
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_round_trip_through_postgres() {
        let database_url = std::env::var("DATABASE_URL").unwrap();
        let pool = create_pool(&database_url).await.unwrap();
        let library = PgLibrary::new(pool.clone());
        library.migrate().await.unwrap();

        let user_id = format!("cinematch-test-{}", uuid::Uuid::new_v4());
        let collection = LibraryCollection::Favorites;

        library
            .add_movie(&user_id, collection, movie("tt0113277", "Heat"))
            .await
            .unwrap();
        library
            .add_movie(&user_id, collection, movie("tt0078748", "Alien"))
            .await
            .unwrap();
        library
            .add_movie(&user_id, collection, movie("tt0113277", "Heat (Director's Cut)"))
            .await
            .unwrap();

        // Re-adding replaces the record without moving it
        let favorites = library.list(&user_id, collection).await.unwrap();
        let ids: Vec<&str> = favorites.iter().map(|m| m.movie_id.as_str()).collect();
        assert_eq!(ids, vec!["tt0113277", "tt0078748"]);
        assert_eq!(favorites[0], movie("tt0113277", "Heat (Director's Cut)"));

        let alien = MovieId::parse("tt0078748").unwrap();
        assert!(library.remove_movie(&user_id, collection, &alien).await.unwrap());
        assert!(!library.remove_movie(&user_id, collection, &alien).await.unwrap());
        assert_eq!(library.list(&user_id, collection).await.unwrap().len(), 1);

        let heat = MovieId::parse("tt0113277").unwrap();
        library.rate(&user_id, &heat, 6.0).await.unwrap();
        library.rate(&user_id, &alien, 9.0).await.unwrap();
        let rerated = library.rate(&user_id, &heat, 8.5).await.unwrap();

        // The re-rated movie moves to the end of the rated_at order
        let ratings = library.ratings(&user_id).await.unwrap();
        let rated: Vec<(&str, f64)> = ratings
            .iter()
            .map(|r| (r.movie_id.as_str(), r.score))
            .collect();
        assert_eq!(rated, vec![("tt0078748", 9.0), ("tt0113277", 8.5)]);
        assert_eq!(ratings[1].rated_at, rerated.rated_at);

        assert!(library.rate(&user_id, &heat, 10.5).await.is_err());

        sqlx::query("INSERT INTO ratings (user_id, movie_id, score) VALUES ($1, '  ', 7)")
            .bind(&user_id)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(library.ratings(&user_id).await.unwrap().len(), 2);

        sqlx::query("DELETE FROM library_entries WHERE user_id = $1")
            .bind(&user_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM ratings WHERE user_id = $1")
            .bind(&user_id)
            .execute(&pool)
            .await
            .unwrap();
    }
}
