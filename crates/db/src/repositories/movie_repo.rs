//! Repository for the movie catalog (`movies`, `genres`, `artists`,
//! `movie_genres`, `movie_credits`).

use std::collections::HashMap;

use chrono::NaiveDate;
use quill_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::movie::{Artist, ArtistType, CreateMovie, Genre, Movie, MovieDetail};

/// Column list for `movies` queries.
const MOVIE_COLUMNS: &str = "id, title, short_url, description, year, released_date";

#[derive(Debug, FromRow)]
struct MovieGenreRow {
    movie_id: DbId,
    id: DbId,
    title: String,
}

#[derive(Debug, FromRow)]
struct CreditRow {
    movie_id: DbId,
    role: String,
    id: DbId,
    name: String,
    date_of_birth: NaiveDate,
    types: Vec<String>,
}

/// Provides catalog reads and the inserts used by seeding.
pub struct MovieRepo;

impl MovieRepo {
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, short_url, description, year, released_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MOVIE_COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.short_url)
            .bind(&input.description)
            .bind(&input.year)
            .bind(input.released_date)
            .fetch_one(pool)
            .await
    }

    /// Create a genre or return the existing one with the same title.
    pub async fn create_or_get_genre(pool: &PgPool, title: &str) -> Result<Genre, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (title) VALUES ($1) \
             ON CONFLICT (title) DO UPDATE SET title = EXCLUDED.title \
             RETURNING id, title",
        )
        .bind(title)
        .fetch_one(pool)
        .await
    }

    pub async fn create_artist(
        pool: &PgPool,
        name: &str,
        date_of_birth: NaiveDate,
        types: &[ArtistType],
    ) -> Result<Artist, sqlx::Error> {
        let types: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        sqlx::query_as::<_, Artist>(
            "INSERT INTO artists (name, date_of_birth, types) VALUES ($1, $2, $3) \
             RETURNING id, name, date_of_birth, types",
        )
        .bind(name)
        .bind(date_of_birth)
        .bind(&types)
        .fetch_one(pool)
        .await
    }

    pub async fn add_genre(
        pool: &PgPool,
        movie_id: DbId,
        genre_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(genre_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn add_credit(
        pool: &PgPool,
        movie_id: DbId,
        artist_id: DbId,
        role: ArtistType,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO movie_credits (movie_id, artist_id, role) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(artist_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove the whole catalog. Returns the number of movies deleted.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM movie_credits").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM movie_genres").execute(&mut *tx).await?;
        let movies = sqlx::query("DELETE FROM movies").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM artists").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM genres").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(movies.rows_affected())
    }

    /// Every movie with its genres and credits, ordered by id.
    pub async fn list_with_relations(pool: &PgPool) -> Result<Vec<MovieDetail>, sqlx::Error> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id");
        let movies = sqlx::query_as::<_, Movie>(&query).fetch_all(pool).await?;
        if movies.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();

        let genre_rows = sqlx::query_as::<_, MovieGenreRow>(
            "SELECT mg.movie_id, g.id, g.title \
             FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = ANY($1) \
             ORDER BY g.title",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let credit_rows = sqlx::query_as::<_, CreditRow>(
            "SELECT mc.movie_id, mc.role, a.id, a.name, a.date_of_birth, a.types \
             FROM movie_credits mc JOIN artists a ON a.id = mc.artist_id \
             WHERE mc.movie_id = ANY($1) \
             ORDER BY a.name",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut genres: HashMap<DbId, Vec<Genre>> = HashMap::new();
        for row in genre_rows {
            genres.entry(row.movie_id).or_default().push(Genre {
                id: row.id,
                title: row.title,
            });
        }

        let mut credits: HashMap<(DbId, String), Vec<Artist>> = HashMap::new();
        for row in credit_rows {
            credits
                .entry((row.movie_id, row.role))
                .or_default()
                .push(Artist {
                    id: row.id,
                    name: row.name,
                    date_of_birth: row.date_of_birth,
                    types: row.types,
                });
        }

        let mut take = |movie_id: DbId, role: ArtistType| {
            credits
                .remove(&(movie_id, role.as_str().to_string()))
                .unwrap_or_default()
        };

        Ok(movies
            .into_iter()
            .map(|movie| {
                let id = movie.id;
                MovieDetail {
                    genres: genres.remove(&id).unwrap_or_default(),
                    directors: take(id, ArtistType::Director),
                    writers: take(id, ArtistType::Writer),
                    actors: take(id, ArtistType::Actor),
                    movie,
                }
            })
            .collect())
    }
}
