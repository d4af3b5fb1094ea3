//! Movie catalog models: movies, genres, artists and typed credits.

use chrono::NaiveDate;
use quill_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role an artist plays on a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistType {
    Director,
    Writer,
    Actor,
}

impl ArtistType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtistType::Director => "director",
            ArtistType::Writer => "writer",
            ArtistType::Actor => "actor",
        }
    }
}

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub short_url: String,
    pub description: String,
    pub year: String,
    pub released_date: NaiveDate,
}

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub title: String,
}

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: DbId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub types: Vec<String>,
}

/// A movie with its genres and credits, as returned by `GET /movie/`.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub directors: Vec<Artist>,
    pub writers: Vec<Artist>,
    pub actors: Vec<Artist>,
}

/// Insert payload for a movie.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    pub title: String,
    pub short_url: String,
    pub description: String,
    pub year: String,
    pub released_date: NaiveDate,
}
