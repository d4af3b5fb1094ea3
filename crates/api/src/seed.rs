//! Database seeding for fresh deployments and local development.
//!
//! In production only the fixed roles and one admin account are ensured.
//! Everywhere else the content tables are wiped and refilled with a small
//! deterministic data set (users, topics, articles and a small movie
//! catalog); every seeded article is pushed to the text index.

use chrono::NaiveDate;
use quill_core::error::CoreError;
use quill_core::ports::ArticleSearch;
use quill_core::reading_time::time_to_read;
use quill_core::roles::Role;
use quill_core::slug::slugify;
use quill_core::visibility::Visibility;
use quill_db::models::article::CreateArticle;
use quill_db::models::movie::{ArtistType, CreateMovie};
use quill_db::models::user::{CreateUser, User};
use quill_db::repositories::{ArticleRepo, MovieRepo, TopicRepo, UserRepo};
use quill_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::ConfigError;

/// Password given to every development user.
pub const DEV_PASSWORD: &str = "123456";

/// Topics created by the development seed, as `(name, priority)`.
const DEV_TOPICS: [(&str, i32); 2] = [("Topic 1", 1), ("Topic 2", 2)];

/// Articles created per development user.
const ARTICLES_PER_USER: usize = 2;

/// A credited person in the development catalog: `(name, born (y, m, d))`.
type SampleArtist = (&'static str, (i32, u32, u32));

struct SampleMovie {
    title: &'static str,
    short_url: &'static str,
    description: &'static str,
    released: (i32, u32, u32),
    genres: &'static [&'static str],
    director: SampleArtist,
    actors: &'static [SampleArtist],
}

const DEV_MOVIES: [SampleMovie; 2] = [
    SampleMovie {
        title: "Arrival",
        short_url: "arrival",
        description: "A linguist is recruited to talk with visitors from another world.",
        released: (2016, 11, 11),
        genres: &["Drama", "Sci-Fi"],
        director: ("Denis Villeneuve", (1967, 10, 3)),
        actors: &[("Amy Adams", (1974, 8, 20))],
    },
    SampleMovie {
        title: "Spirited Away",
        short_url: "spirited-away",
        description: "A girl has to work in a bathhouse for spirits to free her parents.",
        released: (2001, 7, 20),
        genres: &["Animation", "Fantasy"],
        director: ("Hayao Miyazaki", (1941, 1, 5)),
        actors: &[("Rumi Hiiragi", (1987, 8, 1))],
    },
];

const SAMPLE_CONTENT: &str = "\
# 1. What is a higher-order function?

A higher-order function takes a function as an argument or returns one.

# 2. Passing a function as an argument

```rust
fn apply<F: Fn(i32) -> i32>(f: F, x: i32) -> i32 {
    f(x)
}
```

# 3. Returning a function

```rust
fn adder(n: i32) -> impl Fn(i32) -> i32 {
    move |x| x + n
}
```
";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Password error: {0}")]
    Password(String),
}

/// What to seed, decided by `APP_ENV`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedMode {
    Production {
        admin_email: String,
        admin_password: String,
    },
    Development,
}

impl SeedMode {
    /// | Env Var          | Required                        |
    /// |------------------|---------------------------------|
    /// | `APP_ENV`        | no (`production` selects prod)  |
    /// | `ADMIN_EMAIL`    | when `APP_ENV=production`       |
    /// | `ADMIN_PASSWORD` | when `APP_ENV=production`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_default();
        if !env.eq_ignore_ascii_case("production") {
            return Ok(SeedMode::Development);
        }

        let admin_email = std::env::var("ADMIN_EMAIL")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ADMIN_EMAIL"))?;
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;

        Ok(SeedMode::Production {
            admin_email,
            admin_password,
        })
    }
}

/// Row counts produced by a development seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub topics: usize,
    pub articles: usize,
    /// Articles the text index accepted.
    pub indexed: usize,
    pub movies: usize,
}

/// Ensure the fixed roles and an admin account with `email`.
///
/// An existing account keeps its password and is granted the admin role.
pub async fn seed_admin(pool: &DbPool, email: &str, password: &str) -> Result<User, SeedError> {
    UserRepo::ensure_roles(pool).await?;

    let user = match UserRepo::find_by_email(pool, email).await? {
        Some(existing) => {
            tracing::info!(user_id = existing.id, "Admin account already exists");
            existing
        }
        None => {
            validate_password_strength(password, MIN_PASSWORD_LENGTH)
                .map_err(SeedError::Password)?;
            let password_hash =
                hash_password(password).map_err(|e| SeedError::Password(e.to_string()))?;
            UserRepo::create(
                pool,
                &CreateUser {
                    email: email.to_string(),
                    name: "Admin".to_string(),
                    password_hash,
                },
            )
            .await?
        }
    };

    UserRepo::assign_role(pool, user.id, Role::Admin).await?;
    tracing::info!(user_id = user.id, "Seeded admin account");
    Ok(user)
}

/// Delete articles, topics, users, roles and the movie catalog.
pub async fn clear_database(pool: &DbPool) -> Result<(), sqlx::Error> {
    let articles = ArticleRepo::delete_all(pool).await?;
    let topics = TopicRepo::delete_all(pool).await?;
    let users = UserRepo::delete_all(pool).await?;
    let roles = UserRepo::delete_all_roles(pool).await?;
    let movies = MovieRepo::delete_all(pool).await?;

    tracing::info!(articles, topics, users, roles, movies, "Cleared database");
    Ok(())
}

/// Wipe and refill the development data set.
///
/// Seeds the roles, one user per role, [`DEV_TOPICS`],
/// [`ARTICLES_PER_USER`] articles per user linked to every topic and a
/// small movie catalog. Each article is indexed through `index`; index
/// failures are logged only.
pub async fn seed_development<I: ArticleSearch>(
    pool: &DbPool,
    index: &I,
) -> Result<SeedSummary, SeedError> {
    clear_database(pool).await?;
    UserRepo::ensure_roles(pool).await?;

    let password_hash =
        hash_password(DEV_PASSWORD).map_err(|e| SeedError::Password(e.to_string()))?;

    let mut users = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let user = UserRepo::create(
            pool,
            &CreateUser {
                email: format!("{}@quill.local", role.as_str()),
                name: format!("{} user", role.as_str()),
                password_hash: password_hash.clone(),
            },
        )
        .await?;
        UserRepo::assign_role(pool, user.id, role).await?;
        users.push(user);
    }
    tracing::debug!(count = users.len(), "Seeded users");

    let mut topic_ids = Vec::with_capacity(DEV_TOPICS.len());
    for (name, priority) in DEV_TOPICS {
        let topic = TopicRepo::create(pool, name, &slugify(name)?, priority).await?;
        topic_ids.push(topic.id);
    }
    tracing::debug!(count = topic_ids.len(), "Seeded topics");

    let mut summary = SeedSummary {
        users: users.len(),
        topics: topic_ids.len(),
        ..SeedSummary::default()
    };

    for user in &users {
        for n in 1..=ARTICLES_PER_USER {
            let title = format!("{} article {n}", user.name);
            let input = CreateArticle {
                title: title.clone(),
                description: format!("Sample article {n} written by {}", user.name),
                image: "https://picsum.photos/seed/quill/800/400".to_string(),
                content: SAMPLE_CONTENT.to_string(),
                visibility: if n == 1 {
                    Visibility::Public
                } else {
                    Visibility::Private
                },
                topics: topic_ids.clone(),
            };

            let article = ArticleRepo::create(
                pool,
                &input,
                &slugify(&title)?,
                &time_to_read(&input.content),
                user.id,
            )
            .await?;
            summary.articles += 1;

            match index.index_article(&article.to_indexed()).await {
                Ok(()) => summary.indexed += 1,
                Err(e) => tracing::warn!(
                    article_id = article.id,
                    error = %e,
                    "Failed to index seeded article"
                ),
            }
        }
    }

    summary.movies = seed_catalog(pool).await?;

    tracing::info!(
        users = summary.users,
        topics = summary.topics,
        articles = summary.articles,
        indexed = summary.indexed,
        movies = summary.movies,
        "Development seed complete"
    );
    Ok(summary)
}

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, SeedError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SeedError::Core(CoreError::Validation(format!(
            "invalid date {year}-{month}-{day}"
        )))
    })
}

/// Insert [`DEV_MOVIES`] with their genres and credits.
async fn seed_catalog(pool: &DbPool) -> Result<usize, SeedError> {
    for sample in &DEV_MOVIES {
        let movie = MovieRepo::create(
            pool,
            &CreateMovie {
                title: sample.title.to_string(),
                short_url: sample.short_url.to_string(),
                description: sample.description.to_string(),
                year: sample.released.0.to_string(),
                released_date: date(sample.released)?,
            },
        )
        .await?;

        for title in sample.genres {
            let genre = MovieRepo::create_or_get_genre(pool, title).await?;
            MovieRepo::add_genre(pool, movie.id, genre.id).await?;
        }

        let credits = std::iter::once((sample.director, ArtistType::Director))
            .chain(sample.actors.iter().map(|a| (*a, ArtistType::Actor)));
        for ((name, born), role) in credits {
            let artist = MovieRepo::create_artist(pool, name, date(born)?, &[role]).await?;
            MovieRepo::add_credit(pool, movie.id, artist.id, role).await?;
        }
    }

    tracing::debug!(count = DEV_MOVIES.len(), "Seeded movie catalog");
    Ok(DEV_MOVIES.len())
}
