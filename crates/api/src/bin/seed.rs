//! `quill-seed`: populate the database.
//!
//! With `APP_ENV=production` only the roles and the admin account from
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD` are ensured. Otherwise the content
//! tables are wiped and refilled with development data.

use anyhow::Context;
use quill_api::seed::{seed_admin, seed_development, SeedMode};
use quill_search::{ElasticIndex, SearchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    quill_api::init_tracing("quill_api=debug,quill_search=info");

    let mode = SeedMode::from_env().context("Invalid seed configuration")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = quill_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    quill_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match mode {
        SeedMode::Production {
            admin_email,
            admin_password,
        } => {
            seed_admin(&pool, &admin_email, &admin_password)
                .await
                .context("Failed seeding admin account")?;
        }
        SeedMode::Development => {
            let index = ElasticIndex::new(&SearchConfig::from_env())
                .context("Failed to build index client")?;
            if let Err(e) = index.ensure_index().await {
                tracing::warn!(
                    error = %e,
                    "Text index unavailable, seeded articles will not be searchable"
                );
            }
            seed_development(&pool, &index)
                .await
                .context("Failed seeding development data")?;
        }
    }

    Ok(())
}
