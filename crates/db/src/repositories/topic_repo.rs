//! Repository for the `topics` table.

use quill_core::pagination::{Paginate, SortOrder};
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::topic::Topic;

/// Column list for `topics` queries.
const TOPIC_COLUMNS: &str = "id, name, url, priority, created_at, updated_at";

/// Provides CRUD operations for topics.
pub struct TopicRepo;

impl TopicRepo {
    /// Insert a topic. Duplicate name or url violates `uq_topics_*`.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        url: &str,
        priority: i32,
    ) -> Result<Topic, sqlx::Error> {
        let query = format!(
            "INSERT INTO topics (name, url, priority) VALUES ($1, $2, $3) \
             RETURNING {TOPIC_COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(name)
            .bind(url)
            .bind(priority)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_url(pool: &PgPool, url: &str) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE url = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(url)
            .fetch_optional(pool)
            .await
    }

    /// One page of topics ordered by priority, optionally restricted to `ids`,
    /// plus the unpaged count.
    pub async fn list(
        pool: &PgPool,
        ids: Option<&[DbId]>,
        sort: SortOrder,
        paginate: Paginate,
    ) -> Result<(Vec<Topic>, i64), sqlx::Error> {
        let direction = sort.as_sql();
        let query = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE ($1::BIGINT[] IS NULL OR id = ANY($1)) \
             ORDER BY priority {direction}, id \
             LIMIT $2 OFFSET $3"
        );
        let topics = sqlx::query_as::<_, Topic>(&query)
            .bind(ids)
            .bind(paginate.limit)
            .bind(paginate.skip)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM topics WHERE ($1::BIGINT[] IS NULL OR id = ANY($1))",
        )
        .bind(ids)
        .fetch_one(pool)
        .await?;

        Ok((topics, total))
    }

    /// Update `name`, `url` and/or `priority`.
    ///
    /// Returns `None` if no topic with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        url: Option<&str>,
        priority: Option<i32>,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!(
            "UPDATE topics SET \
                 name = COALESCE($2, name), \
                 url = COALESCE($3, url), \
                 priority = COALESCE($4, priority) \
             WHERE id = $1 \
             RETURNING {TOPIC_COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .bind(name)
            .bind(url)
            .bind(priority)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a topic. Article links cascade.
    ///
    /// Returns `true` if a topic was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every topic. Used by the development seeder.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM topics").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
