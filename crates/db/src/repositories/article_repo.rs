//! Repository for the `articles` and `article_topics` tables.
//!
//! Listing goes through [`PgArticleStore`], which implements the
//! [`ArticleStore`] port used by the article query composer.

use std::collections::HashMap;

use async_trait::async_trait;
use quill_core::article_guard::DerivedColumns;
use quill_core::ports::{ArticleFilter, ArticleStore, ArticleSummary, AuthorRef, TopicRef};
use quill_core::types::{DbId, Timestamp};
use quill_core::visibility::Visibility;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::article::{Article, CreateArticle, UpdateArticle};
use crate::models::topic::Topic;

/// Column list for `articles` queries.
const ARTICLE_COLUMNS: &str = "\
    id, url, title, image, description, content, time_to_read, visibility, \
    delete_soft, created_by, created_at, updated_at";

/// Shared `WHERE` body for listing and counting.
///
/// Binds: `$1` public scope, `$2` candidate ids, `$3` visibilities,
/// `$4` soft-delete flag, `$5` topic slugs. A NULL bind disables its clause.
const LIST_PREDICATE: &str = "\
    ($1::BOOLEAN = FALSE OR (a.visibility = 'public' AND a.delete_soft = FALSE)) \
    AND ($2::BIGINT[] IS NULL OR a.id = ANY($2)) \
    AND ($3::TEXT[] IS NULL OR a.visibility = ANY($3)) \
    AND ($4::BOOLEAN IS NULL OR a.delete_soft = $4) \
    AND ($5::TEXT[] IS NULL OR EXISTS ( \
        SELECT 1 FROM article_topics at \
        JOIN topics t ON t.id = at.topic_id \
        WHERE at.article_id = a.id AND t.url = ANY($5)))";

/// Listing row before topic projections are attached.
#[derive(Debug, FromRow)]
struct SummaryRow {
    id: DbId,
    url: String,
    title: String,
    description: String,
    image: String,
    time_to_read: String,
    created_at: Timestamp,
    author_id: Option<DbId>,
    author_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct ArticleTopicRow {
    article_id: DbId,
    id: DbId,
    name: String,
    url: String,
}

/// Provides CRUD operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert an article and link the given topics in one transaction.
    ///
    /// Topic ids that do not exist are skipped.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        url: &str,
        time_to_read: &str,
        created_by: DbId,
    ) -> Result<Article, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO articles \
                 (url, title, image, description, content, time_to_read, visibility, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(url)
            .bind(&input.title)
            .bind(&input.image)
            .bind(&input.description)
            .bind(&input.content)
            .bind(time_to_read)
            .bind(input.visibility.as_str())
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        link_topics(&mut tx, article.id, &input.topics).await?;
        tx.commit().await?;

        Ok(article)
    }

    /// Find an article by id regardless of visibility or soft-delete state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live article reachable by url (`public` or `withLink`).
    pub async fn find_linkable_by_url(
        pool: &PgPool,
        url: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE url = $1 \
               AND visibility = ANY($2) \
               AND delete_soft = FALSE"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(url)
            .bind(Visibility::linkable_names())
            .fetch_optional(pool)
            .await
    }

    /// Topics linked to an article, ordered by priority.
    pub async fn topics_for(pool: &PgPool, article_id: DbId) -> Result<Vec<Topic>, sqlx::Error> {
        sqlx::query_as::<_, Topic>(
            "SELECT t.id, t.name, t.url, t.priority, t.created_at, t.updated_at \
             FROM topics t \
             JOIN article_topics at ON at.topic_id = t.id \
             WHERE at.article_id = $1 \
             ORDER BY t.priority, t.id",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }

    /// Overlay present fields onto the stored row.
    ///
    /// `derived` carries the regenerated slug / read time, if any. When
    /// `input.topics` is present the topic set is replaced.
    /// Returns `None` if no article with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
        derived: &DerivedColumns,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE articles SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 image = COALESCE($4, image), \
                 content = COALESCE($5, content), \
                 visibility = COALESCE($6, visibility), \
                 url = COALESCE($7, url), \
                 time_to_read = COALESCE($8, time_to_read) \
             WHERE id = $1 \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.image.as_deref())
            .bind(input.content.as_deref())
            .bind(input.visibility.map(|v| v.as_str()))
            .bind(derived.url.as_deref())
            .bind(derived.time_to_read.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(article), Some(topics)) = (&article, &input.topics) {
            sqlx::query("DELETE FROM article_topics WHERE article_id = $1")
                .bind(article.id)
                .execute(&mut *tx)
                .await?;
            link_topics(&mut tx, article.id, topics).await?;
        }

        tx.commit().await?;
        Ok(article)
    }

    /// Flag an article as deleted. The row and its topic links are kept.
    ///
    /// Returns `true` if the flag was flipped (i.e. it was not already set).
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE articles SET delete_soft = TRUE WHERE id = $1 AND delete_soft = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every article. Used by the development seeder.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// One page of articles matching `filter`, plus the unpaged count.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
    ) -> Result<(Vec<ArticleSummary>, i64), sqlx::Error> {
        let visibilities: Option<Vec<String>> = filter
            .visibilities
            .as_ref()
            .map(|v| v.iter().map(|v| v.as_str().to_string()).collect());
        let direction = filter.sort.as_sql();

        let page_query = format!(
            "SELECT a.id, a.url, a.title, a.description, a.image, a.time_to_read, \
                    a.created_at, u.id AS author_id, u.name AS author_name \
             FROM articles a \
             LEFT JOIN users u ON u.id = a.created_by \
             WHERE {LIST_PREDICATE} \
             ORDER BY a.created_at {direction}, a.id {direction} \
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, SummaryRow>(&page_query)
            .bind(filter.public_only)
            .bind(filter.ids.as_deref())
            .bind(visibilities.as_deref())
            .bind(filter.delete_soft)
            .bind(filter.topic_urls.as_deref())
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM articles a WHERE {LIST_PREDICATE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.public_only)
            .bind(filter.ids.as_deref())
            .bind(visibilities.as_deref())
            .bind(filter.delete_soft)
            .bind(filter.topic_urls.as_deref())
            .fetch_one(pool)
            .await?;

        let mut topics = if filter.include_topics && !rows.is_empty() {
            let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
            topic_refs_for(pool, &ids).await?
        } else {
            HashMap::new()
        };

        let articles = rows
            .into_iter()
            .map(|row| {
                let created_by = match (row.author_id, row.author_name) {
                    (Some(id), Some(name)) => Some(AuthorRef { id, name }),
                    _ => None,
                };
                let topics = filter
                    .include_topics
                    .then(|| topics.remove(&row.id).unwrap_or_default());

                ArticleSummary {
                    id: row.id,
                    url: row.url,
                    title: row.title,
                    description: row.description,
                    image: row.image,
                    time_to_read: row.time_to_read,
                    created_at: row.created_at,
                    created_by,
                    topics,
                }
            })
            .collect();

        Ok((articles, total))
    }
}

/// Link `topic_ids` to an article, skipping ids with no topic row.
async fn link_topics(
    tx: &mut Transaction<'_, Postgres>,
    article_id: DbId,
    topic_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if topic_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO article_topics (article_id, topic_id) \
         SELECT $1, id FROM topics WHERE id = ANY($2) \
         ON CONFLICT DO NOTHING",
    )
    .bind(article_id)
    .bind(topic_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Topic projections for a page of articles, keyed by article id.
async fn topic_refs_for(
    pool: &PgPool,
    article_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<TopicRef>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ArticleTopicRow>(
        "SELECT at.article_id, t.id, t.name, t.url \
         FROM article_topics at \
         JOIN topics t ON t.id = at.topic_id \
         WHERE at.article_id = ANY($1) \
         ORDER BY t.priority, t.id",
    )
    .bind(article_ids)
    .fetch_all(pool)
    .await?;

    let mut by_article: HashMap<DbId, Vec<TopicRef>> = HashMap::new();
    for row in rows {
        by_article.entry(row.article_id).or_default().push(TopicRef {
            id: row.id,
            name: row.name,
            url: row.url,
        });
    }
    Ok(by_article)
}

// ---------------------------------------------------------------------------
// Listing port
// ---------------------------------------------------------------------------

/// [`ArticleStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    type Error = sqlx::Error;

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<(Vec<ArticleSummary>, i64), sqlx::Error> {
        ArticleRepo::list(&self.pool, filter).await
    }
}
