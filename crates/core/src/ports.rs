//! Storage and text-index ports used by the article query composer.
//!
//! `quill-db` implements [`ArticleStore`] over PostgreSQL and `quill-search`
//! implements [`ArticleSearch`] over an Elasticsearch-compatible index.

use async_trait::async_trait;
use serde::Serialize;

use crate::pagination::SortOrder;
use crate::types::{DbId, Timestamp};
use crate::visibility::Visibility;

// ---------------------------------------------------------------------------
// Listing rows
// ---------------------------------------------------------------------------

/// Author projection attached to listed articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRef {
    pub id: DbId,
    pub name: String,
}

/// Topic projection attached to listed articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRef {
    pub id: DbId,
    pub name: String,
    pub url: String,
}

/// One row of an article listing.
///
/// `topics` is `None` when the listing did not project topic fields
/// (admin listings without a topic filter) and is then omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: DbId,
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub time_to_read: String,
    pub created_at: Timestamp,
    pub created_by: Option<AuthorRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<TopicRef>>,
}

// ---------------------------------------------------------------------------
// Relational filter
// ---------------------------------------------------------------------------

/// Fully resolved relational filter handed to an [`ArticleStore`].
///
/// Every `Option` that is `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Restrict to `visibility = public AND delete_soft = false`.
    pub public_only: bool,
    /// Candidate ids from the text index.
    pub ids: Option<Vec<DbId>>,
    pub visibilities: Option<Vec<Visibility>>,
    pub delete_soft: Option<bool>,
    /// Keep articles linked to at least one of these topic slugs.
    pub topic_urls: Option<Vec<String>>,
    /// Load topic projections for each row.
    pub include_topics: bool,
    pub sort: SortOrder,
    pub limit: i64,
    pub skip: i64,
}

/// Relational side of article listing.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return one page of rows plus the unpaged match count.
    async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<(Vec<ArticleSummary>, i64), Self::Error>;
}

// ---------------------------------------------------------------------------
// Text index
// ---------------------------------------------------------------------------

/// Document shape kept in the text index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedArticle {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// Free-text query sent to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub text: String,
    pub sort: SortOrder,
    pub skip: i64,
    pub limit: i64,
}

/// Full-text index holding article headlines.
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ids of articles whose title or description match `query.text`.
    async fn search(&self, query: &TextQuery) -> Result<Vec<DbId>, Self::Error>;

    /// Insert or replace the document for `article.id`.
    async fn index_article(&self, article: &IndexedArticle) -> Result<(), Self::Error>;

    /// Drop every document with the given article id.
    async fn remove_article(&self, article_id: DbId) -> Result<(), Self::Error>;
}
