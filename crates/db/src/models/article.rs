//! Article models, DTOs and listing parameters.

use quill_core::article_query::{ArticleListQuery, ListingScope};
use quill_core::error::CoreError;
use quill_core::pagination::SortOrder;
use quill_core::ports::IndexedArticle;
use quill_core::types::{DbId, Timestamp};
use quill_core::visibility::Visibility;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::split_csv;
use super::topic::Topic;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: DbId,
    pub url: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub content: String,
    pub time_to_read: String,
    #[sqlx(try_from = "String")]
    pub visibility: Visibility,
    pub delete_soft: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    /// Headline fields mirrored into the text index.
    pub fn to_indexed(&self) -> IndexedArticle {
        IndexedArticle {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

/// An article together with its linked topics (detail and mutation responses).
#[derive(Debug, Clone, Serialize)]
pub struct ArticleWithTopics {
    #[serde(flatten)]
    pub article: Article,
    pub topics: Vec<Topic>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /article/admin/articles`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArticle {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub image: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// Ids of topics to link. Unknown ids are ignored.
    #[serde(default)]
    pub topics: Vec<DbId>,
}

/// Body of `PATCH /article/admin/articles/{id}`. Absent fields are left as is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticle {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    /// Replaces the full topic set when present.
    pub topics: Option<Vec<DbId>>,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /article/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListParams {
    pub text_search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Comma-separated topic slugs.
    pub topic_urls: Option<String>,
    pub sort_by_date: Option<SortOrder>,
}

impl ArticleListParams {
    pub fn into_query(self) -> ArticleListQuery {
        ArticleListQuery {
            scope: ListingScope::Public,
            text_search: self.text_search,
            topic_urls: split_csv(self.topic_urls.as_deref()),
            page: self.page,
            per_page: self.per_page,
            sort_by_date: self.sort_by_date,
        }
    }
}

/// Query parameters for `GET /article/admin/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminArticleListParams {
    pub text_search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Comma-separated topic slugs.
    pub topic_urls: Option<String>,
    pub sort_by_date: Option<SortOrder>,
    pub delete_soft: Option<bool>,
    /// Comma-separated visibilities (`private,withLink`).
    pub visibilities: Option<String>,
}

impl AdminArticleListParams {
    /// Fails with [`CoreError::Validation`] on an unknown visibility.
    pub fn into_query(self) -> Result<ArticleListQuery, CoreError> {
        let visibilities = split_csv(self.visibilities.as_deref())
            .iter()
            .map(|v| v.parse::<Visibility>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticleListQuery {
            scope: ListingScope::Admin {
                visibilities,
                delete_soft: self.delete_soft,
            },
            text_search: self.text_search,
            topic_urls: split_csv(self.topic_urls.as_deref()),
            page: self.page,
            per_page: self.per_page,
            sort_by_date: self.sort_by_date,
        })
    }
}
