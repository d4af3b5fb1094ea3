//! Topic models and DTOs.

use quill_core::error::CoreError;
use quill_core::pagination::SortOrder;
use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::split_csv;

/// Default priority for new topics.
pub const DEFAULT_TOPIC_PRIORITY: i32 = 1;

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: DbId,
    pub name: String,
    pub url: String,
    pub priority: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /topic/admin/topics`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopic {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub priority: Option<i32>,
}

/// Body of `PATCH /topic/admin/topics/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTopic {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub priority: Option<i32>,
}

/// Query parameters for `GET /topic/topics`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Comma-separated topic ids.
    pub topic_ids: Option<String>,
    pub sort_by_priority: Option<SortOrder>,
}

impl TopicListParams {
    /// Parsed `topicIds`. Any entry that is not an integer is rejected.
    pub fn ids(&self) -> Result<Vec<DbId>, CoreError> {
        split_csv(self.topic_ids.as_deref())
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|_| CoreError::Validation(format!("invalid topic id: {s}")))
            })
            .collect()
    }
}
