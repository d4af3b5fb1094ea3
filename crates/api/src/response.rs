//! Listing envelopes shared by handlers.
//!
//! Detail and mutation endpoints return the entity itself; paginated
//! listings return the page under a named key next to [`PageMeta`].

use quill_core::pagination::PageMeta;
use quill_db::models::topic::Topic;
use serde::Serialize;

/// `{ "topics": [...], "meta": {...} }` returned by `GET /topic/topics`.
#[derive(Debug, Serialize)]
pub struct TopicPage {
    pub topics: Vec<Topic>,
    pub meta: PageMeta,
}
