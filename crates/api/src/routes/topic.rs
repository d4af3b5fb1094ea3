//! Route definitions for the `/topic` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::topic;
use crate::state::AppState;

/// Routes mounted at `/topic`.
///
/// ```text
/// GET    /topics                     -> list_topics
/// GET    /topics/{topicUrl}          -> get_topic
/// POST   /admin/topics               -> create_topic (admin)
/// PATCH  /admin/topics/{topicId}     -> update_topic (admin)
/// DELETE /admin/topics/{topicId}     -> delete_topic (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/topics", get(topic::list_topics))
        .route("/topics/{topic_url}", get(topic::get_topic))
        .route("/admin/topics", post(topic::create_topic))
        .route(
            "/admin/topics/{topic_id}",
            patch(topic::update_topic).delete(topic::delete_topic),
        )
}
