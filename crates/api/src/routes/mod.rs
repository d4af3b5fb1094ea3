pub mod article;
pub mod auth;
pub mod health;
pub mod movie;
pub mod topic;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// Route hierarchy:
///
/// ```text
/// /article/articles                        list (public)
/// /article/articles/{articleUrl}           detail by slug (public)
/// /article/admin/articles                  list, create (admin)
/// /article/admin/articles/{articleId}      update, soft delete (admin, owner)
///
/// /topic/topics                            list (public)
/// /topic/topics/{topicUrl}                 detail by slug (public)
/// /topic/admin/topics                      create (admin)
/// /topic/admin/topics/{topicId}            update, delete (admin)
///
/// /movie/                                  list with genres and credits (public)
///
/// /auth/login                              login (public)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/article", article::router())
        .nest("/topic", topic::router())
        .nest("/auth", auth::router())
        .merge(movie::router())
}
