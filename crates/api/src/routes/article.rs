//! Route definitions for the `/article` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::article;
use crate::state::AppState;

/// Routes mounted at `/article`.
///
/// ```text
/// GET    /articles                        -> list_articles
/// GET    /articles/{articleUrl}           -> get_article
/// GET    /admin/articles                  -> list_admin_articles (admin)
/// POST   /admin/articles                  -> create_article (admin)
/// PATCH  /admin/articles/{articleId}      -> update_article (admin, owner)
/// DELETE /admin/articles/{articleId}      -> delete_article (admin, owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(article::list_articles))
        .route("/articles/{article_url}", get(article::get_article))
        .route(
            "/admin/articles",
            get(article::list_admin_articles).post(article::create_article),
        )
        .route(
            "/admin/articles/{article_id}",
            patch(article::update_article).delete(article::delete_article),
        )
}
