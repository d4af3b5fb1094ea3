//! Route definitions for the movie catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes merged at the root.
///
/// ```text
/// GET /movie/   -> list_movies
/// GET /movie    -> list_movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movie/", get(movie::list_movies))
        .route("/movie", get(movie::list_movies))
}
