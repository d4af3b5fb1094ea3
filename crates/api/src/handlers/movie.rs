//! Handlers for the `/movie` catalog.

use axum::extract::State;
use axum::Json;
use quill_db::models::movie::MovieDetail;
use quill_db::repositories::MovieRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /movie/
///
/// Every movie with its genres and director / writer / actor credits.
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieDetail>>> {
    let movies = MovieRepo::list_with_relations(&state.pool).await?;
    Ok(Json(movies))
}
