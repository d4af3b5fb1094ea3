//! Handlers for the `/article` resource.
//!
//! Public endpoints list and show articles visible to anonymous readers.
//! Admin endpoints require [`RequireAdmin`]; update and delete additionally
//! require the caller to own the article. Every write is mirrored to the text
//! index through the [`IndexQueue`](quill_search::IndexQueue) and never waits
//! on it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::article_guard::{derive_columns, ensure_owner};
use quill_core::article_query::{ArticlePage, ArticleQueryComposer};
use quill_core::error::CoreError;
use quill_core::reading_time::time_to_read;
use quill_core::slug::slugify;
use quill_core::types::DbId;
use quill_db::models::article::{
    AdminArticleListParams, Article, ArticleListParams, ArticleWithTopics, CreateArticle,
    UpdateArticle,
};
use quill_db::repositories::{ArticleRepo, PgArticleStore};
use quill_search::ElasticIndex;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

fn composer(state: &AppState) -> ArticleQueryComposer<PgArticleStore, ElasticIndex> {
    ArticleQueryComposer::new(
        PgArticleStore::new(state.pool.clone()),
        Arc::clone(&state.search),
        state.config.search_candidate_limit,
    )
}

/// Load an article by id or fail with 404.
async fn find_article(state: &AppState, article_id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(&state.pool, article_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Article", article_id)))
}

async fn with_topics(state: &AppState, article: Article) -> AppResult<ArticleWithTopics> {
    let topics = ArticleRepo::topics_for(&state.pool, article.id).await?;
    Ok(ArticleWithTopics { article, topics })
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /article/articles
///
/// Public, non-deleted articles with their topics.
pub async fn list_articles(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArticleListParams>,
) -> AppResult<Json<ArticlePage>> {
    let page = composer(&state).list(&params.into_query()).await?;
    Ok(Json(page))
}

/// GET /article/articles/{articleUrl}
///
/// Detail by slug. Private and soft-deleted articles are reported as missing.
pub async fn get_article(
    State(state): State<AppState>,
    AppPath(article_url): AppPath<String>,
) -> AppResult<Json<ArticleWithTopics>> {
    let article = ArticleRepo::find_linkable_by_url(&state.pool, &article_url)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            key: article_url,
        }))?;

    Ok(Json(with_topics(&state, article).await?))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /article/admin/articles
///
/// Every article regardless of visibility, narrowed by the optional
/// `visibilities` and `deleteSoft` filters.
pub async fn list_admin_articles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AdminArticleListParams>,
) -> AppResult<Json<ArticlePage>> {
    let query = params.into_query()?;
    let page = composer(&state).list(&query).await?;
    Ok(Json(page))
}

/// POST /article/admin/articles
///
/// The slug is derived from the title; a duplicate slug is a conflict.
pub async fn create_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let url = slugify(&input.title)?;
    let read_time = time_to_read(&input.content);

    let article =
        ArticleRepo::create(&state.pool, &input, &url, &read_time, admin.user_id).await?;
    state.index_queue.index(article.to_indexed());

    tracing::info!(
        article_id = article.id,
        user_id = admin.user_id,
        url = %article.url,
        "Article created"
    );

    Ok((StatusCode::CREATED, Json(with_topics(&state, article).await?)))
}

/// PATCH /article/admin/articles/{articleId}
///
/// Owner only. Present fields overwrite the stored ones.
pub async fn update_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(article_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateArticle>,
) -> AppResult<Json<ArticleWithTopics>> {
    let current = find_article(&state, article_id).await?;
    ensure_owner(current.created_by, admin.user_id)?;
    input.validate()?;

    let derived = derive_columns(
        &current.title,
        input.title.as_deref(),
        input.content.as_deref(),
    )?;

    let article = ArticleRepo::update(&state.pool, article_id, &input, &derived)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Article", article_id)))?;
    state.index_queue.index(article.to_indexed());

    tracing::info!(article_id, user_id = admin.user_id, "Article updated");

    Ok(Json(with_topics(&state, article).await?))
}

/// DELETE /article/admin/articles/{articleId}
///
/// Owner only. Flags the article as deleted and queues index removal.
pub async fn delete_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(article_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let article = find_article(&state, article_id).await?;
    ensure_owner(article.created_by, admin.user_id)?;

    let flipped = ArticleRepo::soft_delete(&state.pool, article_id).await?;
    state.index_queue.remove(article_id);

    tracing::info!(
        article_id,
        user_id = admin.user_id,
        already_deleted = !flipped,
        "Article soft-deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
