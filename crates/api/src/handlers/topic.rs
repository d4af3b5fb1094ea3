//! Handlers for the `/topic` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::error::CoreError;
use quill_core::pagination::{calculate_paginate, PageMeta};
use quill_core::slug::slugify;
use quill_core::types::DbId;
use quill_db::models::topic::{
    CreateTopic, Topic, TopicListParams, UpdateTopic, DEFAULT_TOPIC_PRIORITY,
};
use quill_db::repositories::TopicRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::TopicPage;
use crate::state::AppState;

/// GET /topic/topics
///
/// Paginated topics ordered by priority, optionally restricted to `topicIds`.
pub async fn list_topics(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TopicListParams>,
) -> AppResult<Json<TopicPage>> {
    let paginate = calculate_paginate(params.page, params.per_page);
    let ids = params.ids()?;
    let ids = (!ids.is_empty()).then_some(ids.as_slice());

    let (topics, total) = TopicRepo::list(
        &state.pool,
        ids,
        params.sort_by_priority.unwrap_or_default(),
        paginate,
    )
    .await?;

    Ok(Json(TopicPage {
        topics,
        meta: PageMeta::new(total, paginate),
    }))
}

/// GET /topic/topics/{topicUrl}
pub async fn get_topic(
    State(state): State<AppState>,
    AppPath(topic_url): AppPath<String>,
) -> AppResult<Json<Topic>> {
    let topic = TopicRepo::find_by_url(&state.pool, &topic_url)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            key: topic_url,
        }))?;

    Ok(Json(topic))
}

/// POST /topic/admin/topics
pub async fn create_topic(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTopic>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let url = slugify(&input.name)?;

    let topic = TopicRepo::create(
        &state.pool,
        input.name.trim(),
        &url,
        input.priority.unwrap_or(DEFAULT_TOPIC_PRIORITY),
    )
    .await?;

    tracing::info!(
        topic_id = topic.id,
        user_id = admin.user_id,
        url = %topic.url,
        "Topic created"
    );

    Ok((StatusCode::CREATED, Json(topic)))
}

/// PATCH /topic/admin/topics/{topicId}
///
/// A new name regenerates the slug.
pub async fn update_topic(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTopic>,
) -> AppResult<Json<Topic>> {
    input.validate()?;

    let name = input.name.as_deref().map(str::trim);
    let url = name.map(slugify).transpose()?;

    let topic = TopicRepo::update(&state.pool, topic_id, name, url.as_deref(), input.priority)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Topic", topic_id)))?;

    tracing::info!(topic_id, user_id = admin.user_id, "Topic updated");

    Ok(Json(topic))
}

/// DELETE /topic/admin/topics/{topicId}
///
/// Hard delete. Links to articles are removed with it.
pub async fn delete_topic(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TopicRepo::delete(&state.pool, topic_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Topic", topic_id)));
    }

    tracing::info!(topic_id, user_id = admin.user_id, "Topic deleted");

    Ok(StatusCode::NO_CONTENT)
}
