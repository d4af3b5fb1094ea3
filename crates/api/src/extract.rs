//! Request extractors that report malformed input through [`AppError`].
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text bodies (and
//! `422` for JSON data errors). These wrappers turn every rejection into
//! `400 VALIDATION_ERROR` with the usual `{ error, code }` envelope.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use quill_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

fn rejected(message: String) -> AppError {
    AppError::Core(CoreError::Validation(message))
}

/// JSON request body.
///
/// ```ignore
/// async fn create(AppJson(input): AppJson<CreateTopic>) -> AppResult<()> { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| rejected(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters, e.g. a numeric `{article_id}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| rejected(rejection.body_text()))?;
        Ok(Self(value))
    }
}
