/// Domain-level failures raised by services and repositories.
///
/// The API layer maps each variant to an HTTP status; see
/// `quill_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique column (slug, name, email) already holds the value.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is authenticated but does not own the resource.
    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by numeric id.
    pub fn not_found(entity: &'static str, id: crate::types::DbId) -> Self {
        Self::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}
