use std::sync::Arc;

use quill_search::{ElasticIndex, IndexQueue};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quill_db::DbPool,
    /// Server configuration (JWT settings, search candidate limit).
    pub config: Arc<ServerConfig>,
    /// Text index used for free-text article search.
    pub search: Arc<ElasticIndex>,
    /// Producer half of the index write queue.
    pub index_queue: IndexQueue,
}
