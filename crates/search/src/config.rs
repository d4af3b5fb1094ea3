use std::time::Duration;

/// Default Elasticsearch endpoint for local development.
const DEFAULT_URL: &str = "http://localhost:9200";

/// Default index name for article documents.
const DEFAULT_INDEX: &str = "articles";

/// Default capacity of the index write queue.
const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Text-index configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch cluster, without a trailing slash.
    pub url: String,
    /// Index holding article documents.
    pub index: String,
    /// Capacity of the bounded write queue.
    pub queue_capacity: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SearchConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `ELASTICSEARCH_URL`     | `http://localhost:9200` |
    /// | `ELASTICSEARCH_INDEX`   | `articles`              |
    /// | `INDEX_QUEUE_CAPACITY`  | `1024`                  |
    /// | `SEARCH_TIMEOUT_SECS`   | `5`                     |
    pub fn from_env() -> Self {
        let url = std::env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| DEFAULT_URL.into())
            .trim_end_matches('/')
            .to_string();

        let index = std::env::var("ELASTICSEARCH_INDEX").unwrap_or_else(|_| DEFAULT_INDEX.into());

        let queue_capacity = std::env::var("INDEX_QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|c: &usize| *c > 0)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        let timeout_secs = std::env::var("SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            url,
            index,
            queue_capacity,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            index: DEFAULT_INDEX.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
