//! Full-text index adapter for article headlines.
//!
//! - [`ElasticIndex`] -- [`ArticleSearch`](quill_core::ports::ArticleSearch)
//!   over the Elasticsearch REST API.
//! - [`IndexQueue`] / [`IndexWorker`] -- bounded, best-effort channel for
//!   index writes so requests never wait on the index.
//!
//! The relational store is the source of truth. The index may lag behind it
//! and is brought back in line by the next write to each article.

pub mod client;
pub mod config;
pub mod error;
pub mod queue;

pub use client::ElasticIndex;
pub use config::SearchConfig;
pub use error::SearchError;
pub use queue::{IndexCommand, IndexQueue, IndexWorker};
