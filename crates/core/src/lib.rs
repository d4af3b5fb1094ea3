//! Domain types and rules shared by the Quill crates.
//!
//! Nothing in here touches the database or the network: the article query
//! composer talks to storage and the text index through the ports declared in
//! [`ports`], so the composition rules can be exercised with in-memory fakes.

pub mod article_guard;
pub mod article_query;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod reading_time;
pub mod roles;
pub mod slug;
pub mod types;
pub mod visibility;
