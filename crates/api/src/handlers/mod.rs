pub mod article;
pub mod auth;
pub mod movie;
pub mod topic;
