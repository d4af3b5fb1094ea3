//! Repository layer: zero-sized structs with async functions taking `&PgPool`.

pub mod article_repo;
pub mod movie_repo;
pub mod topic_repo;
pub mod user_repo;

pub use article_repo::{ArticleRepo, PgArticleStore};
pub use movie_repo::MovieRepo;
pub use topic_repo::TopicRepo;
pub use user_repo::UserRepo;
