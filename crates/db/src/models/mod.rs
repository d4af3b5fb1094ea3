pub mod article;
pub mod movie;
pub mod topic;
pub mod user;

/// Split a comma-separated query value into trimmed, non-empty items.
///
/// Used for list-valued query parameters such as `topicUrls=rust,go`.
pub fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
