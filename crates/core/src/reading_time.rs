//! Estimated read-time label stored on each article.

/// Average adult silent reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

/// Label such as `"4min"` for the given article body. Never below one minute.
pub fn time_to_read(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes}min")
}
