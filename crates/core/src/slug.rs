//! URL slug generation for articles and topics.
//!
//! Slugs are lowercase ASCII, hyphen-joined and trimmed. Accented Latin
//! characters are transliterated (`Tiếng Việt` -> `tieng-viet`), with the
//! Vietnamese stroke letters mapped explicitly so they never depend on the
//! transliteration table.

use crate::error::CoreError;

/// Build a slug from a human-readable title or name.
///
/// Returns [`CoreError::Validation`] when nothing slug-worthy remains
/// (e.g. the input is only punctuation).
pub fn slugify(input: &str) -> Result<String, CoreError> {
    let normalized: String = input
        .chars()
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .collect();

    let slug = slug::slugify(normalized);
    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "'{input}' does not produce a usable url"
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn is_slug(candidate: &str) -> bool {
        !candidate.is_empty()
            && !candidate.starts_with('-')
            && !candidate.ends_with('-')
            && !candidate.contains("--")
            && candidate
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello World").unwrap(), "hello-world");
    }

    #[test]
    fn strips_vietnamese_diacritics() {
        assert_eq!(slugify("Đường đến Việt Nam").unwrap(), "duong-den-viet-nam");
        assert_eq!(slugify("Tiếng Việt").unwrap(), "tieng-viet");
    }

    #[test]
    fn collapses_punctuation_and_trims() {
        assert_eq!(
            slugify("  --Rust: async & await!--  ").unwrap(),
            "rust-async-await"
        );
    }

    #[test]
    fn punctuation_only_is_rejected() {
        assert_matches!(slugify("!!! ???"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn output_always_has_slug_shape() {
        for title in ["A  B", "Ça va?", "100% Rust", "x_y_z", "Ünïcödé Tëst"] {
            let slug = slugify(title).unwrap();
            assert!(is_slug(&slug), "{title:?} -> {slug:?}");
        }
    }
}
