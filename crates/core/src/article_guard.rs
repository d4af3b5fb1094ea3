//! Ownership checks and patch resolution for article mutations.

use crate::error::CoreError;
use crate::reading_time::time_to_read;
use crate::slug::slugify;
use crate::types::DbId;

/// Fail with [`CoreError::WrongCredentials`] unless `principal` owns the article.
///
/// Articles whose owner was removed (`owner == None`) cannot be mutated
/// through the owner-checked endpoints.
pub fn ensure_owner(owner: Option<DbId>, principal: DbId) -> Result<(), CoreError> {
    match owner {
        Some(id) if id == principal => Ok(()),
        _ => Err(CoreError::WrongCredentials),
    }
}

/// Columns derived from a patch rather than supplied by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedColumns {
    /// New slug when the title changed.
    pub url: Option<String>,
    /// New read-time label when the content changed.
    pub time_to_read: Option<String>,
}

/// Work out derived columns for a partial update.
///
/// A title equal to the stored one keeps the stored slug.
pub fn derive_columns(
    current_title: &str,
    new_title: Option<&str>,
    new_content: Option<&str>,
) -> Result<DerivedColumns, CoreError> {
    let url = match new_title {
        Some(title) if title != current_title => Some(slugify(title)?),
        _ => None,
    };

    Ok(DerivedColumns {
        url,
        time_to_read: new_content.map(time_to_read),
    })
}
