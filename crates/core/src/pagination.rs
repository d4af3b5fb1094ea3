//! Page/perPage arithmetic shared by every paginated listing.

use serde::{Deserialize, Serialize};

/// Page used when the caller omits `page` or sends a non-positive value.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller omits `perPage` or sends a non-positive value.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound on `perPage`.
pub const MAX_PER_PAGE: i64 = 100;

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
    /// Rows to return (`LIMIT`).
    pub limit: i64,
    /// Rows to skip (`OFFSET`).
    pub skip: i64,
    /// 1-based page number echoed back in listing metadata.
    pub current_page: i64,
}

/// Normalize optional `page` / `perPage` values into a [`Paginate`] window.
///
/// `skip = (page - 1) * perPage`; `perPage` is clamped to [`MAX_PER_PAGE`].
pub fn calculate_paginate(page: Option<i64>, per_page: Option<i64>) -> Paginate {
    let current_page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
    let limit = per_page
        .filter(|p| *p > 0)
        .unwrap_or(DEFAULT_PER_PAGE)
        .min(MAX_PER_PAGE);

    Paginate {
        limit,
        skip: (current_page - 1).saturating_mul(limit),
        current_page,
    }
}

/// Listing metadata returned next to every page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl PageMeta {
    pub fn new(total: i64, paginate: Paginate) -> Self {
        Self {
            total,
            page: paginate.current_page,
            per_page: paginate.limit,
        }
    }
}

/// Sort direction accepted by listing endpoints (`ASC` / `DESC`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for `ORDER BY`.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Lowercase form used by the search index `sort` clause.
    pub fn as_index_order(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let p = calculate_paginate(None, None);
        assert_eq!(
            p,
            Paginate {
                limit: DEFAULT_PER_PAGE,
                skip: 0,
                current_page: 1
            }
        );
    }

    #[test]
    fn page_two_of_ten_skips_first_ten() {
        let p = calculate_paginate(Some(2), Some(10));
        assert_eq!(p.skip, 10);
        assert_eq!(p.limit, 10);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn non_positive_values_fall_back() {
        let p = calculate_paginate(Some(0), Some(-5));
        assert_eq!(p.current_page, 1);
        assert_eq!(p.limit, DEFAULT_PER_PAGE);
        assert_eq!(p.skip, 0);
    }

    #[test]
    fn per_page_is_clamped() {
        let p = calculate_paginate(Some(3), Some(10_000));
        assert_eq!(p.limit, MAX_PER_PAGE);
        assert_eq!(p.skip, 2 * MAX_PER_PAGE);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PageMeta::new(42, calculate_paginate(Some(2), Some(5)));
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json, serde_json::json!({"total": 42, "page": 2, "perPage": 5}));
    }

    #[test]
    fn sort_order_parses_uppercase() {
        let order: SortOrder = serde_json::from_str("\"DESC\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert_eq!(order.as_sql(), "DESC");
    }
}
