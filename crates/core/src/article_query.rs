//! Article listing composition.
//!
//! A listing request may carry free text, topic slugs, pagination, a sort
//! direction and, on the admin surface, visibility / soft-delete filters.
//! Free text is resolved to a candidate id set through the text index first;
//! the relational store then applies that set together with every other
//! predicate, sorts, paginates and counts.

use std::sync::Arc;

use serde::Serialize;

use crate::pagination::{calculate_paginate, PageMeta, SortOrder};
use crate::ports::{ArticleFilter, ArticleSearch, ArticleStore, ArticleSummary, TextQuery};
use crate::types::DbId;
use crate::visibility::Visibility;

/// Default number of index hits considered when resolving free text.
pub const DEFAULT_CANDIDATE_LIMIT: i64 = 1000;

/// Which listing surface a query targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// Anonymous listing: only public, non-deleted articles.
    Public,
    /// Admin listing: no implicit restriction, optional explicit filters.
    Admin {
        visibilities: Vec<Visibility>,
        delete_soft: Option<bool>,
    },
}

/// A listing request after HTTP decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListQuery {
    pub scope: ListingScope,
    pub text_search: Option<String>,
    pub topic_urls: Vec<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by_date: Option<SortOrder>,
}

impl ArticleListQuery {
    pub fn public() -> Self {
        Self {
            scope: ListingScope::Public,
            text_search: None,
            topic_urls: Vec::new(),
            page: None,
            per_page: None,
            sort_by_date: None,
        }
    }

    pub fn admin() -> Self {
        Self {
            scope: ListingScope::Admin {
                visibilities: Vec::new(),
                delete_soft: None,
            },
            ..Self::public()
        }
    }

    /// Trimmed free text, `None` when absent or blank.
    fn text(&self) -> Option<&str> {
        self.text_search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// One page of listed articles.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleSummary>,
    pub meta: PageMeta,
}

/// Combines the text index and the relational store into paginated listings.
pub struct ArticleQueryComposer<S, I> {
    store: S,
    search: Arc<I>,
    candidate_limit: i64,
}

impl<S, I> ArticleQueryComposer<S, I>
where
    S: ArticleStore,
    I: ArticleSearch,
{
    pub fn new(store: S, search: Arc<I>, candidate_limit: i64) -> Self {
        Self {
            store,
            search,
            candidate_limit: candidate_limit.max(1),
        }
    }

    /// Run a listing query.
    ///
    /// Index failures never fail the listing; only store errors propagate.
    pub async fn list(&self, query: &ArticleListQuery) -> Result<ArticlePage, S::Error> {
        let sort = query.sort_by_date.unwrap_or_default();

        let candidates = match query.text() {
            Some(text) => self.candidate_ids(text, sort).await,
            None => None,
        };

        let filter = build_filter(query, candidates);
        let (articles, total) = self.store.list_articles(&filter).await?;

        let paginate = calculate_paginate(query.page, query.per_page);
        Ok(ArticlePage {
            articles,
            meta: PageMeta::new(total, paginate),
        })
    }

    /// Resolve free text to candidate ids.
    ///
    /// The whole candidate window is requested from offset zero; relational
    /// pagination is applied afterwards on the intersected set.
    async fn candidate_ids(&self, text: &str, sort: SortOrder) -> Option<Vec<DbId>> {
        let query = TextQuery {
            text: text.to_string(),
            sort,
            skip: 0,
            limit: self.candidate_limit,
        };

        match self.search.search(&query).await {
            Ok(ids) => {
                tracing::debug!(text, hits = ids.len(), "Resolved text search candidates");
                Some(ids)
            }
            Err(e) => {
                tracing::warn!(error = %e, text, "Text index search failed, ignoring text filter");
                None
            }
        }
    }
}

/// Translate a listing query plus resolved candidates into a store filter.
///
/// An empty candidate set applies no id restriction, so free text with zero
/// hits lists the same rows as no free text at all.
pub fn build_filter(query: &ArticleListQuery, candidates: Option<Vec<DbId>>) -> ArticleFilter {
    let paginate = calculate_paginate(query.page, query.per_page);
    let has_topic_filter = !query.topic_urls.is_empty();

    let ids = candidates.filter(|ids| !ids.is_empty());
    let topic_urls = has_topic_filter.then(|| query.topic_urls.clone());

    let (public_only, visibilities, delete_soft, include_topics) = match &query.scope {
        ListingScope::Public => (true, None, None, true),
        ListingScope::Admin {
            visibilities,
            delete_soft,
        } => (
            false,
            (!visibilities.is_empty()).then(|| visibilities.clone()),
            *delete_soft,
            has_topic_filter,
        ),
    };

    ArticleFilter {
        public_only,
        ids,
        visibilities,
        delete_soft,
        topic_urls,
        include_topics,
        sort: query.sort_by_date.unwrap_or_default(),
        limit: paginate.limit,
        skip: paginate.skip,
    }
}
