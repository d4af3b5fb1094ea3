//! Elasticsearch REST client for article documents.

use async_trait::async_trait;
use quill_core::ports::{ArticleSearch, IndexedArticle, TextQuery};
use quill_core::types::DbId;
use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Fields matched by free-text queries.
const SEARCH_FIELDS: [&str; 2] = ["title", "description"];

/// Article index on an Elasticsearch-compatible cluster.
#[derive(Clone)]
pub struct ElasticIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticIndex {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.index, path)
    }

    /// Create the index with explicit field mappings if it does not exist yet.
    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        let url = format!("{}/{}", self.base_url, self.index);

        let head = self.client.head(&url).send().await?;
        if head.status().is_success() {
            return Ok(());
        }

        let response = self.client.put(&url).json(&index_mapping()).send().await?;
        check_status(response).await?;
        tracing::info!(index = %self.index, "Created text index");
        Ok(())
    }
}

/// Mapping for article documents.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "long" },
                "title": { "type": "text" },
                "description": { "type": "text" },
                "createdAt": { "type": "date" }
            }
        }
    })
}

/// Request body for a free-text query.
pub fn search_body(query: &TextQuery) -> Value {
    json!({
        "from": query.skip,
        "size": query.limit,
        "query": {
            "multi_match": {
                "query": query.text,
                "fields": SEARCH_FIELDS,
            }
        },
        "sort": [
            { "createdAt": { "order": query.sort.as_index_order() } }
        ],
        "_source": ["id"],
    })
}

/// Request body removing every document for an article.
pub fn remove_body(article_id: DbId) -> Value {
    json!({
        "query": {
            "match": { "id": article_id }
        }
    })
}

/// Extract article ids from a `_search` response, in hit order.
pub fn parse_hit_ids(response: &Value) -> Result<Vec<DbId>, SearchError> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Decode("missing hits.hits array".into()))?;

    hits.iter()
        .map(|hit| {
            hit.pointer("/_source/id")
                .and_then(Value::as_i64)
                .ok_or_else(|| SearchError::Decode("hit without numeric _source.id".into()))
        })
        .collect()
}

/// Turn a non-2xx response into [`SearchError::HttpStatus`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ArticleSearch for ElasticIndex {
    type Error = SearchError;

    async fn search(&self, query: &TextQuery) -> Result<Vec<DbId>, SearchError> {
        let response = self
            .client
            .post(self.endpoint("_search"))
            .json(&search_body(query))
            .send()
            .await?;
        let body: Value = check_status(response).await?.json().await?;
        parse_hit_ids(&body)
    }

    /// Documents are keyed by article id so re-indexing replaces in place.
    async fn index_article(&self, article: &IndexedArticle) -> Result<(), SearchError> {
        let response = self
            .client
            .put(self.endpoint(&format!("_doc/{}", article.id)))
            .json(article)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn remove_article(&self, article_id: DbId) -> Result<(), SearchError> {
        let response = self
            .client
            .post(self.endpoint("_delete_by_query"))
            .json(&remove_body(article_id))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use quill_core::pagination::SortOrder;

    use super::*;

    #[test]
    fn search_body_matches_title_and_description() {
        let body = search_body(&TextQuery {
            text: "async rust".into(),
            sort: SortOrder::Desc,
            skip: 20,
            limit: 10,
        });

        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 10);
        assert_eq!(body["query"]["multi_match"]["query"], "async rust");
        assert_eq!(
            body["query"]["multi_match"]["fields"],
            json!(["title", "description"])
        );
        assert_eq!(body["sort"][0]["createdAt"]["order"], "desc");
    }

    #[test]
    fn remove_body_matches_on_id() {
        assert_eq!(remove_body(42)["query"]["match"]["id"], 42);
    }

    #[test]
    fn parses_ids_in_hit_order() {
        let response = json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "7", "_source": { "id": 7 } },
                    { "_id": "3", "_source": { "id": 3 } }
                ]
            }
        });
        assert_eq!(parse_hit_ids(&response).unwrap(), vec![7, 3]);
    }

    #[test]
    fn empty_hits_parse_to_empty_ids() {
        let response = json!({ "hits": { "hits": [] } });
        assert!(parse_hit_ids(&response).unwrap().is_empty());
    }

    #[test]
    fn malformed_response_is_a_decode_error() {
        assert_matches!(
            parse_hit_ids(&json!({ "error": "boom" })),
            Err(SearchError::Decode(_))
        );
        assert_matches!(
            parse_hit_ids(&json!({ "hits": { "hits": [{ "_source": {} }] } })),
            Err(SearchError::Decode(_))
        );
    }

    #[test]
    fn indexed_article_serializes_camel_case() {
        let doc = IndexedArticle {
            id: 1,
            title: "T".into(),
            description: "D".into(),
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn endpoint_joins_base_index_and_path() {
        let index = ElasticIndex::new(&SearchConfig {
            url: "http://es:9200/".into(),
            ..SearchConfig::default()
        })
        .unwrap();
        assert_eq!(index.endpoint("_search"), "http://es:9200/articles/_search");
    }
}
