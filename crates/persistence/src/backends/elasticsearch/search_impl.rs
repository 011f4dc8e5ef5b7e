//! SearchBackend implementation for the Elasticsearch backend.

use async_trait::async_trait;
use elasticsearch::SearchParts;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::indices::IndicesExistsParts;
use serde_json::Value;

use crate::backends::{RawHits, SearchBackend};
use crate::error::{BackendError, StorageResult};
use crate::types::{Page, StructuredQuery};

use super::backend::ElasticsearchBackend;
use super::search::query_builder::EsQueryBuilder;

fn internal_error(message: String) -> crate::error::StorageError {
    crate::error::StorageError::Backend(BackendError::Internal {
        backend_name: "elasticsearch".to_string(),
        message,
        source: None,
    })
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    fn max_page_size(&self) -> u32 {
        self.config().max_result_window
    }

    async fn collection_exists(&self, collection: &str) -> StorageResult<bool> {
        let index = self.index_name(collection);
        let response = self
            .client()
            .indices()
            .exists(IndicesExistsParts::Index(&[&index]))
            .send()
            .await
            .map_err(BackendError::from)?;

        Ok(response.status_code().is_success())
    }

    async fn execute(&self, query: &StructuredQuery, page: &Page) -> StorageResult<RawHits> {
        let index = self.index_name(query.scope.collection());
        let es_query =
            EsQueryBuilder::new(index.clone(), self.config().max_result_window).build(query, page);

        tracing::debug!(index = %es_query.index, body = %es_query.body, "Executing search");

        let response = self
            .client()
            .search(SearchParts::Index(&[&es_query.index]))
            .body(es_query.body)
            .send()
            .await
            .map_err(BackendError::from)?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Index removed between the exists check and the search
            if body.contains("index_not_found_exception") {
                return Ok(RawHits::default());
            }
            tracing::debug!(index = %index, status = %status, body = %body, "Search rejected");
            return Err(BackendError::QueryError {
                message: format!("search on {} returned status {}", index, status),
            }
            .into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| internal_error(format!("Failed to parse search response: {}", e)))?;

        Ok(parse_hits(&body))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let response = self
            .client()
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: format!("Health check failed: {}", e),
            })?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(BackendError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: format!("Cluster health returned status {}", status),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Internal {
                backend_name: "elasticsearch".to_string(),
                message: format!("Failed to parse health response: {}", e),
                source: None,
            })?;

        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(BackendError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: "Cluster status is red".to_string(),
            });
        }

        Ok(())
    }
}

/// Extracts the total count and `_source` documents from a search response.
fn parse_hits(body: &Value) -> RawHits {
    let hits = body.get("hits");

    let total = hits
        .and_then(|h| h.get("total"))
        .and_then(|t| t.get("value"))
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    let documents = hits
        .and_then(|h| h.get("hits"))
        .and_then(|h| h.as_array())
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect()
        })
        .unwrap_or_default();

    RawHits::new(total, documents)
}
