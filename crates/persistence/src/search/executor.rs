//! Runs structured queries against a backend.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::backends::{RawHits, SearchBackend};
use crate::error::{BackendError, ResourceError, StorageResult};
use crate::types::{Entity, Page, ResultMeta, SearchPage, StructuredQuery};

/// Default client-side timeout for one backend call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes queries with an existence guard, a timeout, and result cleanup.
///
/// Every backend call is bounded by the configured timeout. A missing
/// collection is not an error: listings come back empty and lookups come
/// back as `None`.
#[derive(Debug)]
pub struct SearchExecutor<B> {
    backend: Arc<B>,
    timeout: Duration,
}

impl<B> Clone for SearchExecutor<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            timeout: self.timeout,
        }
    }
}

impl<B: SearchBackend> SearchExecutor<B> {
    /// Creates an executor with the default timeout.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs a listing query.
    ///
    /// The page size is limited to what the backend returns in one
    /// execution, and the metadata reports the limited size. Hits keep
    /// backend sort order. Duplicate ids keep their first occurrence and
    /// documents that do not deserialize are skipped.
    pub async fn search<T: Entity>(
        &self,
        query: &StructuredQuery,
        page: &Page,
    ) -> StorageResult<SearchPage<T>> {
        let collection = query.scope.collection();

        let page = page.clamped(self.backend.max_page_size());

        if !self.collection_exists(collection).await? {
            debug!(collection, "Collection does not exist, returning empty page");
            return Ok(SearchPage::empty(&page));
        }

        let hits = self.bounded(self.backend.execute(query, &page)).await?;
        let total = hits.total;
        let items = self.decode_unique::<T>(collection, hits);

        let meta = ResultMeta::new(&page, total, items.len() as u64);
        debug!(
            collection,
            total_results = meta.total_results,
            result_count = meta.result_count,
            "Search executed"
        );
        Ok(SearchPage::new(items, meta))
    }

    /// Runs a single-entity query and returns the first hit by sort order.
    pub async fn find_one<T: Entity>(&self, query: &StructuredQuery) -> StorageResult<Option<T>> {
        let collection = query.scope.collection();

        if !self.collection_exists(collection).await? {
            debug!(collection, "Collection does not exist, lookup yields nothing");
            return Ok(None);
        }

        let hits = self
            .bounded(self.backend.execute(query, &Page::single()))
            .await?;
        Ok(self.decode_unique::<T>(collection, hits).into_iter().next())
    }

    async fn collection_exists(&self, collection: &str) -> StorageResult<bool> {
        self.bounded(self.backend.collection_exists(collection))
            .await
    }

    async fn bounded<R>(&self, call: impl Future<Output = StorageResult<R>>) -> StorageResult<R> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(
                    backend = self.backend.name(),
                    timeout_ms, "Backend call timed out"
                );
                Err(BackendError::Timeout {
                    backend_name: self.backend.name().to_string(),
                    timeout_ms,
                }
                .into())
            }
        }
    }

    fn decode_unique<T: Entity>(&self, collection: &str, hits: RawHits) -> Vec<T> {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(hits.documents.len());

        for document in hits.documents {
            let id = document_id(&document);
            match serde_json::from_value::<T>(document) {
                Ok(entity) => {
                    if seen.insert(entity.id().to_string()) {
                        items.push(entity);
                    }
                }
                Err(e) => {
                    let malformed = ResourceError::Malformed {
                        collection: collection.to_string(),
                        id: id.unwrap_or_else(|| "<unknown>".to_string()),
                        message: e.to_string(),
                    };
                    warn!(kind = %T::KIND, error = %malformed, "Skipping document");
                }
            }
        }
        items
    }
}

fn document_id(document: &Value) -> Option<String> {
    document.get("id").and_then(Value::as_str).map(str::to_string)
}
