//! Search backend implementations.
//!
//! A backend answers two questions for the [`SearchExecutor`]: does a
//! collection exist, and which documents match a [`StructuredQuery`] within a
//! [`Page`]. Everything else (defaults, timeouts, deserialization and
//! deduplication) happens above this seam.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Elasticsearch | `elasticsearch` (default) | Production index |
//! | Memory | always | Seeded document map for tests and local runs |
//!
//! [`SearchExecutor`]: crate::search::SearchExecutor

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BackendError, StorageResult};
use crate::types::{MAX_PAGE_SIZE, Page, StructuredQuery};

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub mod memory;

/// Raw result of one backend execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHits {
    /// Number of matching documents, ignoring pagination.
    pub total: u64,
    /// Source documents of the requested page in sort order.
    pub documents: Vec<Value>,
}

impl RawHits {
    /// Creates a result from a total and the page documents.
    pub fn new(total: u64, documents: Vec<Value>) -> Self {
        Self { total, documents }
    }
}

/// A document index that can evaluate structured queries.
#[async_trait]
pub trait SearchBackend: Send + Sync + Debug {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns true if the collection exists.
    async fn collection_exists(&self, collection: &str) -> StorageResult<bool>;

    /// Executes a query and returns one page of matching documents.
    async fn execute(&self, query: &StructuredQuery, page: &Page) -> StorageResult<RawHits>;

    /// Largest page the backend returns in one execution.
    fn max_page_size(&self) -> u32 {
        MAX_PAGE_SIZE
    }

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
