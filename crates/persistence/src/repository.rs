//! Typed access to registries, schemes and codes.
//!
//! [`ResourceRepository`] is the single entry point used by the API layer.
//! It scopes each lookup to its parents, builds the query and runs it through
//! the [`SearchExecutor`].

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::backends::SearchBackend;
use crate::error::StorageResult;
use crate::search::{LookupKey, QueryBuilder, SearchCriteria, SearchExecutor};
use crate::types::{
    Code, CodeRegistry, CodeScheme, Page, ResourceSummary, SearchPage, SearchScope,
};

/// Index collection names for the three entity kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    /// Registries collection.
    pub registries: String,
    /// Schemes collection.
    pub schemes: String,
    /// Codes collection.
    pub codes: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            registries: "coderegistry".to_string(),
            schemes: "codescheme".to_string(),
            codes: "code".to_string(),
        }
    }
}

/// Read-only repository over a search backend.
#[derive(Debug)]
pub struct ResourceRepository<B> {
    executor: SearchExecutor<B>,
    builder: QueryBuilder,
    collections: CollectionNames,
}

impl<B> Clone for ResourceRepository<B> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            builder: self.builder.clone(),
            collections: self.collections.clone(),
        }
    }
}

impl<B: SearchBackend> ResourceRepository<B> {
    /// Creates a repository with default collections, languages and timeout.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            executor: SearchExecutor::new(backend),
            builder: QueryBuilder::default(),
            collections: CollectionNames::default(),
        }
    }

    /// Overrides the collection names.
    pub fn with_collections(mut self, collections: CollectionNames) -> Self {
        self.collections = collections;
        self
    }

    /// Overrides the label languages used by label and free-text search.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.builder = QueryBuilder::new(languages);
        self
    }

    /// Overrides the per-call backend timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.executor = self.executor.with_timeout(timeout);
        self
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<B> {
        self.executor.backend()
    }

    /// Returns the collection names.
    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    /// Looks up one registry.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_registry(&self, key: &LookupKey) -> StorageResult<Option<CodeRegistry>> {
        let scope = SearchScope::registries(&self.collections.registries);
        self.executor
            .find_one(&self.builder.lookup(scope, key))
            .await
    }

    /// Lists registries.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_registries(
        &self,
        criteria: &SearchCriteria,
        page: &Page,
    ) -> StorageResult<SearchPage<CodeRegistry>> {
        let scope = SearchScope::registries(&self.collections.registries);
        let query = self.builder.build(scope, criteria)?;
        self.executor.search(&query, page).await
    }

    /// Looks up one scheme of a registry.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_scheme(
        &self,
        registry: &str,
        key: &LookupKey,
    ) -> StorageResult<Option<CodeScheme>> {
        let scope = SearchScope::schemes(&self.collections.schemes, registry);
        self.executor
            .find_one(&self.builder.lookup(scope, key))
            .await
    }

    /// Lists the schemes of a registry.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_schemes(
        &self,
        registry: &str,
        criteria: &SearchCriteria,
        page: &Page,
    ) -> StorageResult<SearchPage<CodeScheme>> {
        let scope = SearchScope::schemes(&self.collections.schemes, registry);
        let query = self.builder.build(scope, criteria)?;
        self.executor.search(&query, page).await
    }

    /// Looks up one code of a scheme.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_code(
        &self,
        registry: &str,
        scheme: &str,
        key: &LookupKey,
    ) -> StorageResult<Option<Code>> {
        let scope = SearchScope::codes(&self.collections.codes, registry, scheme);
        self.executor
            .find_one(&self.builder.lookup(scope, key))
            .await
    }

    /// Lists the codes of a scheme.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_codes(
        &self,
        registry: &str,
        scheme: &str,
        criteria: &SearchCriteria,
        page: &Page,
    ) -> StorageResult<SearchPage<Code>> {
        let scope = SearchScope::codes(&self.collections.codes, registry, scheme);
        let query = self.builder.build(scope, criteria)?;
        self.executor.search(&query, page).await
    }

    /// Lists schemes of every registry as integration containers.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_containers(
        &self,
        criteria: &SearchCriteria,
        page: &Page,
    ) -> StorageResult<SearchPage<ResourceSummary>> {
        let scope = SearchScope::all_schemes(&self.collections.schemes);
        let query = self.builder.build(scope, criteria)?;
        let schemes: SearchPage<CodeScheme> = self.executor.search(&query, page).await?;
        Ok(schemes.map(ResourceSummary::from))
    }

    /// Lists codes as integration resources.
    ///
    /// `criteria.containers` limits the result to codes of the given scheme
    /// URIs.
    #[instrument(skip_all, level = "debug")]
    pub async fn get_resources(
        &self,
        criteria: &SearchCriteria,
        page: &Page,
    ) -> StorageResult<SearchPage<ResourceSummary>> {
        let scope = SearchScope::all_codes(&self.collections.codes);
        let query = self.builder.build(scope, criteria)?;
        let codes: SearchPage<Code> = self.executor.search(&query, page).await?;
        Ok(codes.map(ResourceSummary::from))
    }
}
