//! Elasticsearch backend implementation.
//!
//! Each logical collection maps to one index named
//! `{prefix}_{collection}`, or just `{collection}` when the prefix is empty.
//! Documents are the camelCase entity JSON; `prefLabel` is a nested object
//! and keyword sub-fields use a lowercase normalizer.
//!
//! # Example
//!
//! ```ignore
//! use codelist_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let backend = ElasticsearchBackend::new(config)?;
//! backend.health_check().await?;
//! ```

mod backend;
pub mod search;
mod search_impl;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
