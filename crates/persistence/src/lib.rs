//! Codelist Persistence Layer
//!
//! This crate provides read-only search over a hierarchical reference-data
//! catalog: code registries own code schemes, and code schemes own codes.
//! Entities live in a document search index; the crate turns paged, filtered
//! and free-text requests into safe structured queries and runs them.
//!
//! # Architecture
//!
//! - [`types`] - Entities, pagination and structured query types
//! - [`error`] - Error types for all operations
//! - [`search`] - Term sanitizing, query building and execution
//! - [`backends`] - Search backends (Elasticsearch, in-memory)
//! - [`repository`] - Typed registry, scheme and code lookups
//!
//! # Backend Features
//!
//! - `elasticsearch` (default) - Elasticsearch backend
//!
//! The in-memory backend is always available.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use codelist_persistence::backends::memory::MemoryBackend;
//! use codelist_persistence::search::{LookupKey, SearchCriteria};
//! use codelist_persistence::types::Page;
//! use codelist_persistence::ResourceRepository;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let backend = MemoryBackend::new();
//! backend.insert("coderegistry", json!({
//!     "id": "r-1",
//!     "codeValue": "jhs",
//!     "prefLabel": {"fi": "Julkisen hallinnon suositukset"}
//! }));
//!
//! let repository = ResourceRepository::new(Arc::new(backend));
//!
//! let registry = repository
//!     .get_registry(&LookupKey::CodeValue("JHS".into()))
//!     .await
//!     .unwrap();
//! assert!(registry.is_some());
//!
//! let page = repository
//!     .get_registries(&SearchCriteria::new().with_code_value("j"), &Page::default())
//!     .await
//!     .unwrap();
//! assert_eq!(page.meta.total_results, 1);
//! # });
//! ```
//!
//! # Free-text search
//!
//! Search terms are never passed to the index as written:
//!
//! ```
//! use codelist_persistence::search::QueryTermSanitizer;
//!
//! let query = QueryTermSanitizer::new().sanitize("kunta").unwrap();
//! assert_eq!(query.expression(), "kunta OR kunta* OR *kunta");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod error;
pub mod repository;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use backends::{RawHits, SearchBackend};
pub use error::{StorageError, StorageResult};
pub use repository::{CollectionNames, ResourceRepository};
pub use types::{Page, ResultMeta, SearchPage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
