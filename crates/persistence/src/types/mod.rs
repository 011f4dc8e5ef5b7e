//! Core types for the persistence layer.
//!
//! This module provides the fundamental types used throughout the persistence layer:
//!
//! - [`CodeRegistry`], [`CodeScheme`], [`Code`] - Catalog entities
//! - [`SearchScope`], [`QueryFilter`], [`StructuredQuery`] - Backend-independent queries
//! - [`Page`], [`ResultMeta`], [`SearchPage`] - Pagination types
//!
//! # Examples
//!
//! ```
//! use codelist_persistence::types::{fields, QueryFilter, SearchScope, StructuredQuery};
//!
//! let query = StructuredQuery {
//!     scope: SearchScope::schemes("codescheme", "JHS"),
//!     filters: vec![QueryFilter::prefix(fields::CODE_VALUE, "kun")],
//! };
//!
//! assert_eq!(query.all_filters().count(), 2);
//! ```

mod entity;
mod pagination;
mod query;

pub use entity::{
    Code, CodeRegistry, CodeScheme, Entity, EntityKind, LocalizedText, RegistryRef,
    ResourceSummary, SchemeRef, Status,
};
pub use pagination::{MAX_PAGE_SIZE, Page, ResultMeta, SearchPage};
pub use query::{QueryFilter, SearchScope, SortDirection, StructuredQuery, fields};
