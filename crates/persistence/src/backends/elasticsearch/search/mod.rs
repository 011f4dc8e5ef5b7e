//! Elasticsearch search query translation.
//!
//! Translates [`StructuredQuery`](crate::types::StructuredQuery) values into
//! Elasticsearch Query DSL.

pub mod query_builder;
