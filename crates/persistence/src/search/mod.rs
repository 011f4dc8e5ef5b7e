//! Query construction and execution.
//!
//! - [`sanitizer`] - Turns raw free-text terms into validated [`TextQuery`] expressions
//! - [`params`] - Parses date, status and URI request parameters
//! - [`query_builder`] - Builds a [`StructuredQuery`](crate::types::StructuredQuery) from request criteria
//! - [`executor`] - Runs structured queries against a [`SearchBackend`](crate::backends::SearchBackend)
//!
//! # Request flow
//!
//! ```text
//! SearchScope + SearchCriteria
//!   └── QueryBuilder::build        (sanitizes terms, case-folds values)
//!         └── StructuredQuery
//!               └── SearchExecutor (exists guard, timeout, dedupe, counts)
//!                     └── SearchPage<T>
//! ```

pub mod executor;
pub mod params;
pub mod query_builder;
pub mod sanitizer;

pub use executor::SearchExecutor;
pub use params::{parse_date, parse_optional_date, parse_status_csv, parse_uri_csv};
pub use query_builder::{DEFAULT_LANGUAGES, LookupKey, QueryBuilder, SearchCriteria};
pub use sanitizer::{Expr, QueryTermSanitizer, TextQuery, escape_for_diagnostics};
