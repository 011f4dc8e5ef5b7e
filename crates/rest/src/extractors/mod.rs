//! Axum extractors for codelist API requests.
//!
//! - [`ApiQuery`] - Query string extraction with JSON error bodies
//! - [`ListingParams`] - Registry, scheme and code listing parameters
//! - [`LookupParams`] - Single-resource lookup parameters
//! - [`IntegrationParams`] - Integration listing parameters
//! - [`UriParams`] - URI resolver parameters

mod params;
mod query;

pub use params::{IntegrationParams, ListingParams, LookupParams, UriParams};
pub use query::ApiQuery;
