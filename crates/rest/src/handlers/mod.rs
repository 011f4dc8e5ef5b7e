//! HTTP request handlers.
//!
//! - [`registries`] - Registry listing and lookup
//! - [`schemes`] - Scheme listing and lookup within a registry
//! - [`codes`] - Code listing and lookup within a scheme
//! - [`uris`] - URI resolution and redirect
//! - [`integration`] - Integration containers and resources
//! - [`health`] - Health check endpoints

pub mod codes;
pub mod health;
pub mod integration;
pub mod registries;
pub mod schemes;
pub mod uris;

// Re-export handlers for convenience
pub use codes::{get_code_handler, list_codes_handler};
pub use health::{health_handler, liveness_handler};
pub use integration::{containers_handler, resources_handler};
pub use registries::{get_registry_handler, list_registries_handler};
pub use schemes::{get_scheme_handler, list_schemes_handler};
pub use uris::{redirect_handler, resolve_handler};

use codelist_persistence::search::SearchCriteria;
use codelist_persistence::types::{Page, SearchPage};

use crate::responses::ResponseWrapper;
use crate::urls::UrlBuilder;

/// Wraps a page and links the next one when more matches remain.
///
/// The link continues from the page that was actually executed and repeats
/// `filters` so that following it keeps the same result set.
pub(crate) fn listing_response<T>(
    urls: &UrlBuilder,
    endpoint: &str,
    criteria: &SearchCriteria,
    result: SearchPage<T>,
    filters: &[(&str, &str)],
) -> ResponseWrapper<T> {
    let executed = Page {
        size: result.meta.page_size,
        from: result.meta.from,
    };
    let response = ResponseWrapper::from_page(result, criteria.after);
    if response.has_next_page() {
        let link = urls.next_page_url(endpoint, &executed, criteria.after.as_ref(), filters);
        response.with_next_page(link)
    } else {
        response
    }
}
