//! Registry handlers.
//!
//! `GET [base]/api/v1/coderegistries` and
//! `GET [base]/api/v1/coderegistries/{registry}`

use axum::{
    Json,
    extract::{Path, State},
};
use codelist_persistence::backends::SearchBackend;
use codelist_persistence::error::ResourceError;
use codelist_persistence::search::escape_for_diagnostics;
use codelist_persistence::types::{CodeRegistry, EntityKind};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{ApiQuery, ListingParams, LookupParams};
use crate::responses::ResponseWrapper;
use crate::state::AppState;

use super::listing_response;

/// Handler for the registry listing.
///
/// # Query Parameters
///
/// `pageSize`, `from`, `codeValue`, `prefLabel`, `searchTerm`, `after`,
/// `before`
///
/// # Response
///
/// - `200 OK` - `{"meta": ..., "results": [CodeRegistry]}`
/// - `400 Bad Request` - Invalid date or search term
pub async fn list_registries_handler<B>(
    State(state): State<AppState<B>>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> RestResult<ResponseWrapper<CodeRegistry>>
where
    B: SearchBackend + 'static,
{
    debug!(page_size = ?params.page_size, from = ?params.from, "Processing registry listing");

    let page = params.page();
    let criteria = params.criteria()?;
    let result = state.repository().get_registries(&criteria, &page).await?;

    Ok(listing_response(
        state.urls(),
        "/coderegistries",
        &criteria,
        result,
        &params.link_filters(),
    ))
}

/// Handler for a single registry.
///
/// # Response
///
/// - `200 OK` - The registry
/// - `404 Not Found` - No registry with that code value (or id with `useId=true`)
pub async fn get_registry_handler<B>(
    State(state): State<AppState<B>>,
    Path(registry): Path<String>,
    ApiQuery(params): ApiQuery<LookupParams>,
) -> RestResult<Json<CodeRegistry>>
where
    B: SearchBackend + 'static,
{
    let key = params.key(&registry);
    state
        .repository()
        .get_registry(&key)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ResourceError::NotFound {
                kind: EntityKind::CodeRegistry,
                key: escape_for_diagnostics(&registry),
            }
            .into()
        })
}
