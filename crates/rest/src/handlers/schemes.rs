//! Scheme handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use codelist_persistence::backends::SearchBackend;
use codelist_persistence::error::ResourceError;
use codelist_persistence::search::escape_for_diagnostics;
use codelist_persistence::types::{CodeScheme, EntityKind};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{ApiQuery, ListingParams, LookupParams};
use crate::responses::ResponseWrapper;
use crate::state::AppState;

use super::listing_response;

/// Lists the schemes of one registry.
///
/// `GET [base]/api/v1/coderegistries/{registry}/codeschemes`
pub async fn list_schemes_handler<B>(
    State(state): State<AppState<B>>,
    Path(registry): Path<String>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> RestResult<ResponseWrapper<CodeScheme>>
where
    B: SearchBackend + 'static,
{
    debug!(registry = %escape_for_diagnostics(&registry), page_size = ?params.page_size, "Processing scheme listing");

    let page = params.page();
    let criteria = params.criteria()?;
    let result = state
        .repository()
        .get_schemes(&registry, &criteria, &page)
        .await?;

    let endpoint = format!("/coderegistries/{}/codeschemes", urlencoding::encode(&registry));
    Ok(listing_response(
        state.urls(),
        &endpoint,
        &criteria,
        result,
        &params.link_filters(),
    ))
}

/// Returns one scheme of a registry.
///
/// `GET [base]/api/v1/coderegistries/{registry}/codeschemes/{scheme}`
pub async fn get_scheme_handler<B>(
    State(state): State<AppState<B>>,
    Path((registry, scheme)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<LookupParams>,
) -> RestResult<Json<CodeScheme>>
where
    B: SearchBackend + 'static,
{
    let key = params.key(&scheme);
    state
        .repository()
        .get_scheme(&registry, &key)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ResourceError::NotFound {
                kind: EntityKind::CodeScheme,
                key: escape_for_diagnostics(&format!("{}/{}", registry, scheme)),
            }
            .into()
        })
}
