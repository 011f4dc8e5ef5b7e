//! Code handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use codelist_persistence::backends::SearchBackend;
use codelist_persistence::error::ResourceError;
use codelist_persistence::search::escape_for_diagnostics;
use codelist_persistence::types::{Code, EntityKind};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{ApiQuery, ListingParams, LookupParams};
use crate::responses::ResponseWrapper;
use crate::state::AppState;

use super::listing_response;

/// Lists the codes of one scheme.
///
/// `GET [base]/api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes`
pub async fn list_codes_handler<B>(
    State(state): State<AppState<B>>,
    Path((registry, scheme)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> RestResult<ResponseWrapper<Code>>
where
    B: SearchBackend + 'static,
{
    debug!(
        registry = %escape_for_diagnostics(&registry),
        scheme = %escape_for_diagnostics(&scheme),
        page_size = ?params.page_size,
        "Processing code listing"
    );

    let page = params.page();
    let criteria = params.criteria()?;
    let result = state
        .repository()
        .get_codes(&registry, &scheme, &criteria, &page)
        .await?;

    let endpoint = format!(
        "/coderegistries/{}/codeschemes/{}/codes",
        urlencoding::encode(&registry),
        urlencoding::encode(&scheme)
    );
    Ok(listing_response(
        state.urls(),
        &endpoint,
        &criteria,
        result,
        &params.link_filters(),
    ))
}

/// Returns one code.
///
/// `GET [base]/api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes/{code}`
pub async fn get_code_handler<B>(
    State(state): State<AppState<B>>,
    Path((registry, scheme, code)): Path<(String, String, String)>,
    ApiQuery(params): ApiQuery<LookupParams>,
) -> RestResult<Json<Code>>
where
    B: SearchBackend + 'static,
{
    let key = params.key(&code);
    state
        .repository()
        .get_code(&registry, &scheme, &key)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ResourceError::NotFound {
                kind: EntityKind::Code,
                key: escape_for_diagnostics(&format!("{}/{}/{}", registry, scheme, code)),
            }
            .into()
        })
}
