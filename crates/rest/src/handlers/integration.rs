//! Integration listing handlers.
//!
//! Containers are schemes of every registry; resources are codes, usually
//! limited to a set of containers. Both answer with [`ResourceSummary`]
//! entries and exclude INCOMPLETE entities unless `includeIncomplete=true`.

use axum::extract::State;
use codelist_persistence::backends::SearchBackend;
use codelist_persistence::types::ResourceSummary;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{ApiQuery, IntegrationParams};
use crate::responses::ResponseWrapper;
use crate::state::AppState;

use super::listing_response;

/// `GET [base]/api/v1/integration/containers`
pub async fn containers_handler<B>(
    State(state): State<AppState<B>>,
    ApiQuery(params): ApiQuery<IntegrationParams>,
) -> RestResult<ResponseWrapper<ResourceSummary>>
where
    B: SearchBackend + 'static,
{
    debug!(
        include_incomplete = params.include_incomplete,
        "Processing integration containers"
    );

    let page = params.page();
    let criteria = params.criteria()?;
    let result = state.repository().get_containers(&criteria, &page).await?;

    Ok(listing_response(
        state.urls(),
        "/integration/containers",
        &criteria,
        result,
        &params.link_filters(),
    ))
}

/// `GET [base]/api/v1/integration/resources`
///
/// The next-page link repeats the `container` parameter along with the
/// other filters.
pub async fn resources_handler<B>(
    State(state): State<AppState<B>>,
    ApiQuery(params): ApiQuery<IntegrationParams>,
) -> RestResult<ResponseWrapper<ResourceSummary>>
where
    B: SearchBackend + 'static,
{
    debug!(
        include_incomplete = params.include_incomplete,
        containers = params.container.is_some(),
        "Processing integration resources"
    );

    let page = params.page();
    let criteria = params.criteria()?;
    let result = state.repository().get_resources(&criteria, &page).await?;

    Ok(listing_response(
        state.urls(),
        "/integration/resources",
        &criteria,
        result,
        &params.link_filters(),
    ))
}
