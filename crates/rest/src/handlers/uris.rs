//! URI resolver handlers.
//!
//! `GET [base]/api/v1/uris/resolve?uri=...` answers with the API URL of the
//! resource; `GET [base]/api/v1/uris/redirect?uri=...` redirects to the API
//! or web URL depending on the Accept header.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::Redirect,
};
use codelist_persistence::backends::SearchBackend;
use serde::Serialize;
use tracing::debug;

use crate::content_type::AcceptList;
use crate::error::RestResult;
use crate::extractors::{ApiQuery, UriParams};
use crate::state::AppState;

/// Body of a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUri {
    /// The URI as given.
    pub uri: String,
    /// API URL of the resource.
    pub url: String,
}

/// Handler for URI resolution.
///
/// # Response
///
/// - `200 OK` - `{"uri": ..., "url": ...}`
/// - `400 Bad Request` - Unparsable URI, foreign host or wrong path prefix
/// - `404 Not Found` - The resource does not exist
/// - `406 Not Acceptable` - Empty, invalid or too deep resource path
pub async fn resolve_handler<B>(
    State(state): State<AppState<B>>,
    ApiQuery(params): ApiQuery<UriParams>,
) -> RestResult<Json<ResolvedUri>>
where
    B: SearchBackend + 'static,
{
    let uri = params.uri.unwrap_or_default();
    let resolved = state.resolver().resolve(&uri).await?;
    debug!(kind = %resolved.kind, path = %resolved.path, "Resolved URI");

    Ok(Json(ResolvedUri {
        uri,
        url: resolved.api_url,
    }))
}

/// Handler for URI redirects.
///
/// # Headers
///
/// - `Accept` - `application/json` redirects to the API, `text/html` or no
///   header to the web application
///
/// # Response
///
/// - `307 Temporary Redirect` - `Location` holds the target URL
/// - `406 Not Acceptable` - Unknown Accept header or unresolvable path
pub async fn redirect_handler<B>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<UriParams>,
) -> RestResult<Redirect>
where
    B: SearchBackend + 'static,
{
    let uri = params.uri.unwrap_or_default();
    let accept = AcceptList::from_headers(&headers);
    let target = state.resolver().redirect(&uri, &accept).await?;
    debug!(target = %target, "Redirecting URI");

    Ok(Redirect::temporary(&target))
}
