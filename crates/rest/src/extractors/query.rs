//! Query string extractor.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use codelist_persistence::search::escape_for_diagnostics;
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Axum extractor for typed query parameters.
///
/// Works like [`Query`] but rejects with a [`RestError`], so malformed
/// parameters get the same JSON error body as every other failure.
///
/// # Example
///
/// ```rust,ignore
/// use codelist_rest::extractors::{ApiQuery, ListingParams};
///
/// async fn list_handler(ApiQuery(params): ApiQuery<ListingParams>) {
///     let page = params.page();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| RestError::BadRequest {
                message: escape_for_diagnostics(&rejection.body_text()),
            })?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ListingParams;
    use axum::http::{Request, StatusCode};

    async fn extract(uri: &str) -> Result<ApiQuery<ListingParams>, RestError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<ListingParams>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_params() {
        let ApiQuery(params) = extract("/x?pageSize=5&from=10&codeValue=09").await.unwrap();
        assert_eq!(params.page_size, Some(5));
        assert_eq!(params.from, Some(10));
        assert_eq!(params.code_value.as_deref(), Some("09"));
    }

    #[tokio::test]
    async fn test_rejects_negative_page_size() {
        let err = extract("/x?pageSize=-1").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
