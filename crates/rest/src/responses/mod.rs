//! Response bodies for listings.
//!
//! Every listing answers `{"meta": {...}, "results": [...]}`. The meta block
//! carries the HTTP code, the counts from [`ResultMeta`], the `after` filter
//! that was applied and, when more matches remain, a `nextPage` link.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use codelist_persistence::types::{ResultMeta, SearchPage};
use serde::Serialize;

/// Meta block of a listing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// HTTP status code.
    pub code: u16,

    /// Counts and paging details.
    #[serde(flatten)]
    pub result: ResultMeta,

    /// The `after` filter, if one was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime<Utc>>,
}

/// A listing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseWrapper<T> {
    /// Counts and links.
    pub meta: ResponseMeta,

    /// Entities in sort order.
    pub results: Vec<T>,
}

impl<T> ResponseWrapper<T> {
    /// Wraps one executed page.
    pub fn from_page(page: SearchPage<T>, after: Option<DateTime<Utc>>) -> Self {
        Self {
            meta: ResponseMeta {
                code: 200,
                result: page.meta,
                after,
            },
            results: page.items,
        }
    }

    /// Returns true if a page after this one still has matches.
    pub fn has_next_page(&self) -> bool {
        self.meta.result.has_next_page()
    }

    /// Attaches the next-page link.
    pub fn with_next_page(mut self, link: String) -> Self {
        self.meta.result = self.meta.result.with_next_page(link);
        self
    }
}

impl<T: Serialize> IntoResponse for ResponseWrapper<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use codelist_persistence::types::Page;

    #[test]
    fn test_wrapper_serialization() {
        let page = SearchPage::new(
            vec!["a", "b"],
            ResultMeta::new(&Page::new(2, 0), 3, 2),
        );
        let after = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let wrapper = ResponseWrapper::from_page(page, Some(after));
        assert!(wrapper.has_next_page());

        let json = serde_json::to_value(wrapper.with_next_page("next".to_string())).unwrap();
        assert_eq!(json["meta"]["code"], 200);
        assert_eq!(json["meta"]["pageSize"], 2);
        assert_eq!(json["meta"]["totalResults"], 3);
        assert_eq!(json["meta"]["resultCount"], 2);
        assert_eq!(json["meta"]["after"], "2020-01-01T00:00:00Z");
        assert_eq!(json["meta"]["nextPage"], "next");
        assert_eq!(json["results"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_last_page_has_no_link() {
        let page: SearchPage<String> =
            SearchPage::new(Vec::new(), ResultMeta::new(&Page::new(10, 0), 4, 4));
        let json = serde_json::to_value(ResponseWrapper::from_page(page, None)).unwrap();
        assert!(json["meta"].get("nextPage").is_none());
        assert!(json["meta"].get("after").is_none());
    }
}
