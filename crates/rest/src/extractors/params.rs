//! Request parameter sets and their conversion to search criteria.

use chrono::{DateTime, Utc};
use codelist_persistence::error::QueryError;
use codelist_persistence::search::{
    LookupKey, SearchCriteria, parse_optional_date, parse_status_csv, parse_uri_csv,
};
use codelist_persistence::types::{Page, Status};
use serde::Deserialize;

/// Parameters of the registry, scheme and code listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    /// Page size; absent means the system maximum.
    pub page_size: Option<u32>,
    /// Start index.
    pub from: Option<u32>,
    /// Code value prefix.
    pub code_value: Option<String>,
    /// Label prefix in any configured language.
    pub pref_label: Option<String>,
    /// Free-text term over code value and labels.
    pub search_term: Option<String>,
    /// Only entities modified after this ISO-8601 instant.
    pub after: Option<String>,
    /// Validated only.
    pub before: Option<String>,
    /// Comma-separated statuses.
    pub status: Option<String>,
}

impl ListingParams {
    /// The requested page.
    pub fn page(&self) -> Page {
        Page {
            size: self.page_size,
            from: self.from,
        }
    }

    /// Parses and validates the filters.
    pub fn criteria(&self) -> Result<SearchCriteria, QueryError> {
        let mut criteria = SearchCriteria::new();
        if let Some(code_value) = non_blank(&self.code_value) {
            criteria = criteria.with_code_value(code_value);
        }
        if let Some(pref_label) = non_blank(&self.pref_label) {
            criteria = criteria.with_pref_label(pref_label);
        }
        if let Some(term) = non_blank(&self.search_term) {
            criteria = criteria.with_search_term(term);
        }
        if let Some(after) = parse_dates(&self.after, &self.before)? {
            criteria = criteria.with_after(after);
        }
        if let Some(status) = non_blank(&self.status) {
            criteria = criteria.with_statuses(parse_status_csv(status)?);
        }
        Ok(criteria)
    }

    /// Filters a next-page link must repeat. `after` is added by the link
    /// builder.
    pub fn link_filters(&self) -> Vec<(&'static str, &str)> {
        [
            ("codeValue", &self.code_value),
            ("prefLabel", &self.pref_label),
            ("searchTerm", &self.search_term),
            ("status", &self.status),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value).map(|v| (key, v)))
        .collect()
    }
}

/// Parameters of single-resource lookups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
    /// Match the path value against `id` instead of `codeValue`.
    #[serde(default)]
    pub use_id: bool,
}

impl LookupParams {
    /// Builds the lookup key for a path value.
    pub fn key(&self, value: &str) -> LookupKey {
        LookupKey::from_request(value, self.use_id)
    }
}

/// Parameters of the integration listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationParams {
    /// Page size; absent means the system maximum.
    pub page_size: Option<u32>,
    /// Start index.
    pub from: Option<u32>,
    /// Comma-separated statuses.
    pub status: Option<String>,
    /// Only entities modified after this ISO-8601 instant.
    pub after: Option<String>,
    /// Validated only.
    pub before: Option<String>,
    /// Free-text term over code value and labels.
    pub search_term: Option<String>,
    /// Comma-separated URIs to include.
    pub uri: Option<String>,
    /// Comma-separated URIs to exclude.
    pub filter: Option<String>,
    /// Comma-separated container (scheme) URIs; resources only.
    pub container: Option<String>,
    /// Include entities in INCOMPLETE status.
    #[serde(default)]
    pub include_incomplete: bool,
}

impl IntegrationParams {
    /// The requested page.
    pub fn page(&self) -> Page {
        Page {
            size: self.page_size,
            from: self.from,
        }
    }

    /// Parses and validates the filters.
    pub fn criteria(&self) -> Result<SearchCriteria, QueryError> {
        let mut criteria = SearchCriteria::new();
        if let Some(term) = non_blank(&self.search_term) {
            criteria = criteria.with_search_term(term);
        }
        if let Some(after) = parse_dates(&self.after, &self.before)? {
            criteria = criteria.with_after(after);
        }
        if let Some(status) = non_blank(&self.status) {
            criteria = criteria.with_statuses(parse_status_csv(status)?);
        }
        if let Some(uri) = non_blank(&self.uri) {
            criteria = criteria.with_uris(parse_uri_csv(uri));
        }
        if let Some(filter) = non_blank(&self.filter) {
            criteria = criteria.excluding_uris(parse_uri_csv(filter));
        }
        if let Some(container) = non_blank(&self.container) {
            criteria = criteria.with_containers(parse_uri_csv(container));
        }
        if !self.include_incomplete {
            criteria = criteria.excluding_status(Status::Incomplete);
        }
        Ok(criteria)
    }

    /// Filters a next-page link must repeat.
    pub fn link_filters(&self) -> Vec<(&'static str, &str)> {
        let mut filters: Vec<(&'static str, &str)> = [
            ("status", &self.status),
            ("searchTerm", &self.search_term),
            ("uri", &self.uri),
            ("filter", &self.filter),
            ("container", &self.container),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value).map(|v| (key, v)))
        .collect();
        if self.include_incomplete {
            filters.push(("includeIncomplete", "true"));
        }
        filters
    }
}

/// Parameters of the URI resolver endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UriParams {
    /// The resource URI.
    pub uri: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses `after` and validates `before`.
fn parse_dates(
    after: &Option<String>,
    before: &Option<String>,
) -> Result<Option<DateTime<Utc>>, QueryError> {
    parse_optional_date(non_blank(before))?;
    parse_optional_date(non_blank(after))
}
