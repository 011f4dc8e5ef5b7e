//! Builds structured queries from request criteria.
//!
//! A [`QueryBuilder`] turns a [`SearchScope`] and [`SearchCriteria`] into a
//! [`StructuredQuery`] in one pass. Every identifier is case-folded and the
//! free-text term goes through the [`QueryTermSanitizer`] before it becomes a
//! filter.

use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::types::{QueryFilter, SearchScope, Status, StructuredQuery, fields};

use super::sanitizer::QueryTermSanitizer;

/// Label languages searched when none are configured.
///
/// Swedish uses its ISO 639-1 code `sv`. Indices that store Swedish labels
/// under `prefLabel.se` need the languages configured explicitly.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["fi", "sv", "en"];

/// How a single entity is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Match on the code value.
    CodeValue(String),
    /// Match on the index-wide identifier.
    Id(String),
}

impl LookupKey {
    /// Picks the key type from the `useId` request flag.
    pub fn from_request(value: impl Into<String>, use_id: bool) -> Self {
        if use_id {
            LookupKey::Id(value.into())
        } else {
            LookupKey::CodeValue(value.into())
        }
    }

    /// The raw lookup value.
    pub fn value(&self) -> &str {
        match self {
            LookupKey::CodeValue(v) | LookupKey::Id(v) => v,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            LookupKey::CodeValue(_) => fields::CODE_VALUE,
            LookupKey::Id(_) => fields::ID,
        }
    }
}

/// Optional listing criteria. Absent criteria add no filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Code value prefix.
    pub code_value: Option<String>,
    /// Label phrase prefix in any configured language.
    pub pref_label: Option<String>,
    /// Raw free-text term, sanitized at build time.
    pub search_term: Option<String>,
    /// Only entities modified strictly after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Allowed statuses; empty means any.
    pub statuses: Vec<Status>,
    /// Statuses to exclude.
    pub excluded_statuses: Vec<Status>,
    /// Allowed entity URIs; empty means any.
    pub uris: Vec<String>,
    /// Entity URIs to exclude.
    pub excluded_uris: Vec<String>,
    /// Allowed parent scheme URIs for codes; empty means any.
    pub containers: Vec<String>,
}

impl SearchCriteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code value prefix.
    pub fn with_code_value(mut self, code_value: impl Into<String>) -> Self {
        self.code_value = Some(code_value.into());
        self
    }

    /// Sets the label prefix.
    pub fn with_pref_label(mut self, pref_label: impl Into<String>) -> Self {
        self.pref_label = Some(pref_label.into());
        self
    }

    /// Sets the free-text term.
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Restricts to entities modified after `after`.
    pub fn with_after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    /// Sets the allowed statuses.
    pub fn with_statuses(mut self, statuses: Vec<Status>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Adds a status to exclude.
    pub fn excluding_status(mut self, status: Status) -> Self {
        if !self.excluded_statuses.contains(&status) {
            self.excluded_statuses.push(status);
        }
        self
    }

    /// Sets the allowed entity URIs.
    pub fn with_uris(mut self, uris: Vec<String>) -> Self {
        self.uris = uris;
        self
    }

    /// Sets the entity URIs to exclude.
    pub fn excluding_uris(mut self, uris: Vec<String>) -> Self {
        self.excluded_uris = uris;
        self
    }

    /// Sets the allowed parent scheme URIs.
    pub fn with_containers(mut self, containers: Vec<String>) -> Self {
        self.containers = containers;
        self
    }
}

/// Translates criteria into [`StructuredQuery`] values.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    languages: Vec<String>,
    sanitizer: QueryTermSanitizer,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect())
    }
}

impl QueryBuilder {
    /// Creates a builder searching labels in the given languages.
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            sanitizer: QueryTermSanitizer::new(),
        }
    }

    /// Label languages searched by this builder.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Builds a single-entity lookup query.
    pub fn lookup(&self, scope: SearchScope, key: &LookupKey) -> StructuredQuery {
        StructuredQuery {
            scope,
            filters: vec![QueryFilter::exact(key.field(), key.value().to_lowercase())],
        }
    }

    /// Builds a listing query.
    ///
    /// Fails only when the free-text term is rejected by the sanitizer.
    pub fn build(
        &self,
        scope: SearchScope,
        criteria: &SearchCriteria,
    ) -> Result<StructuredQuery, QueryError> {
        let mut filters = Vec::new();

        if let Some(code_value) = non_blank(&criteria.code_value) {
            filters.push(QueryFilter::prefix(
                fields::CODE_VALUE,
                code_value.to_lowercase(),
            ));
        }

        if let Some(label) = non_blank(&criteria.pref_label) {
            filters.push(QueryFilter::MultiLangPrefixMatch {
                path: fields::PREF_LABEL.to_string(),
                fields: self.label_fields(),
                term: label.to_lowercase(),
            });
        }

        if let Some(term) = non_blank(&criteria.search_term) {
            let query = self.sanitizer.sanitize(term)?;
            let mut text_fields = vec![fields::CODE_VALUE_TEXT.to_string()];
            text_fields.extend(self.label_fields());
            filters.push(QueryFilter::FreeText {
                fields: text_fields,
                query,
            });
        }

        if let Some(after) = criteria.after {
            filters.push(QueryFilter::ModifiedAfter(after));
        }

        if !criteria.statuses.is_empty() {
            filters.push(QueryFilter::AnyOf {
                field: fields::STATUS.to_string(),
                values: status_values(&criteria.statuses),
            });
        }

        if !criteria.excluded_statuses.is_empty() {
            filters.push(QueryFilter::NoneOf {
                field: fields::STATUS.to_string(),
                values: status_values(&criteria.excluded_statuses),
            });
        }

        if !criteria.uris.is_empty() {
            filters.push(QueryFilter::AnyOf {
                field: fields::URI.to_string(),
                values: lowercased(&criteria.uris),
            });
        }

        if !criteria.excluded_uris.is_empty() {
            filters.push(QueryFilter::NoneOf {
                field: fields::URI.to_string(),
                values: lowercased(&criteria.excluded_uris),
            });
        }

        if !criteria.containers.is_empty() {
            filters.push(QueryFilter::AnyOf {
                field: fields::CODE_SCHEME_URI.to_string(),
                values: lowercased(&criteria.containers),
            });
        }

        Ok(StructuredQuery { scope, filters })
    }

    fn label_fields(&self) -> Vec<String> {
        self.languages
            .iter()
            .map(|lang| fields::pref_label(lang))
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn status_values(statuses: &[Status]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

fn lowercased(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    #[test]
    fn test_empty_criteria_only_scope() {
        let query = builder()
            .build(SearchScope::registries("coderegistry"), &SearchCriteria::new())
            .unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(query.all_filters().count(), 0);
    }

    #[test]
    fn test_code_value_prefix_is_lowercased() {
        let criteria = SearchCriteria::new().with_code_value("JHS");
        let query = builder()
            .build(SearchScope::registries("coderegistry"), &criteria)
            .unwrap();
        assert_eq!(
            query.filters,
            vec![QueryFilter::prefix(fields::CODE_VALUE, "jhs")]
        );
    }

    #[test]
    fn test_blank_values_add_no_filter() {
        let criteria = SearchCriteria::new()
            .with_code_value("  ")
            .with_pref_label("")
            .with_search_term(" ");
        let query = builder()
            .build(SearchScope::all_schemes("codescheme"), &criteria)
            .unwrap();
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_pref_label_uses_configured_languages() {
        let criteria = SearchCriteria::new().with_pref_label("Kunnat");
        let query = QueryBuilder::new(vec!["fi".to_string(), "en".to_string()])
            .build(SearchScope::all_schemes("codescheme"), &criteria)
            .unwrap();
        assert_eq!(
            query.filters,
            vec![QueryFilter::MultiLangPrefixMatch {
                path: "prefLabel".to_string(),
                fields: vec!["prefLabel.fi".to_string(), "prefLabel.en".to_string()],
                term: "kunnat".to_string(),
            }]
        );
    }

    #[test]
    fn test_default_label_languages() {
        let criteria = SearchCriteria::new().with_pref_label("Kunnat");
        let query = QueryBuilder::default()
            .build(SearchScope::all_schemes("codescheme"), &criteria)
            .unwrap();
        match &query.filters[0] {
            QueryFilter::MultiLangPrefixMatch { fields, .. } => assert_eq!(
                fields,
                &vec![
                    "prefLabel.fi".to_string(),
                    "prefLabel.sv".to_string(),
                    "prefLabel.en".to_string()
                ]
            ),
            other => panic!("unexpected filter {:?}", other),
        }

        let legacy = QueryBuilder::new(vec!["fi".into(), "se".into(), "en".into()])
            .build(SearchScope::all_schemes("codescheme"), &criteria)
            .unwrap();
        assert!(matches!(
            &legacy.filters[0],
            QueryFilter::MultiLangPrefixMatch { fields, .. } if fields[1] == "prefLabel.se"
        ));
    }

    #[test]
    fn test_search_term_is_sanitized() {
        let criteria = SearchCriteria::new().with_search_term("Dog");
        let query = builder()
            .build(SearchScope::all_codes("code"), &criteria)
            .unwrap();
        match &query.filters[0] {
            QueryFilter::FreeText { fields, query } => {
                assert_eq!(fields[0], "codeValue");
                assert_eq!(fields.len(), 4);
                assert_eq!(query.expression(), "dog OR dog* OR *dog");
            }
            other => panic!("expected free text, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_search_term_fails_build() {
        let criteria = SearchCriteria::new().with_search_term("dog AND cat");
        let err = builder()
            .build(SearchScope::all_codes("code"), &criteria)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery { .. }));
    }

    #[test]
    fn test_status_and_uri_filters() {
        let after = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        let criteria = SearchCriteria::new()
            .with_after(after)
            .with_statuses(vec![Status::Valid])
            .excluding_status(Status::Incomplete)
            .excluding_status(Status::Incomplete)
            .with_uris(vec!["HTTP://URI.SUOMI.FI/codelist/jhs".to_string()])
            .with_containers(vec!["http://uri.suomi.fi/codelist/jhs/kunta".to_string()]);
        let query = builder()
            .build(SearchScope::all_codes("code"), &criteria)
            .unwrap();

        assert_eq!(query.filters[0], QueryFilter::ModifiedAfter(after));
        assert_eq!(
            query.filters[1],
            QueryFilter::AnyOf {
                field: "status".to_string(),
                values: vec!["VALID".to_string()],
            }
        );
        assert_eq!(
            query.filters[2],
            QueryFilter::NoneOf {
                field: "status".to_string(),
                values: vec!["INCOMPLETE".to_string()],
            }
        );
        assert_eq!(
            query.filters[3],
            QueryFilter::AnyOf {
                field: "uri".to_string(),
                values: vec!["http://uri.suomi.fi/codelist/jhs".to_string()],
            }
        );
        assert_eq!(
            query.filters[4],
            QueryFilter::AnyOf {
                field: "codeScheme.uri".to_string(),
                values: vec!["http://uri.suomi.fi/codelist/jhs/kunta".to_string()],
            }
        );
    }

    #[test]
    fn test_lookup_by_code_value_and_id() {
        let scope = SearchScope::schemes("codescheme", "JHS");
        let query = builder().lookup(scope.clone(), &LookupKey::CodeValue("Kunta".into()));
        assert_eq!(query.filters, vec![QueryFilter::exact("codeValue.keyword", "kunta")]);

        let query = builder().lookup(scope, &LookupKey::from_request("ABC-1", true));
        assert_eq!(query.filters, vec![QueryFilter::exact("id.keyword", "abc-1")]);
        assert_eq!(query.scope.parents()[0].1, "jhs");
    }
}
