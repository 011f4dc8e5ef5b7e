//! Elasticsearch Query DSL builder.
//!
//! Exact, prefix and set-membership filters go to the `filter` context;
//! label, date and free-text clauses go to `must`; exclusions go to
//! `must_not`.

use chrono::SecondsFormat;
use serde_json::{Value, json};

use crate::types::{Page, QueryFilter, StructuredQuery, fields};

/// A complete Elasticsearch query body ready to be sent.
#[derive(Debug, Clone)]
pub struct EsQuery {
    /// The complete query body.
    pub body: Value,
    /// The index to search.
    pub index: String,
}

/// Builds Elasticsearch queries from structured queries.
pub struct EsQueryBuilder {
    index: String,
    max_result_window: u32,
}

impl EsQueryBuilder {
    /// Creates a new query builder for an index.
    pub fn new(index: String, max_result_window: u32) -> Self {
        Self {
            index,
            max_result_window,
        }
    }

    /// Builds a complete ES query for one page.
    pub fn build(&self, query: &StructuredQuery, page: &Page) -> EsQuery {
        let mut filter_clauses: Vec<Value> = Vec::new();
        let mut must_clauses: Vec<Value> = Vec::new();
        let mut must_not_clauses: Vec<Value> = Vec::new();

        for filter in query.all_filters() {
            match filter {
                QueryFilter::ExactMatch { field, value } => {
                    filter_clauses.push(json!({ "term": { field: value } }));
                }
                QueryFilter::PrefixMatch { field, value } => {
                    filter_clauses.push(json!({ "prefix": { field: value } }));
                }
                QueryFilter::AnyOf { field, values } => {
                    filter_clauses.push(json!({ "terms": { field: values } }));
                }
                QueryFilter::NoneOf { field, values } => {
                    must_not_clauses.push(json!({ "terms": { field: values } }));
                }
                QueryFilter::MultiLangPrefixMatch { path, fields, term } => {
                    must_clauses.push(json!({
                        "nested": {
                            "path": path,
                            "query": {
                                "multi_match": {
                                    "query": term,
                                    "fields": fields,
                                    "type": "phrase_prefix"
                                }
                            }
                        }
                    }));
                }
                QueryFilter::ModifiedAfter(after) => {
                    let after = after.to_rfc3339_opts(SecondsFormat::Millis, true);
                    must_clauses.push(json!({
                        "bool": {
                            "should": [
                                { "range": { (fields::MODIFIED): { "gt": after } } }
                            ],
                            "minimum_should_match": 1
                        }
                    }));
                }
                QueryFilter::FreeText { fields, query } => {
                    must_clauses.push(build_free_text_clause(&fields, query.expression()));
                }
            }
        }

        let mut bool_query = json!({ "filter": filter_clauses });
        if !must_clauses.is_empty() {
            bool_query["must"] = json!(must_clauses);
        }
        if !must_not_clauses.is_empty() {
            bool_query["must_not"] = json!(must_not_clauses);
        }

        let scope = &query.scope;
        let body = json!({
            "query": { "bool": bool_query },
            "sort": [
                { scope.sort_field(): { "order": scope.sort_direction().as_str() } },
                { (fields::ID): { "order": "asc" } }
            ],
            "size": page.effective_size().min(self.max_result_window),
            "from": page.effective_from(),
            "track_total_hits": true
        });

        EsQuery {
            body,
            index: self.index.clone(),
        }
    }
}

/// Builds a `query_string` clause over plain fields and a nested one over
/// label fields; either side may match.
fn build_free_text_clause(fields: &[String], expression: &str) -> Value {
    let label_prefix = format!("{}.", fields::PREF_LABEL);
    let (label_fields, plain_fields): (Vec<&String>, Vec<&String>) =
        fields.iter().partition(|f| f.starts_with(&label_prefix));

    let mut should = Vec::new();
    if !plain_fields.is_empty() {
        should.push(json!({
            "query_string": {
                "query": expression,
                "fields": plain_fields,
                "allow_leading_wildcard": true
            }
        }));
    }
    if !label_fields.is_empty() {
        should.push(json!({
            "nested": {
                "path": fields::PREF_LABEL,
                "query": {
                    "query_string": {
                        "query": expression,
                        "fields": label_fields,
                        "allow_leading_wildcard": true
                    }
                }
            }
        }));
    }

    json!({ "bool": { "should": should, "minimum_should_match": 1 } })
}
