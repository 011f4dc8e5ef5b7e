//! In-memory search backend.
//!
//! Holds JSON documents per collection and evaluates [`StructuredQuery`]
//! values directly. Keyword fields compare case-insensitively, matching the
//! lowercase normalizer of the production index.
//!
//! ```
//! use codelist_persistence::backends::memory::MemoryBackend;
//! use serde_json::json;
//!
//! let backend = MemoryBackend::new();
//! backend.insert("coderegistry", json!({"id": "r1", "codeValue": "jhs"}));
//! assert_eq!(backend.len("coderegistry"), 1);
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BackendError, StorageResult};
use crate::search::sanitizer::tokenize;
use crate::types::{Page, QueryFilter, SortDirection, StructuredQuery, fields};

use super::{RawHits, SearchBackend};

/// Document store keyed by collection name.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryBackend {
    /// Creates an empty backend with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend from a seed object mapping collection names to
    /// document arrays, e.g. `{"coderegistry": [...], "code": [...]}`.
    pub fn from_seed(seed: Value) -> StorageResult<Self> {
        let Value::Object(map) = seed else {
            return Err(BackendError::SerializationError {
                message: "seed must be a JSON object of collection arrays".to_string(),
            }
            .into());
        };

        let backend = Self::new();
        for (collection, documents) in map {
            let Value::Array(documents) = documents else {
                return Err(BackendError::SerializationError {
                    message: format!("seed collection '{}' is not an array", collection),
                }
                .into());
            };
            backend.create_collection(&collection);
            backend.insert_many(&collection, documents);
        }
        Ok(backend)
    }

    /// Loads a seed file, see [`MemoryBackend::from_seed`].
    pub fn from_seed_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BackendError::Internal {
            backend_name: "memory".to_string(),
            message: format!("failed to read seed file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;
        let backend = Self::from_seed(serde_json::from_str(&content)?)?;
        info!(
            path = %path.display(),
            collections = backend.collections.read().len(),
            "Loaded seed documents"
        );
        Ok(backend)
    }

    /// Creates an empty collection if it does not exist.
    pub fn create_collection(&self, collection: &str) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default();
    }

    /// Adds a document, creating the collection on first use.
    pub fn insert(&self, collection: &str, document: Value) {
        self.insert_many(collection, [document]);
    }

    /// Adds several documents, creating the collection on first use.
    pub fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = Value>) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns true if the collection is missing or empty.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn collection_exists(&self, collection: &str) -> StorageResult<bool> {
        Ok(self.collections.read().contains_key(collection))
    }

    async fn execute(&self, query: &StructuredQuery, page: &Page) -> StorageResult<RawHits> {
        let filters: Vec<QueryFilter> = query.all_filters().collect();

        let mut matched: Vec<Value> = {
            let collections = self.collections.read();
            let Some(documents) = collections.get(query.scope.collection()) else {
                return Ok(RawHits::default());
            };
            documents
                .iter()
                .filter(|doc| filters.iter().all(|f| matches_filter(doc, f)))
                .cloned()
                .collect()
        };

        let sort_field = query.scope.sort_field();
        matched.sort_by(|a, b| {
            let ordering = sort_key(a, sort_field).cmp(&sort_key(b, sort_field));
            let ordering = match query.scope.sort_direction() {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            ordering.then_with(|| sort_key(a, fields::ID).cmp(&sort_key(b, fields::ID)))
        });

        let total = matched.len() as u64;
        let documents: Vec<Value> = matched
            .into_iter()
            .skip(page.effective_from() as usize)
            .take(page.effective_size() as usize)
            .collect();

        debug!(
            collection = query.scope.collection(),
            total,
            returned = documents.len(),
            "Memory query executed"
        );
        Ok(RawHits::new(total, documents))
    }
}

/// Resolves an index field name against a document.
///
/// `.keyword` sub-fields map to the field itself.
fn lookup<'a>(document: &'a Value, field: &str) -> Option<&'a Value> {
    let path = field.strip_suffix(".keyword").unwrap_or(field);
    path.split('.')
        .try_fold(document, |value, segment| value.get(segment))
}

fn keyword(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn field_keyword(document: &Value, field: &str) -> Option<String> {
    lookup(document, field).and_then(keyword)
}

fn sort_key(document: &Value, field: &str) -> String {
    field_keyword(document, field).unwrap_or_default()
}

fn matches_filter(document: &Value, filter: &QueryFilter) -> bool {
    match filter {
        QueryFilter::ExactMatch { field, value } => {
            field_keyword(document, field).is_some_and(|v| v == value.to_lowercase())
        }
        QueryFilter::PrefixMatch { field, value } => {
            field_keyword(document, field).is_some_and(|v| v.starts_with(&value.to_lowercase()))
        }
        QueryFilter::MultiLangPrefixMatch { fields, term, .. } => fields.iter().any(|field| {
            lookup(document, field)
                .and_then(Value::as_str)
                .is_some_and(|text| phrase_prefix_match(text, term))
        }),
        QueryFilter::ModifiedAfter(after) => lookup(document, fields::MODIFIED)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|modified| modified.with_timezone(&Utc) > *after),
        QueryFilter::FreeText { fields, query } => fields.iter().any(|field| {
            lookup(document, field)
                .and_then(Value::as_str)
                .is_some_and(|text| query.matches(text))
        }),
        QueryFilter::AnyOf { field, values } => field_keyword(document, field)
            .is_some_and(|v| values.iter().any(|candidate| candidate.to_lowercase() == v)),
        QueryFilter::NoneOf { field, values } => field_keyword(document, field)
            .is_none_or(|v| values.iter().all(|candidate| candidate.to_lowercase() != v)),
    }
}

/// Phrase-prefix semantics: the term's words occur consecutively in the text
/// and the last word may be a prefix.
fn phrase_prefix_match(text: &str, term: &str) -> bool {
    let words = tokenize(term);
    let Some((last, init)) = words.split_last() else {
        return false;
    };
    let tokens = tokenize(text);
    tokens.windows(words.len()).any(|window| {
        window[..init.len()] == *init && window[init.len()].starts_with(last.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::QueryTermSanitizer;
    use crate::types::SearchScope;
    use chrono::TimeZone;
    use serde_json::json;

    fn code(id: &str, code_value: &str, scheme: &str, label: &str, modified: &str) -> Value {
        json!({
            "id": id,
            "codeValue": code_value,
            "status": "VALID",
            "uri": format!("http://uri.suomi.fi/codelist/jhs/{}/code/{}", scheme, code_value),
            "prefLabel": {"fi": label},
            "modified": modified,
            "codeScheme": {
                "codeValue": scheme,
                "uri": format!("http://uri.suomi.fi/codelist/jhs/{}", scheme),
                "codeRegistry": {"codeValue": "jhs"}
            }
        })
    }

    fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.insert_many(
            "code",
            vec![
                code("c3", "092", "kunta", "Vantaa", "2019-01-01T00:00:00Z"),
                code("c1", "091", "kunta", "Helsinki", "2017-01-01T00:00:00Z"),
                code("c2", "049", "kunta", "Espoo", "2018-06-01T00:00:00Z"),
                code("c4", "01", "maakunta", "Uusimaa", "2018-06-01T00:00:00Z"),
            ],
        );
        backend
    }

    fn codes_query(filters: Vec<QueryFilter>) -> StructuredQuery {
        StructuredQuery {
            scope: SearchScope::codes("code", "JHS", "Kunta"),
            filters,
        }
    }

    fn code_values(hits: &RawHits) -> Vec<&str> {
        hits.documents
            .iter()
            .filter_map(|d| d["codeValue"].as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_scope_and_sort() {
        let hits = seeded()
            .execute(&codes_query(vec![]), &Page::all())
            .await
            .unwrap();
        assert_eq!(hits.total, 3);
        assert_eq!(code_values(&hits), vec!["049", "091", "092"]);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let hits = seeded()
            .execute(&codes_query(vec![]), &Page::new(2, 1))
            .await
            .unwrap();
        assert_eq!(hits.total, 3);
        assert_eq!(code_values(&hits), vec!["091", "092"]);
    }

    #[tokio::test]
    async fn test_prefix_and_modified_after() {
        let after = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        let hits = seeded()
            .execute(
                &codes_query(vec![
                    QueryFilter::prefix(fields::CODE_VALUE, "09"),
                    QueryFilter::ModifiedAfter(after),
                ]),
                &Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(code_values(&hits), vec!["092"]);
    }

    #[tokio::test]
    async fn test_label_phrase_prefix() {
        let filter = QueryFilter::MultiLangPrefixMatch {
            path: "prefLabel".to_string(),
            fields: vec!["prefLabel.fi".to_string(), "prefLabel.sv".to_string()],
            term: "hels".to_string(),
        };
        let hits = seeded()
            .execute(&codes_query(vec![filter]), &Page::all())
            .await
            .unwrap();
        assert_eq!(code_values(&hits), vec!["091"]);
    }

    #[tokio::test]
    async fn test_free_text_and_uri_lists() {
        let query = QueryTermSanitizer::new().sanitize("taa").unwrap();
        let hits = seeded()
            .execute(
                &StructuredQuery {
                    scope: SearchScope::all_codes("code"),
                    filters: vec![
                        QueryFilter::FreeText {
                            fields: vec!["codeValue".to_string(), "prefLabel.fi".to_string()],
                            query,
                        },
                        QueryFilter::NoneOf {
                            field: "uri".to_string(),
                            values: vec!["http://uri.suomi.fi/codelist/jhs/maakunta/code/01".to_string()],
                        },
                    ],
                },
                &Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(code_values(&hits), vec!["092"]);
    }

    #[tokio::test]
    async fn test_any_of_container() {
        let hits = seeded()
            .execute(
                &StructuredQuery {
                    scope: SearchScope::all_codes("code"),
                    filters: vec![QueryFilter::AnyOf {
                        field: fields::CODE_SCHEME_URI.to_string(),
                        values: vec!["HTTP://URI.SUOMI.FI/codelist/jhs/maakunta".to_string()],
                    }],
                },
                &Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(code_values(&hits), vec!["01"]);
    }

    #[tokio::test]
    async fn test_collection_exists() {
        let backend = MemoryBackend::new();
        assert!(!backend.collection_exists("code").await.unwrap());
        backend.create_collection("code");
        assert!(backend.collection_exists("code").await.unwrap());
        assert!(backend.is_empty("code"));
    }

    #[test]
    fn test_from_seed_rejects_non_arrays() {
        assert!(MemoryBackend::from_seed(json!({"code": {}})).is_err());
        assert!(MemoryBackend::from_seed(json!([])).is_err());
        let backend = MemoryBackend::from_seed(json!({"code": [{"id": "a"}]})).unwrap();
        assert_eq!(backend.len("code"), 1);
    }
}
