//! Structured, backend-independent search queries.
//!
//! A [`StructuredQuery`] is an immutable [`SearchScope`] plus a list of
//! [`QueryFilter`]s that all must hold. Backends translate it into their
//! own query language (see `backends::elasticsearch::search`) or evaluate
//! it directly (see `backends::memory`).

// Variant fields are named after the index contract
#![allow(missing_docs)]

use chrono::{DateTime, Utc};

use crate::search::TextQuery;

use super::entity::EntityKind;

/// Index field names shared with the external index contract.
pub mod fields {
    /// Entity identifier (exact).
    pub const ID: &str = "id.keyword";
    /// Entity code value (exact, lowercased).
    pub const CODE_VALUE: &str = "codeValue.keyword";
    /// Analyzed code value, used by free-text search.
    pub const CODE_VALUE_TEXT: &str = "codeValue";
    /// Nested label object.
    pub const PREF_LABEL: &str = "prefLabel";
    /// Modification timestamp.
    pub const MODIFIED: &str = "modified";
    /// Lifecycle status.
    pub const STATUS: &str = "status";
    /// Resource URI.
    pub const URI: &str = "uri";
    /// Registry of a scheme.
    pub const SCHEME_REGISTRY: &str = "codeRegistry.codeValue.keyword";
    /// Scheme of a code.
    pub const CODE_SCHEME: &str = "codeScheme.codeValue.keyword";
    /// Registry of the scheme of a code.
    pub const CODE_REGISTRY: &str = "codeScheme.codeRegistry.codeValue.keyword";
    /// URI of the scheme of a code.
    pub const CODE_SCHEME_URI: &str = "codeScheme.uri";

    /// Returns the per-language label field, e.g. `prefLabel.fi`.
    pub fn pref_label(language: &str) -> String {
        format!("{}.{}", PREF_LABEL, language)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns the Elasticsearch order keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// What a query runs against and under which parent constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    collection: String,
    kind: EntityKind,
    parents: Vec<(&'static str, String)>,
    sort_field: &'static str,
    sort_direction: SortDirection,
}

impl SearchScope {
    /// Scope over all registries.
    pub fn registries(collection: impl Into<String>) -> Self {
        Self::new(collection, EntityKind::CodeRegistry, Vec::new())
    }

    /// Scope over the schemes of one registry.
    pub fn schemes(collection: impl Into<String>, registry: &str) -> Self {
        Self::new(
            collection,
            EntityKind::CodeScheme,
            vec![(fields::SCHEME_REGISTRY, registry.to_lowercase())],
        )
    }

    /// Scope over schemes regardless of registry.
    pub fn all_schemes(collection: impl Into<String>) -> Self {
        Self::new(collection, EntityKind::CodeScheme, Vec::new())
    }

    /// Scope over the codes of one scheme.
    pub fn codes(collection: impl Into<String>, registry: &str, scheme: &str) -> Self {
        Self::new(
            collection,
            EntityKind::Code,
            vec![
                (fields::CODE_SCHEME, scheme.to_lowercase()),
                (fields::CODE_REGISTRY, registry.to_lowercase()),
            ],
        )
    }

    /// Scope over codes regardless of scheme.
    pub fn all_codes(collection: impl Into<String>) -> Self {
        Self::new(collection, EntityKind::Code, Vec::new())
    }

    fn new(
        collection: impl Into<String>,
        kind: EntityKind,
        parents: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            collection: collection.into(),
            kind,
            parents,
            sort_field: fields::CODE_VALUE,
            sort_direction: SortDirection::Ascending,
        }
    }

    /// The logical collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The entity kind stored in the collection.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Parent constraints as (field, lowercased value) pairs.
    pub fn parents(&self) -> &[(&'static str, String)] {
        &self.parents
    }

    /// The sort field.
    pub fn sort_field(&self) -> &'static str {
        self.sort_field
    }

    /// The sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }
}

/// A single predicate of a structured query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    /// Field equals value.
    ExactMatch { field: String, value: String },

    /// Field starts with value.
    PrefixMatch { field: String, value: String },

    /// Phrase-prefix match of `term` in any language field of a nested
    /// label object.
    MultiLangPrefixMatch {
        path: String,
        fields: Vec<String>,
        term: String,
    },

    /// Modification timestamp strictly after the instant.
    ModifiedAfter(DateTime<Utc>),

    /// Sanitized free-text query over the given fields; any field may match.
    FreeText {
        fields: Vec<String>,
        query: TextQuery,
    },

    /// Field equals one of the values.
    AnyOf { field: String, values: Vec<String> },

    /// Field equals none of the values.
    NoneOf { field: String, values: Vec<String> },
}

impl QueryFilter {
    /// Creates an exact match.
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryFilter::ExactMatch {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a prefix match.
    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryFilter::PrefixMatch {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A complete, immutable query: scope plus conjunctive filters.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredQuery {
    /// Collection, parent constraints and sort order.
    pub scope: SearchScope,

    /// Filters that all must hold.
    pub filters: Vec<QueryFilter>,
}

impl StructuredQuery {
    /// Returns every filter including the parent constraints of the scope.
    pub fn all_filters(&self) -> impl Iterator<Item = QueryFilter> + '_ {
        self.scope
            .parents()
            .iter()
            .map(|(field, value)| QueryFilter::exact(*field, value.clone()))
            .chain(self.filters.iter().cloned())
    }
}
