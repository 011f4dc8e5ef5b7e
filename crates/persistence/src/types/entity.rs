//! Catalog entities as stored in the search index.
//!
//! Documents are camelCase JSON. Parent references are embedded so that
//! schemes and codes can be scoped by exact match on the parent code value.

// Field names mirror the stored JSON documents
#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Text keyed by language code (`fi`, `sv`, `en`, ...).
pub type LocalizedText = BTreeMap<String, String>;

/// The three levels of the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Top-level grouping of schemes.
    CodeRegistry,
    /// A code list inside one registry.
    CodeScheme,
    /// One entry of a scheme.
    Code,
}

impl EntityKind {
    /// Number of resource path segments addressing this kind.
    pub fn depth(&self) -> usize {
        match self {
            EntityKind::CodeRegistry => 1,
            EntityKind::CodeScheme => 2,
            EntityKind::Code => 3,
        }
    }

    /// Returns the kind addressed by a path of `depth` segments.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(EntityKind::CodeRegistry),
            2 => Some(EntityKind::CodeScheme),
            3 => Some(EntityKind::Code),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::CodeRegistry => write!(f, "code registry"),
            EntityKind::CodeScheme => write!(f, "code scheme"),
            EntityKind::Code => write!(f, "code"),
        }
    }
}

/// Lifecycle status of a scheme or code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Incomplete,
    Draft,
    Suggested,
    Submitted,
    Valid,
    Superseded,
    Retired,
    Invalid,
}

impl Status {
    /// All statuses in lifecycle order.
    pub const ALL: [Status; 8] = [
        Status::Incomplete,
        Status::Draft,
        Status::Suggested,
        Status::Submitted,
        Status::Valid,
        Status::Superseded,
        Status::Retired,
        Status::Invalid,
    ];

    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Incomplete => "INCOMPLETE",
            Status::Draft => "DRAFT",
            Status::Suggested => "SUGGESTED",
            Status::Submitted => "SUBMITTED",
            Status::Valid => "VALID",
            Status::Superseded => "SUPERSEDED",
            Status::Retired => "RETIRED",
            Status::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or(())
    }
}

/// Behaviour shared by every catalog entity.
pub trait Entity: DeserializeOwned + Send {
    /// The kind of this entity.
    const KIND: EntityKind;

    /// Index-wide unique identifier.
    fn id(&self) -> &str;

    /// Code value, unique within the parent scope.
    fn code_value(&self) -> &str;
}

/// A registry owning schemes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRegistry {
    pub id: String,
    pub code_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub pref_label: LocalizedText,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Entity for CodeRegistry {
    const KIND: EntityKind = EntityKind::CodeRegistry;

    fn id(&self) -> &str {
        &self.id
    }

    fn code_value(&self) -> &str {
        &self.code_value
    }
}

/// Reference from a scheme to its registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRef {
    pub code_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A code list scoped to one registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeScheme {
    pub id: String,
    pub code_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default)]
    pub pref_label: LocalizedText,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    pub code_registry: RegistryRef,
}

impl Entity for CodeScheme {
    const KIND: EntityKind = EntityKind::CodeScheme;

    fn id(&self) -> &str {
        &self.id
    }

    fn code_value(&self) -> &str {
        &self.code_value
    }
}

/// Reference from a code to its scheme and, through it, its registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRef {
    pub code_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub code_registry: RegistryRef,
}

/// One entry of a scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub id: String,
    pub code_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default)]
    pub pref_label: LocalizedText,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    pub code_scheme: SchemeRef,
}

impl Entity for Code {
    const KIND: EntityKind = EntityKind::Code;

    fn id(&self) -> &str {
        &self.id
    }

    fn code_value(&self) -> &str {
        &self.code_value
    }
}

/// Integration view of a scheme (container) or code (resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub pref_label: LocalizedText,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl From<CodeScheme> for ResourceSummary {
    fn from(scheme: CodeScheme) -> Self {
        Self {
            uri: scheme.uri,
            pref_label: scheme.pref_label,
            description: scheme.description,
            status: scheme.status,
            modified: scheme.modified,
        }
    }
}

impl From<Code> for ResourceSummary {
    fn from(code: Code) -> Self {
        Self {
            uri: code.uri,
            pref_label: code.pref_label,
            description: code.description,
            status: code.status,
            modified: code.modified,
        }
    }
}
