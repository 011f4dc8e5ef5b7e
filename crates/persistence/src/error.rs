//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates client input errors, resource state
//! errors and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::types::EntityKind;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during query
/// construction and search execution, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Client input errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors caused by malformed client input.
///
/// Every payload in this enum is HTML-escaped before the error is built, so
/// the messages are safe to log and return to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The free-text search term was rejected by the sanitizer.
    #[error("invalid query: '{term}'")]
    InvalidQuery { term: String },

    /// A date parameter was not a valid ISO-8601 value.
    #[error("Date input not valid: {input}")]
    InvalidDate { input: String },

    /// A status value did not name a known status.
    #[error("Status code is not valid: {input}")]
    InvalidStatus { input: String },
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    /// A stored document could not be read as an entity.
    #[error("malformed document {id} in {collection}: {message}")]
    Malformed {
        collection: String,
        id: String,
        message: String,
    },
}

/// Errors originating from the search backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The backend did not answer within the configured timeout.
    #[error("{backend_name} did not respond within {timeout_ms}ms")]
    Timeout {
        backend_name: String,
        timeout_ms: u64,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl BackendError {
    /// Returns true for errors a caller may retry at a higher layer.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable { .. }
                | BackendError::ConnectionFailed { .. }
                | BackendError::Timeout { .. }
        )
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "elasticsearch")]
impl From<elasticsearch::Error> for BackendError {
    fn from(err: elasticsearch::Error) -> Self {
        BackendError::Unavailable {
            backend_name: "elasticsearch".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            kind: EntityKind::CodeScheme,
            key: "jhs/kunta".to_string(),
        });
        assert_eq!(err.to_string(), "code scheme not found: jhs/kunta");
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::InvalidDate {
            input: "&lt;b&gt;".to_string(),
        };
        assert_eq!(err.to_string(), "Date input not valid: &lt;b&gt;");
    }

    #[test]
    fn test_malformed_display() {
        let err = ResourceError::Malformed {
            collection: "coderegistry".to_string(),
            id: "broken".to_string(),
            message: "invalid type: integer `42`, expected a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed document broken in coderegistry: invalid type: integer `42`, expected a string"
        );
    }

    #[test]
    fn test_timeout_is_unavailable() {
        let err = BackendError::Timeout {
            backend_name: "elasticsearch".to_string(),
            timeout_ms: 500,
        };
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("500ms"));

        let err = BackendError::QueryError {
            message: "bad".to_string(),
        };
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = parse_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }
}
