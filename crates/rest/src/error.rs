//! Error types for the codelist REST API.
//!
//! Every error is returned as a JSON body of the form
//! `{"meta": {"code": <status>, "message": <text>}}`.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status |
//! |--------|-------------|
//! | QueryError (search term, date, status) | 400 |
//! | ResolveError::InvalidUri / UntrustedHost / InvalidPath | 400 |
//! | ResolveError::EmptyPath / InvalidSegment / UnresolvableUri | 406 |
//! | ResolveError::UnknownAcceptType | 406 |
//! | ResolveError::ResourceNotFound, ResourceError::NotFound | 404 |
//! | BackendError::Unavailable / ConnectionFailed / Timeout | 503 |
//! | anything else | 500 |
//!
//! Messages carry only HTML-escaped client input. Backend failures are
//! logged in full and answered with a fixed message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use codelist_persistence::error::{BackendError, QueryError, ResourceError, StorageError};
use std::fmt;
use tracing::error;

use crate::resolver::ResolveError;

/// Client-facing message of a 503; backend detail stays in the log.
const UNAVAILABLE_MESSAGE: &str = "Search service unavailable";

/// Client-facing message of a 500; backend detail stays in the log.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Bad request - invalid parameter or URI (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Resource not found (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Not acceptable - URI or Accept header cannot be served (HTTP 406).
    NotAcceptable {
        /// Error message.
        message: String,
    },

    /// Backend unavailable or timed out (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the client-facing message.
    pub fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message }
            | RestError::NotFound { message }
            | RestError::NotAcceptable { message }
            | RestError::ServiceUnavailable { message }
            | RestError::InternalError { message } => message,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::NotAcceptable { message } => write!(f, "Not acceptable: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(create_error_body(status, self.message()))).into_response()
    }
}

/// Creates the JSON error body.
fn create_error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "meta": {
            "code": status.as_u16(),
            "message": message
        }
    })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Query(e) => e.into(),
            StorageError::Resource(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            ResourceError::Malformed { .. } => {
                error!(error = %err, "Stored document could not be read");
                RestError::InternalError {
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        error!(error = %err, "Backend call failed");
        if err.is_unavailable() {
            RestError::ServiceUnavailable {
                message: UNAVAILABLE_MESSAGE.to_string(),
            }
        } else {
            RestError::InternalError {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
            }
        }
    }
}

impl From<ResolveError> for RestError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidUri | ResolveError::UntrustedHost | ResolveError::InvalidPath => {
                RestError::BadRequest {
                    message: err.to_string(),
                }
            }
            ResolveError::EmptyPath
            | ResolveError::InvalidSegment { .. }
            | ResolveError::UnresolvableUri
            | ResolveError::UnknownAcceptType { .. } => RestError::NotAcceptable {
                message: err.to_string(),
            },
            ResolveError::ResourceNotFound => RestError::NotFound {
                message: err.to_string(),
            },
            ResolveError::Storage(e) => e.into(),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use codelist_persistence::types::EntityKind;

    #[test]
    fn test_query_error_is_bad_request() {
        let err: RestError = StorageError::Query(QueryError::InvalidStatus {
            input: "&lt;x&gt;".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Status code is not valid: &lt;x&gt;");
    }

    #[test]
    fn test_not_found_mapping() {
        let err: RestError = StorageError::Resource(ResourceError::NotFound {
            kind: EntityKind::Code,
            key: "jhs/kunta/999".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: RestError = ResolveError::ResourceNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_unavailable_is_503() {
        let err: RestError = BackendError::Timeout {
            backend_name: "elasticsearch".to_string(),
            timeout_ms: 100,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: RestError = BackendError::QueryError {
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_backend_detail_is_not_returned() {
        let err: RestError = StorageError::Backend(BackendError::QueryError {
            message: "search on codelist_code returned status 400".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");

        let err: RestError = BackendError::Unavailable {
            backend_name: "elasticsearch".to_string(),
            message: "error sending request for url (http://10.0.0.5:9200/)".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.message().contains("10.0.0.5"));

        let err: RestError = ResourceError::Malformed {
            collection: "code".to_string(),
            id: "broken".to_string(),
            message: "missing field `codeValue`".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("codeValue"));
    }

    #[test]
    fn test_resolve_error_mapping() {
        let cases = [
            (ResolveError::InvalidUri, StatusCode::BAD_REQUEST),
            (ResolveError::UntrustedHost, StatusCode::BAD_REQUEST),
            (ResolveError::InvalidPath, StatusCode::BAD_REQUEST),
            (ResolveError::EmptyPath, StatusCode::NOT_ACCEPTABLE),
            (
                ResolveError::InvalidSegment { position: 2 },
                StatusCode::NOT_ACCEPTABLE,
            ),
            (ResolveError::UnresolvableUri, StatusCode::NOT_ACCEPTABLE),
            (
                ResolveError::UnknownAcceptType {
                    accept: "text/csv".to_string(),
                },
                StatusCode::NOT_ACCEPTABLE,
            ),
        ];
        for (err, status) in cases {
            let rest: RestError = err.into();
            assert_eq!(rest.status_code(), status);
        }
    }

    #[test]
    fn test_create_error_body() {
        let body = create_error_body(StatusCode::NOT_FOUND, "Resource not found");
        assert_eq!(body["meta"]["code"], 404);
        assert_eq!(body["meta"]["message"], "Resource not found");
    }
}
