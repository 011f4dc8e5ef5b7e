//! Resolution of catalog resource URIs.
//!
//! A URI such as `http://uri.suomi.fi/codelist/jhs/kunta/091` names a code
//! by its registry, scheme and code values. [`UriResolver`] checks the URI
//! step by step and only returns a [`ResolvedResource`] once the addressed
//! entity is known to exist:
//!
//! 1. parse the URI (spaces are tolerated and encoded),
//! 2. require the trusted host,
//! 3. require the path prefix on a segment boundary,
//! 4. split the remainder into segments,
//! 5. decode and validate each segment,
//! 6. pick the resource kind from the segment count,
//! 7. look the entity up in the repository,
//! 8. build the API and web URLs.

mod path;

pub use path::ResourcePath;

use std::sync::Arc;

use codelist_persistence::backends::SearchBackend;
use codelist_persistence::error::StorageError;
use codelist_persistence::search::{LookupKey, escape_for_diagnostics};
use codelist_persistence::types::EntityKind;
use codelist_persistence::ResourceRepository;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::content_type::{AcceptList, RedirectTarget};
use crate::urls::UrlBuilder;

/// Errors raised while resolving a URI.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Missing or unparsable URI.
    #[error("URI string was not valid")]
    InvalidUri,

    /// The URI names a host other than the trusted one.
    #[error("This URI is not resolvable as a codelist resource")]
    UntrustedHost,

    /// The path does not start with the codelist prefix.
    #[error("Codelist resource URI not resolvable, wrong context path")]
    InvalidPath,

    /// Nothing follows the prefix.
    #[error("Codelist resource URI not resolvable, empty resource path")]
    EmptyPath,

    /// A path segment is empty after decoding and trimming.
    #[error("Resource identifier at position {position} is empty")]
    InvalidSegment {
        /// 1-based segment position.
        position: usize,
    },

    /// More than three segments.
    #[error("Codelist resource URI not resolvable")]
    UnresolvableUri,

    /// The addressed entity does not exist.
    #[error("Resource not found")]
    ResourceNotFound,

    /// The Accept header lists neither JSON nor HTML.
    #[error("Unknown Accept header: {accept}")]
    UnknownAcceptType {
        /// HTML-escaped header value.
        accept: String,
    },

    /// The existence check failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A URI whose entity is confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Decoded, lowercased path.
    pub path: ResourcePath,
    /// URL of the entity in this API.
    pub api_url: String,
    /// URL of the entity in the web application.
    pub web_url: String,
}

/// Trusted host and path prefix accepted in resource URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriSettings {
    /// Host compared ASCII case-insensitively.
    pub trusted_host: String,
    /// Path prefix, for example `/codelist`.
    pub path_prefix: String,
}

impl Default for UriSettings {
    fn default() -> Self {
        Self {
            trusted_host: "uri.suomi.fi".to_string(),
            path_prefix: "/codelist".to_string(),
        }
    }
}

/// Resolves resource URIs against the repository.
#[derive(Debug)]
pub struct UriResolver<B> {
    repository: Arc<ResourceRepository<B>>,
    urls: UrlBuilder,
    settings: UriSettings,
}

impl<B> Clone for UriResolver<B> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            urls: self.urls.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<B: SearchBackend> UriResolver<B> {
    /// Creates a resolver.
    pub fn new(
        repository: Arc<ResourceRepository<B>>,
        urls: UrlBuilder,
        settings: UriSettings,
    ) -> Self {
        let path_prefix = format!("/{}", settings.path_prefix.trim_matches('/'));
        Self {
            repository,
            urls,
            settings: UriSettings {
                path_prefix,
                ..settings
            },
        }
    }

    /// Returns the accepted host and prefix.
    pub fn settings(&self) -> &UriSettings {
        &self.settings
    }

    /// Resolves a URI to its existing entity.
    pub async fn resolve(&self, uri: &str) -> Result<ResolvedResource, ResolveError> {
        let path = self.resource_path(uri).inspect_err(|e| {
            debug!(error = %e, uri = %escape_for_diagnostics(uri), "URI rejected");
        })?;
        self.ensure_exists(&path).await?;

        Ok(ResolvedResource {
            kind: path.kind(),
            api_url: self.urls.api_url(&path),
            web_url: self.urls.web_url(&path),
            path,
        })
    }

    /// Resolves a URI and picks the redirect URL for an Accept header.
    ///
    /// The Accept header is checked first so that an unacceptable request
    /// does not reach the backend.
    pub async fn redirect(&self, uri: &str, accept: &AcceptList) -> Result<String, ResolveError> {
        let Some(target) = accept.redirect_target() else {
            let accept = escape_for_diagnostics(&accept.to_string());
            warn!(accept = %accept, "Unknown Accept header");
            return Err(ResolveError::UnknownAcceptType { accept });
        };

        let resolved = self.resolve(uri).await?;
        Ok(match target {
            RedirectTarget::Api => resolved.api_url,
            RedirectTarget::Web => resolved.web_url,
        })
    }

    /// Runs the syntactic steps: parse, host, prefix, split, decode and
    /// dispatch.
    pub fn resource_path(&self, uri: &str) -> Result<ResourcePath, ResolveError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ResolveError::InvalidUri);
        }
        let parsed = Url::parse(&uri.replace(' ', "%20")).map_err(|_| ResolveError::InvalidUri)?;

        let host_matches = parsed
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(&self.settings.trusted_host));
        if !host_matches {
            return Err(ResolveError::UntrustedHost);
        }

        let remainder = strip_path_prefix(parsed.path(), &self.settings.path_prefix)
            .ok_or(ResolveError::InvalidPath)?;

        ResourcePath::parse(remainder)
    }

    async fn ensure_exists(&self, path: &ResourcePath) -> Result<(), ResolveError> {
        let registry = path.registry_code();
        let found = match (path.scheme_code(), path.code_value()) {
            (Some(scheme), Some(code)) => self
                .repository
                .get_code(registry, scheme, &LookupKey::CodeValue(code.to_string()))
                .await?
                .is_some(),
            (Some(scheme), None) => self
                .repository
                .get_scheme(registry, &LookupKey::CodeValue(scheme.to_string()))
                .await?
                .is_some(),
            _ => self
                .repository
                .get_registry(&LookupKey::CodeValue(registry.to_string()))
                .await?
                .is_some(),
        };

        if found {
            Ok(())
        } else {
            debug!(path = %escape_for_diagnostics(&path.to_string()), "Resource not found");
            Err(ResolveError::ResourceNotFound)
        }
    }
}

/// Returns the path after `prefix`, if `path` starts with it on a segment
/// boundary. The comparison ignores ASCII case.
fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &path[prefix.len()..];
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelist_persistence::backends::memory::MemoryBackend;
    use serde_json::json;

    fn resolver() -> UriResolver<MemoryBackend> {
        let backend = MemoryBackend::from_seed(json!({
            "coderegistry": [
                {"id": "r1", "codeValue": "jhs", "prefLabel": {"fi": "JHS"}}
            ],
            "codescheme": [
                {"id": "s1", "codeValue": "kunta", "status": "VALID",
                 "codeRegistry": {"codeValue": "jhs"}}
            ],
            "code": [
                {"id": "c1", "codeValue": "091", "status": "VALID",
                 "codeScheme": {"codeValue": "kunta", "codeRegistry": {"codeValue": "jhs"}}}
            ]
        }))
        .unwrap();
        let repository = Arc::new(ResourceRepository::new(Arc::new(backend)));
        UriResolver::new(
            repository,
            UrlBuilder::new("http://api.test/codelist-api", "http://web.test"),
            UriSettings::default(),
        )
    }

    #[test]
    fn test_strip_path_prefix() {
        assert_eq!(strip_path_prefix("/codelist/jhs", "/codelist"), Some("/jhs"));
        assert_eq!(strip_path_prefix("/CodeList/jhs", "/codelist"), Some("/jhs"));
        assert_eq!(strip_path_prefix("/codelist", "/codelist"), Some(""));
        assert_eq!(strip_path_prefix("/codelists/jhs", "/codelist"), None);
        assert_eq!(strip_path_prefix("/other/jhs", "/codelist"), None);
        assert_eq!(strip_path_prefix("/c", "/codelist"), None);
    }

    #[test]
    fn test_resource_path_errors() {
        let resolver = resolver();
        assert!(matches!(resolver.resource_path(""), Err(ResolveError::InvalidUri)));
        assert!(matches!(
            resolver.resource_path("not a uri"),
            Err(ResolveError::InvalidUri)
        ));
        assert!(matches!(
            resolver.resource_path("http://example.com/codelist/jhs"),
            Err(ResolveError::UntrustedHost)
        ));
        assert!(matches!(
            resolver.resource_path("http://uri.suomi.fi.evil.com/codelist/jhs"),
            Err(ResolveError::UntrustedHost)
        ));
        assert!(matches!(
            resolver.resource_path("http://uri.suomi.fi/terminology/jhs"),
            Err(ResolveError::InvalidPath)
        ));
        assert!(matches!(
            resolver.resource_path("http://uri.suomi.fi/codelist/"),
            Err(ResolveError::EmptyPath)
        ));
        assert!(matches!(
            resolver.resource_path("http://uri.suomi.fi/codelist/a/b/c/d"),
            Err(ResolveError::UnresolvableUri)
        ));
    }

    #[test]
    fn test_host_case_insensitive_and_spaces_encoded() {
        let resolver = resolver();
        let path = resolver
            .resource_path("http://URI.Suomi.FI/codelist/JHS/kunta koodit")
            .unwrap();
        assert_eq!(path.segments(), ["jhs", "kunta koodit"]);
    }

    #[tokio::test]
    async fn test_resolve_each_kind() {
        let resolver = resolver();

        let registry = resolver
            .resolve("http://uri.suomi.fi/codelist/jhs")
            .await
            .unwrap();
        assert_eq!(registry.kind, EntityKind::CodeRegistry);
        assert_eq!(
            registry.api_url,
            "http://api.test/codelist-api/api/v1/coderegistries/jhs/"
        );

        let scheme = resolver
            .resolve("http://uri.suomi.fi/codelist/jhs/kunta/")
            .await
            .unwrap();
        assert_eq!(scheme.kind, EntityKind::CodeScheme);
        assert_eq!(
            scheme.web_url,
            "http://web.test/codescheme;registryCode=jhs;schemeCode=kunta"
        );

        let code = resolver
            .resolve("http://uri.suomi.fi/codelist/JHS/Kunta/091")
            .await
            .unwrap();
        assert_eq!(code.kind, EntityKind::Code);
        assert_eq!(code.path.to_string(), "jhs/kunta/091");
    }

    #[tokio::test]
    async fn test_resolve_missing_resource() {
        let resolver = resolver();
        let result = resolver
            .resolve("http://uri.suomi.fi/codelist/jhs/kunta/999")
            .await;
        assert!(matches!(result, Err(ResolveError::ResourceNotFound)));

        let result = resolver.resolve("http://uri.suomi.fi/codelist/other").await;
        assert!(matches!(result, Err(ResolveError::ResourceNotFound)));
    }

    #[tokio::test]
    async fn test_redirect_targets() {
        let resolver = resolver();
        let uri = "http://uri.suomi.fi/codelist/jhs/kunta/091";

        let api = resolver
            .redirect(uri, &AcceptList::parse("application/json"))
            .await
            .unwrap();
        assert_eq!(
            api,
            "http://api.test/codelist-api/api/v1/coderegistries/jhs/codeschemes/kunta/codes/091/"
        );

        let web = resolver.redirect(uri, &AcceptList::default()).await.unwrap();
        assert_eq!(
            web,
            "http://web.test/code;registryCode=jhs;schemeCode=kunta;codeCode=091"
        );

        let result = resolver
            .redirect(uri, &AcceptList::parse("text/<csv>"))
            .await;
        match result {
            Err(ResolveError::UnknownAcceptType { accept }) => {
                assert!(!accept.contains('<'));
            }
            other => panic!("expected UnknownAcceptType, got {:?}", other),
        }
    }
}
