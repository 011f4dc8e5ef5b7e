//! Application state for the codelist REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the repository over the search backend, the URI
//! resolver, the URL builder and the configuration.

use std::sync::Arc;

use codelist_persistence::ResourceRepository;
use codelist_persistence::backends::SearchBackend;

use crate::config::ServerConfig;
use crate::resolver::{UriResolver, UriSettings};
use crate::urls::UrlBuilder;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `B` - The search backend type (must implement [`SearchBackend`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use codelist_persistence::backends::memory::MemoryBackend;
/// use codelist_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::for_testing());
/// assert_eq!(state.config().uri_host, "uri.suomi.fi");
/// ```
pub struct AppState<B> {
    /// Repository over the search backend.
    repository: Arc<ResourceRepository<B>>,

    /// URI resolver sharing the repository.
    resolver: Arc<UriResolver<B>>,

    /// URL builder for links.
    urls: Arc<UrlBuilder>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since B is wrapped in Arc and doesn't need to be Clone
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            resolver: Arc::clone(&self.resolver),
            urls: Arc::clone(&self.urls),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: SearchBackend> AppState<B> {
    /// Creates a new AppState with the given backend and configuration.
    ///
    /// Label languages and the backend timeout are taken from `config`.
    pub fn new(backend: Arc<B>, config: ServerConfig) -> Self {
        let repository = Arc::new(
            ResourceRepository::new(backend)
                .with_languages(config.label_languages())
                .with_timeout(config.query_timeout()),
        );
        let urls = UrlBuilder::from_config(&config);
        let resolver = UriResolver::new(
            Arc::clone(&repository),
            urls.clone(),
            UriSettings {
                trusted_host: config.uri_host.clone(),
                path_prefix: config.uri_context_path.clone(),
            },
        );

        Self {
            repository,
            resolver: Arc::new(resolver),
            urls: Arc::new(urls),
            config: Arc::new(config),
        }
    }

    /// Returns the repository.
    pub fn repository(&self) -> &ResourceRepository<B> {
        &self.repository
    }

    /// Returns the URI resolver.
    pub fn resolver(&self) -> &UriResolver<B> {
        &self.resolver
    }

    /// Returns the URL builder.
    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Returns the search backend.
    pub fn backend(&self) -> &B {
        self.repository.backend()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
