//! # codelist-rest - Codelist Search and URI Resolution API
//!
//! This crate provides the HTTP surface of the codelist catalog: paged,
//! filtered listings of registries, schemes and codes, single-resource
//! lookups, integration listings and the resolver that turns resource URIs
//! into API or web URLs.
//!
//! ## Features
//!
//! - **Listings**: Offset paging with `pageSize`/`from`, code value and
//!   label prefixes, free-text search, status and modification filters
//! - **Lookups**: By code value, or by id with `useId=true`
//! - **URI Resolution**: `uri.suomi.fi/codelist/...` URIs validated step by
//!   step and checked for existence before any URL is produced
//! - **Redirects**: Accept-header driven `307` redirects to the API or the
//!   web application
//!
//! ## Backend Support
//!
//! - `elasticsearch` - Elasticsearch backend (default)
//! - in-memory backend, always available, for tests and local runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use codelist_rest::{create_app_with_config, ServerConfig};
//! use codelist_persistence::backends::memory::MemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = MemoryBackend::from_seed_file("seed.json")?;
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(backend, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:9601").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | URL Pattern |
//! |----------|-------------|
//! | registries | `/api/v1/coderegistries[/{r}]` |
//! | schemes | `/api/v1/coderegistries/{r}/codeschemes[/{s}]` |
//! | codes | `/api/v1/coderegistries/{r}/codeschemes/{s}/codes[/{c}]` |
//! | resolve | `/api/v1/uris/resolve?uri=` |
//! | redirect | `/api/v1/uris/redirect?uri=` |
//! | containers | `/api/v1/integration/containers` |
//! | resources | `/api/v1/integration/resources` |
//! | health | `/health`, `/_liveness` |
//!
//! API routes are served below the configured context path.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (repository, resolver, configuration)
//! - [`resolver`] - URI resolution pipeline
//! - [`content_type`] - Accept header negotiation
//! - [`urls`] - API, web and next-page URLs
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Query parameter extraction
//! - [`responses`] - Listing response bodies
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod content_type;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod resolver;
pub mod responses;
pub mod routing;
pub mod state;
pub mod urls;

// Re-export commonly used types
pub use config::{BackendMode, ServerConfig};
pub use error::{RestError, RestResult};
pub use resolver::{ResolveError, ResolvedResource, UriResolver};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use codelist_persistence::backends::SearchBackend;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<B>(backend: B) -> Router
where
    B: SearchBackend + 'static,
{
    create_app_with_config(backend, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up the complete API with all handlers, middleware,
/// and configuration.
///
/// # Example
///
/// ```rust
/// use codelist_persistence::backends::memory::MemoryBackend;
/// use codelist_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(MemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<B>(backend: B, config: ServerConfig) -> Router
where
    B: SearchBackend + 'static,
{
    info!(
        backend = backend.name(),
        context_path = %config.context_path,
        "Creating codelist API server"
    );

    // Create application state
    let state = AppState::new(Arc::new(backend), config.clone());

    // Build the router with all API routes
    let router = routing::api_routes::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
///
/// The API is read-only, so only `GET` and `OPTIONS` are allowed.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([http::Method::GET, http::Method::OPTIONS])
        .allow_headers(Any);

    // Configure origins
    if config.cors_origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "codelist_rest={level},codelist_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
