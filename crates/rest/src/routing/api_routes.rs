//! Codelist API route configuration.

use axum::{Router, routing::get};
use codelist_persistence::backends::SearchBackend;

use crate::handlers;
use crate::state::AppState;

/// Creates all codelist API routes.
///
/// # Routes
///
/// ## Catalog (below the context path)
/// - `GET /api/v1/coderegistries` - Registry listing
/// - `GET /api/v1/coderegistries/{registry}` - Registry
/// - `GET /api/v1/coderegistries/{registry}/codeschemes` - Scheme listing
/// - `GET /api/v1/coderegistries/{registry}/codeschemes/{scheme}` - Scheme
/// - `GET /api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes` - Code listing
/// - `GET /api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes/{code}` - Code
///
/// Single-resource routes also match with a trailing slash, the form
/// produced by the URI resolver.
///
/// ## URI resolver
/// - `GET /api/v1/uris/resolve` - Resolve a resource URI
/// - `GET /api/v1/uris/redirect` - Redirect a resource URI
///
/// ## Integration
/// - `GET /api/v1/integration/containers` - Containers
/// - `GET /api/v1/integration/resources` - Resources
///
/// ## System (at the root)
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
pub fn create_routes<B>(state: AppState<B>) -> Router
where
    B: SearchBackend + 'static,
{
    let api = Router::new()
        // Registries
        .route(
            "/api/v1/coderegistries",
            get(handlers::list_registries_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}",
            get(handlers::get_registry_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}/",
            get(handlers::get_registry_handler::<B>),
        )
        // Schemes
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes",
            get(handlers::list_schemes_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes/{scheme}",
            get(handlers::get_scheme_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes/{scheme}/",
            get(handlers::get_scheme_handler::<B>),
        )
        // Codes
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes",
            get(handlers::list_codes_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes/{code}",
            get(handlers::get_code_handler::<B>),
        )
        .route(
            "/api/v1/coderegistries/{registry}/codeschemes/{scheme}/codes/{code}/",
            get(handlers::get_code_handler::<B>),
        )
        // URI resolver
        .route("/api/v1/uris/resolve", get(handlers::resolve_handler::<B>))
        .route("/api/v1/uris/redirect", get(handlers::redirect_handler::<B>))
        // Integration
        .route(
            "/api/v1/integration/containers",
            get(handlers::containers_handler::<B>),
        )
        .route(
            "/api/v1/integration/resources",
            get(handlers::resources_handler::<B>),
        );

    let context_path = state.config().context_path.trim_end_matches('/').to_string();
    let api = if context_path.is_empty() {
        api
    } else {
        Router::new().nest(&context_path, api)
    };

    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<B>))
        .route("/_liveness", get(handlers::liveness_handler))
        .merge(api)
        // State
        .with_state(state)
}
