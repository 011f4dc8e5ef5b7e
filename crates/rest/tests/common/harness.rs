//! Test server harness.

#![allow(dead_code)]

use axum_test::TestServer;
use codelist_persistence::backends::memory::MemoryBackend;
use codelist_rest::{ServerConfig, create_app_with_config};

use super::fixtures::seed;

/// Creates a test server over the seeded catalog.
pub fn create_test_server() -> TestServer {
    let backend = MemoryBackend::from_seed(seed()).expect("Failed to seed backend");
    create_test_server_with(backend)
}

/// Creates a test server over the given backend.
pub fn create_test_server_with(backend: MemoryBackend) -> TestServer {
    let app = create_app_with_config(backend, ServerConfig::for_testing());
    TestServer::new(app).expect("Failed to create test server")
}

/// Prefixes an API path with the test context path.
pub fn api_path(path: &str) -> String {
    format!("/codelist-api/api/v1{}", path)
}
