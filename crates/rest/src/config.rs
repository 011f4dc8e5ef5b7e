//! Server configuration for the codelist API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CODELIST_SERVER_PORT` | 9601 | Server port |
//! | `CODELIST_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CODELIST_LOG_LEVEL` | info | Log level |
//! | `CODELIST_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CODELIST_ENABLE_CORS` | true | Enable CORS |
//! | `CODELIST_CORS_ORIGINS` | * | Allowed origins |
//! | `CODELIST_PUBLIC_URL` | http://localhost:9601 | Public base URL of this API |
//! | `CODELIST_CONTEXT_PATH` | /codelist-api | Context path of this API |
//! | `CODELIST_WEB_URL` | http://localhost:9600 | Base URL of the web application |
//! | `CODELIST_URI_HOST` | uri.suomi.fi | Trusted host of resource URIs |
//! | `CODELIST_URI_CONTEXT_PATH` | /codelist | Path prefix of resource URIs |
//! | `CODELIST_LANGUAGES` | fi,sv,en | Label languages for search |
//! | `CODELIST_BACKEND` | elasticsearch | Search backend (elasticsearch, memory) |
//! | `CODELIST_SEED_FILE` | - | JSON seed for the memory backend |
//! | `CODELIST_ES_NODES` | http://localhost:9200 | Elasticsearch nodes (comma-separated) |
//! | `CODELIST_ES_INDEX_PREFIX` | - | Elasticsearch index prefix |
//! | `CODELIST_ES_USERNAME` / `CODELIST_ES_PASSWORD` | - | Basic auth |
//! | `CODELIST_ES_REQUEST_TIMEOUT_MS` | 30000 | Elasticsearch transport timeout |
//! | `CODELIST_QUERY_TIMEOUT_MS` | 10000 | Client-side timeout per backend call |
//!
//! # Example
//!
//! ```rust
//! use codelist_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Search backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendMode {
    /// Elasticsearch cluster.
    #[default]
    Elasticsearch,
    /// In-memory documents, optionally seeded from a file.
    Memory,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Elasticsearch => write!(f, "elasticsearch"),
            BackendMode::Memory => write!(f, "memory"),
        }
    }
}

/// Server configuration for the codelist API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "codelist-server")]
#[command(about = "Codelist search and URI resolution API")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CODELIST_SERVER_PORT", default_value = "9601")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CODELIST_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CODELIST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "CODELIST_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CODELIST_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "CODELIST_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Public base URL of this API, used in API links.
    #[arg(long, env = "CODELIST_PUBLIC_URL", default_value = "http://localhost:9601")]
    pub public_url: String,

    /// Context path of this API, appended to the public URL.
    #[arg(long, env = "CODELIST_CONTEXT_PATH", default_value = "/codelist-api")]
    pub context_path: String,

    /// Base URL of the web application, used in redirect targets.
    #[arg(long, env = "CODELIST_WEB_URL", default_value = "http://localhost:9600")]
    pub web_url: String,

    /// The only host accepted in resource URIs.
    #[arg(long, env = "CODELIST_URI_HOST", default_value = "uri.suomi.fi")]
    pub uri_host: String,

    /// Path prefix of resource URIs.
    #[arg(long, env = "CODELIST_URI_CONTEXT_PATH", default_value = "/codelist")]
    pub uri_context_path: String,

    /// Label languages searched by label and free-text filters (comma-separated).
    #[arg(long, env = "CODELIST_LANGUAGES", default_value = "fi,sv,en")]
    pub languages: String,

    /// Search backend.
    #[arg(
        long,
        env = "CODELIST_BACKEND",
        value_enum,
        default_value_t = BackendMode::Elasticsearch
    )]
    pub backend: BackendMode,

    /// JSON seed file for the memory backend.
    #[arg(long, env = "CODELIST_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(long, env = "CODELIST_ES_NODES", default_value = "http://localhost:9200")]
    pub elasticsearch_nodes: String,

    /// Elasticsearch index prefix; empty means indices are named after collections.
    #[arg(long, env = "CODELIST_ES_INDEX_PREFIX", default_value = "")]
    pub elasticsearch_index_prefix: String,

    /// Elasticsearch basic auth username.
    #[arg(long, env = "CODELIST_ES_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch basic auth password.
    #[arg(long, env = "CODELIST_ES_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Elasticsearch transport timeout in milliseconds.
    #[arg(long, env = "CODELIST_ES_REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub elasticsearch_request_timeout_ms: u64,

    /// Client-side timeout for one backend call in milliseconds.
    #[arg(long, env = "CODELIST_QUERY_TIMEOUT_MS", default_value = "10000")]
    pub query_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9601,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            public_url: "http://localhost:9601".to_string(),
            context_path: "/codelist-api".to_string(),
            web_url: "http://localhost:9600".to_string(),
            uri_host: "uri.suomi.fi".to_string(),
            uri_context_path: "/codelist".to_string(),
            languages: "fi,sv,en".to_string(),
            backend: BackendMode::Elasticsearch,
            seed_file: None,
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_index_prefix: String::new(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            elasticsearch_request_timeout_ms: 30000,
            query_timeout_ms: 10000,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the API base: public URL plus context path, without a
    /// trailing slash.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}",
            self.public_url.trim_end_matches('/'),
            self.context_path.trim_end_matches('/')
        )
    }

    /// Returns the configured label languages.
    pub fn label_languages(&self) -> Vec<String> {
        self.languages
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the Elasticsearch node URLs.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the client-side backend timeout.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Builds the Elasticsearch backend configuration.
    #[cfg(feature = "elasticsearch")]
    pub fn elasticsearch_config(
        &self,
    ) -> codelist_persistence::backends::elasticsearch::ElasticsearchConfig {
        use codelist_persistence::backends::elasticsearch::{
            ElasticsearchAuth, ElasticsearchConfig,
        };

        let auth = match (&self.elasticsearch_username, &self.elasticsearch_password) {
            (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        ElasticsearchConfig {
            nodes: self.elasticsearch_node_list(),
            index_prefix: self.elasticsearch_index_prefix.clone(),
            request_timeout_ms: self.elasticsearch_request_timeout_ms,
            auth,
            ..Default::default()
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.query_timeout_ms == 0 {
            errors.push("Query timeout cannot be 0".to_string());
        }

        if url::Url::parse(&self.public_url).is_err() {
            errors.push(format!("Public URL is not a valid URL: {}", self.public_url));
        }

        if url::Url::parse(&self.web_url).is_err() {
            errors.push(format!("Web URL is not a valid URL: {}", self.web_url));
        }

        if !self.context_path.is_empty() && !self.context_path.starts_with('/') {
            errors.push("Context path must start with '/'".to_string());
        }

        if !self.uri_context_path.starts_with('/') {
            errors.push("URI context path must start with '/'".to_string());
        }

        if self.uri_host.trim().is_empty() {
            errors.push("URI host cannot be empty".to_string());
        }

        if self.label_languages().is_empty() {
            errors.push("At least one label language is required".to_string());
        }

        if self.backend == BackendMode::Elasticsearch && self.elasticsearch_node_list().is_empty()
        {
            errors.push("Elasticsearch backend requires at least one node".to_string());
        }

        if self.elasticsearch_username.is_some() != self.elasticsearch_password.is_some() {
            errors.push("Elasticsearch username and password must be set together".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the memory backend and disables features
    /// that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            public_url: "http://localhost".to_string(),
            context_path: "/codelist-api".to_string(),
            web_url: "http://localhost/codelist".to_string(),
            backend: BackendMode::Memory,
            query_timeout_ms: 2000,
            ..Default::default()
        }
    }
}
