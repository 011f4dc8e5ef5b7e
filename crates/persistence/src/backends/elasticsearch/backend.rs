//! Elasticsearch backend configuration and client.

use std::fmt::Debug;
use std::time::Duration;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, StorageError, StorageResult};

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the Elasticsearch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Index name prefix (default: empty, indices are named after collections).
    #[serde(default)]
    pub index_prefix: String,

    /// Maximum result window size (default: 10000).
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u32,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_nodes() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_max_result_window() -> u32 {
    10000
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            index_prefix: String::new(),
            max_result_window: default_max_result_window(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// Read-only Elasticsearch backend for catalog search.
pub struct ElasticsearchBackend {
    /// The Elasticsearch client.
    client: Elasticsearch,
    /// Configuration.
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("nodes", &self.config.nodes)
            .field("index_prefix", &self.config.index_prefix)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchBackend {
    /// Creates a new Elasticsearch backend with the given configuration.
    pub fn new(config: ElasticsearchConfig) -> StorageResult<Self> {
        let client = Self::build_client(&config)?;
        tracing::info!(
            node = config.nodes.first().map(String::as_str).unwrap_or_default(),
            index_prefix = %config.index_prefix,
            "Elasticsearch client created"
        );
        Ok(Self { client, config })
    }

    /// Builds a client for the first configured node.
    fn build_client(config: &ElasticsearchConfig) -> StorageResult<Elasticsearch> {
        let node = config
            .nodes
            .first()
            .ok_or_else(|| connection_error("no Elasticsearch node configured"))?;
        let node_url: elasticsearch::http::Url = node
            .parse()
            .map_err(|e| connection_error(format!("node URL '{}' is not valid: {}", node, e)))?;

        let mut transport = TransportBuilder::new(SingleNodeConnectionPool::new(node_url))
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            transport = transport.cert_validation(CertificateValidation::None);
        }

        let credentials = config.auth.as_ref().map(|auth| match auth {
            ElasticsearchAuth::Basic { username, password } => {
                Credentials::Basic(username.clone(), password.clone())
            }
            ElasticsearchAuth::Bearer { token } => Credentials::Bearer(token.clone()),
        });
        if let Some(credentials) = credentials {
            transport = transport.auth(credentials);
        }

        let transport = transport
            .build()
            .map_err(|e| connection_error(format!("transport setup failed: {}", e)))?;
        Ok(Elasticsearch::new(transport))
    }

    /// Returns the Elasticsearch client.
    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Returns the index name for a logical collection.
    pub fn index_name(&self, collection: &str) -> String {
        if self.config.index_prefix.is_empty() {
            collection.to_lowercase()
        } else {
            format!(
                "{}_{}",
                self.config.index_prefix,
                collection.to_lowercase()
            )
        }
    }
}

fn connection_error(message: impl Into<String>) -> StorageError {
    BackendError::ConnectionFailed {
        backend_name: "elasticsearch".to_string(),
        message: message.into(),
    }
    .into()
}
