//! Codelist API server
//!
//! Serves catalog listings, lookups and URI resolution over an
//! Elasticsearch index or an in-memory seed.

use clap::Parser;
use codelist_persistence::backends::memory::MemoryBackend;
use codelist_rest::{BackendMode, ServerConfig, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        backend = %config.backend,
        api_base = %config.api_base_url(),
        "Starting codelist API server"
    );

    match config.backend {
        BackendMode::Elasticsearch => start_elasticsearch(config).await,
        BackendMode::Memory => start_memory(config).await,
    }
}

/// Starts the server over an in-memory catalog.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    let backend = match &config.seed_file {
        Some(path) => {
            info!(seed_file = %path.display(), "Loading in-memory catalog");
            MemoryBackend::from_seed_file(path)?
        }
        None => {
            info!("Starting with an empty in-memory catalog");
            MemoryBackend::new()
        }
    };

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Starts the server over Elasticsearch.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use codelist_persistence::backends::elasticsearch::ElasticsearchBackend;

    let es_config = config.elasticsearch_config();
    info!(
        nodes = ?es_config.nodes,
        index_prefix = %es_config.index_prefix,
        "Initializing Elasticsearch backend"
    );
    let backend = ElasticsearchBackend::new(es_config)?;

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p codelist-server --features elasticsearch, \
         or run with --backend memory"
    )
}
