//! FormSense server entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use formsense_api::{ApiServer, AppState, ServerConfig};
use formsense_pipeline::{CacheConfig, FormPipeline};
use formsense_protocols::store::{DetectionStore, MappingStore};
use formsense_provider_gemini::GeminiBackend;
use formsense_store::{
    MemoryDetectionStore, MemoryMappingStore, SqliteDetectionStore, SqliteMappingStore,
};

/// FormSense server.
#[derive(Parser)]
#[command(name = "formsense")]
#[command(about = "Form understanding and autofill backend for browser agents")]
#[command(version)]
struct Cli {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// SQLite database path; omitted means records live in memory only
    #[arg(long)]
    db: Option<PathBuf>,

    /// Completion model
    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Mapping cache TTL in seconds
    #[arg(long, default_value_t = 600)]
    cache_ttl: u64,

    /// Mapping cache capacity
    #[arg(long, default_value_t = 3000)]
    cache_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting FormSense v{}", env!("CARGO_PKG_VERSION"));

    let (store, detections): (Arc<dyn MappingStore>, Arc<dyn DetectionStore>) = match &cli.db {
        Some(path) => {
            info!("Store: sqlite at {}", path.display());
            let mappings = SqliteMappingStore::open(path).await?;
            let detections = SqliteDetectionStore::from_connection(mappings.connection());
            (Arc::new(mappings), Arc::new(detections))
        }
        None => {
            info!("Store: in-memory");
            (
                Arc::new(MemoryMappingStore::new()),
                Arc::new(MemoryDetectionStore::new()),
            )
        }
    };

    let backend = Arc::new(GeminiBackend::new(cli.api_key, &cli.model));
    info!("Completion backend: gemini ({})", cli.model);

    let cache_config = CacheConfig {
        ttl: Duration::from_secs(cli.cache_ttl),
        capacity: cli.cache_capacity,
    };
    let pipeline = Arc::new(FormPipeline::new(backend, store.clone(), cache_config));

    let state = AppState::new(pipeline, store, detections);
    let server = ApiServer::new(ServerConfig::new(cli.host, cli.port), state);
    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
