//! Custlysis: customer analytics for retail banking.
//!
//! Main entry point that loads configuration, builds the record store and
//! model bridge, and starts the server.

use custlysis_api::{ApiServer, AppState};
use custlysis_core::config::AppConfig;
use custlysis_ml_bridge::ModelBridge;
use custlysis_store::DataStore;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "custlysis")]
#[command(about = "Customer segmentation and recommendation analytics for retail banking")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CUSTLYSIS__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CUSTLYSIS__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// JSON seed file loaded into the store at startup
    #[arg(long, env = "CUSTLYSIS__STORE__SEED_PATH")]
    seed: Option<String>,

    /// Interpreter used to run the segmentation model
    #[arg(long, env = "CUSTLYSIS__ML__PROGRAM")]
    ml_program: Option<String>,

    /// Segmentation model script
    #[arg(long, env = "CUSTLYSIS__ML__SCRIPT")]
    ml_script: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "custlysis=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Custlysis starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(seed) = cli.seed {
        config.store.seed_path = Some(seed);
    }
    if let Some(program) = cli.ml_program {
        config.ml.program = program;
    }
    if let Some(script) = cli.ml_script {
        config.ml.script = script;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        ml_program = %config.ml.program,
        ml_script = %config.ml.script,
        "Configuration loaded"
    );

    let store = match &config.store.seed_path {
        Some(path) => DataStore::from_seed_file(path)?,
        None => DataStore::new(),
    };

    let bridge = ModelBridge::new(&config.ml);
    let state = AppState::new(Arc::new(store), Arc::new(bridge), config.node_id.clone());
    let api_server = ApiServer::new(config, state);

    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Custlysis is ready to serve traffic");

    // Blocks until shutdown.
    api_server.start_http().await?;

    Ok(())
}
