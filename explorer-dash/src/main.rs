//! explorer-dash - manufacturing quality dashboard service
//!
//! Fetches production and failure records from the upstream export and
//! serves the dashboard (cards, per-process reports, failure annotations,
//! issues, objectives) on localhost. Operator state persists as JSON
//! blobs under the root folder.

use anyhow::{Context, Result};
use clap::Parser;
use explorer_common::config::{ensure_root_folder, resolve_root_folder, DashConfig};
use explorer_dash::client::UpstreamClient;
use explorer_dash::store::Store;
use explorer_dash::{build_router, AppState, Dataset};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments for explorer-dash
#[derive(Parser, Debug)]
#[command(name = "explorer-dash")]
#[command(about = "Manufacturing quality dashboard service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "EXPLORER_PORT")]
    port: Option<u16>,

    /// Root folder for persisted dashboard state
    #[arg(short, long, env = "EXPLORER_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Path to a config.toml (defaults to the platform config file)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explorer_dash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Explorer Dashboard (explorer-dash) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DashConfig::load().context("loading config")?,
    };

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "EXPLORER_ROOT_FOLDER");
    ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let store = Store::open(&root_folder);
    let client = UpstreamClient::new(&config).context("building upstream client")?;

    // Initial fetch. A failed endpoint degrades to an empty dataset so the
    // dashboard still starts with whatever state is on disk.
    let (production, failures) =
        tokio::join!(client.fetch_production(), client.fetch_failures());
    let dataset = Dataset {
        production: production.unwrap_or_else(|e| {
            error!("Production fetch failed: {}", e);
            Vec::new()
        }),
        failures: failures.unwrap_or_else(|e| {
            error!("Failures fetch failed: {}", e);
            Vec::new()
        }),
    };
    info!(
        "Loaded {} production records, {} failure records",
        dataset.production.len(),
        dataset.failures.len()
    );

    let port = args.port.unwrap_or(config.port);
    let state = AppState::new(config, store, client, dataset);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("binding port {}", port))?;
    info!("explorer-dash listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
