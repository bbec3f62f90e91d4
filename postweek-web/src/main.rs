//! postweek-web - "Did the author publish this ISO week?" service
//!
//! Fetches publication dates from the configured remote source, derives
//! per-ISO-week publish states for the tracked years, and serves the
//! result as JSON plus a small front end.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use postweek_common::config::Config;
use postweek_common::{source, DataService};
use postweek_web::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "postweek-web", version, about = "Weekly publication heat-map service")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured HTTP port
    #[arg(long, env = "POSTWEEK_PORT")]
    port: Option<u16>,

    /// Override the configured bind address
    #[arg(long, env = "POSTWEEK_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    // Initialize tracing subscriber; RUST_LOG still wins over the file
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting postweek-web v{}", env!("CARGO_PKG_VERSION"));
    info!(
        tracked_years = ?config.tracked_years,
        source = ?config.source.kind,
        "configuration loaded"
    );
    if config.api_key.is_none() {
        info!("POSTWEEK_API_KEY not set, clear-cache endpoint disabled");
    }

    let date_source = source::from_config(&config.source)?;
    let service = Arc::new(DataService::new(date_source, config.tracked_years.clone()));
    let state = AppState::new(service, config.api_key.clone(), config.cache_max_age_secs);
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("postweek-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
