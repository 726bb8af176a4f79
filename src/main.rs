//! House price prediction API.
//!
//! This is the application entry point. It loads configuration, initializes
//! tracing, loads the model and scaler artifacts, sets up the Axum router and
//! starts the HTTP server. Startup stops before the listener is bound if either
//! artifact fails to load.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use house_price_api::config::{AppConfig, LogFormat, DEFAULT_BIND_ADDR, DEFAULT_LOG_FILTER};
use house_price_api::http::start_server;
use house_price_api::{create_router, AppState, Artifacts};

/// House price prediction API
#[derive(Parser, Debug)]
#[command(name = "house-price-api", version, about)]
struct Args {
    /// Path to configuration file (built-in defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "house_price_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Listen port, overriding http.port (default address: 0.0.0.0:5000)
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(log_filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(log_filter));
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    match &args.config {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
        None => tracing::info!(default_addr = DEFAULT_BIND_ADDR, "Using built-in configuration"),
    }

    // Fail fast: never bind the listener without both artifacts
    let artifacts = Artifacts::load(&config.artifacts)?;

    let state = AppState::new(artifacts);
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
