use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use placefinder::config::FileConfig;
use placefinder::search::Finder;
use placefinder::web;

/// Search places by name and discover nearby points of interest on a map
///
/// Examples:
///   # Serve on the default 0.0.0.0:5000
///   placefinder
///
///   # Serve locally on another port with debug logging
///   placefinder --host 127.0.0.1 --port 8080 -v
///
///   # Use a config file
///   placefinder --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "placefinder")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches placefinder.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides HOST and the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match args.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };
    config.apply_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let finder = Finder::from_config(&config).context("Failed to create HTTP clients")?;
    let app = web::router(Arc::new(finder));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context(format!(
            "Invalid listen address: {}:{}",
            config.server.host, config.server.port
        ))?;

    info!(
        nominatim = %config.nominatim.url,
        overpass = %config.overpass.url,
        radius_m = config.overpass.radius_m,
        "upstream services configured"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;
    info!("placefinder listening on http://{}", addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
