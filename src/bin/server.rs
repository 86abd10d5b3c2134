//! Search service binary.
//!
//! Loads the TOML config (first CLI argument, or `AGORA_CONFIG`, or
//! built-in defaults), wires the aggregation engine, and serves the HTTP
//! contract. All tracing output goes to stderr.

use std::path::PathBuf;

use agora::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("agora-server starting");

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AGORA_CONFIG").ok())
        .map(PathBuf::from);

    let config = ServiceConfig::load_or_default(config_path.as_deref())?;
    let aggregator = agora::build_aggregator(&config)?;

    agora::server::run(&config.server, aggregator).await.map_err(|e| {
        tracing::error!(error = %e, "agora-server exited with error");
        e
    })?;

    tracing::info!("agora-server shut down cleanly");
    Ok(())
}
