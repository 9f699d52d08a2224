//! GhostQuery server binary.

use anyhow::Result;
use ghostquery::config::Config;
use ghostquery::server::SearchServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(bind = %config.bind, backend = ?config.generative_backend, "starting GhostQuery");

    let server = SearchServer::start(config).await?;
    tracing::info!(port = server.port(), "serving");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.shutdown();
    Ok(())
}
