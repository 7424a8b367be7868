use anyhow::Result;
use tracing::info;

use fleetsync::config::{load_config, FleetsyncConfig};
use fleetsync::display::TraceSink;
use fleetsync::session::TrackerSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetsync=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e))?,
        None => FleetsyncConfig::default(),
    };

    info!(base_url = %config.feed.base_url, "Fleetsync starting");

    let session = TrackerSession::from_config(&config, TraceSink::new())?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    session.stop();
    session.join().await;

    Ok(())
}
