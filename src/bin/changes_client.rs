//! Change-feed subscriber binary.
//!
//! Subscribes to the gateway named by `SYNC_GATEWAY_URL` and logs every
//! change until the feed ends or Ctrl-C is pressed.
//!
//! Usage:
//!   SYNC_GATEWAY_URL="ws://localhost:4984/db/" cargo run --bin changes-client

// ============================================================================
// Imports
// ============================================================================

use changefeed::{GatewayConfig, LogSink, Result, Subscriber};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        eprintln!("[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // A missing or invalid URL is fatal before any connection attempt.
    let config = GatewayConfig::from_env()?;

    let end = Subscriber::new(config)
        .run(LogSink, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!(?end, "session ended");
    Ok(())
}
