//! Sample HTTP service binary.
//!
//! Serves the three fixed-response routes on `127.0.0.1:8080` (override
//! with `SAMPLE_ADDR`).
//!
//! Usage:
//!   cargo run --bin sample-server

// ============================================================================
// Imports
// ============================================================================

use changefeed::{sample, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

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
    let addr = std::env::var("SAMPLE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "sample server listening");

    axum::serve(listener, sample::router()).await?;
    Ok(())
}
