//! Sync Gateway change-feed subscriber.
//!
//! This library provides a WebSocket client that subscribes to a Sync
//! Gateway change feed (`<base-url>_changes?feed=websocket`), keeps the
//! connection alive with periodic pings, and performs a graceful close
//! handshake on interrupt. A small companion HTTP service with fixed-response
//! routes lives in [`sample`].
//!
//! # Architecture
//!
//! One session owns one connection and runs two concurrent activities:
//!
//! - **Read pump**: drains incoming frames, delivers each payload to a
//!   [`ChangeSink`] in arrival order
//! - **Control loop**: drives keepalive pings on a fixed interval, watches
//!   for the interrupt, and sequences the close handshake
//!
//! All errors are terminal for the session: no retry, no reconnect. This is
//! a demonstration client, not a production subscriber.
//!
//! # Quick Start
//!
//! ```no_run
//! use changefeed::{GatewayConfig, LogSink, Subscriber, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Reads SYNC_GATEWAY_URL, e.g. "ws://localhost:4984/db/"
//!     let config = GatewayConfig::from_env()?;
//!
//!     let end = Subscriber::new(config)
//!         .run(LogSink, async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!
//!     println!("session ended: {end:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Gateway URL and timing configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`feed`] | Change notification types and delivery sinks |
//! | [`sample`] | Fixed-response HTTP sample service |
//! | [`subscriber`] | Connection lifecycle: read pump + control loop |
//! | [`transport`] | WebSocket dial and split read/write halves |

// ============================================================================
// Modules
// ============================================================================

/// Gateway URL and timing configuration.
///
/// Use [`GatewayConfig::from_env`] or [`GatewayConfig::new`] plus the
/// builder methods.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Change notification types and delivery sinks.
pub mod feed;

/// Fixed-response HTTP sample service.
pub mod sample;

/// Connection lifecycle: read pump + control loop.
pub mod subscriber;

/// WebSocket transport layer.
///
/// Internal module handling the dial and the split connection halves.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::{GatewayConfig, GATEWAY_URL_ENV};

// Error types
pub use error::{Error, Result};

// Feed types
pub use feed::{ChangeEvent, ChangeSink, ChannelSink, LogSink};

// Subscriber types
pub use subscriber::{SessionEnd, Subscriber};
