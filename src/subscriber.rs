//! Change-feed subscription loop.
//!
//! This module owns the connection lifecycle: dial, read pump, keepalive,
//! and the close handshake.
//!
//! # Session Structure
//!
//! [`Subscriber::run`] drives two concurrent activities over one connection:
//!
//! - **Read pump** (spawned task): drains incoming frames and delivers each
//!   payload to the [`ChangeSink`] in arrival order. On a peer close, stream
//!   end, or read error it fires a one-shot completion marker and stops.
//! - **Control loop** (the `run` future itself): a `select!` over three
//!   event sources - the keepalive ticker, the completion marker, and the
//!   caller-supplied interrupt. On interrupt it sends a single close frame,
//!   then waits up to the configured grace period for the pump to observe
//!   the peer's close before exiting unilaterally.
//!
//! # Failure Semantics
//!
//! All errors are terminal for the session: ping failures are not retried,
//! read errors are not distinguished by kind, and there is no reconnect.
//! Only dial failures surface as `Err`; how an established session ended is
//! reported as [`SessionEnd`].

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Instant;

use tokio::sync::oneshot;
use tokio::time::{interval_at, timeout, Instant as TokioInstant};
use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::feed::ChangeSink;
use crate::transport::{Connection, FeedMessage, ReadHalf};

// ============================================================================
// SessionEnd
// ============================================================================

/// How an established session ended.
///
/// Every variant is a normal return of [`Subscriber::run`]; runtime I/O
/// failures are logged, not propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the feed (close frame or end of stream).
    FeedClosed,

    /// The read pump hit a read error.
    ReadError,

    /// The interrupt fired and the close handshake ran.
    Interrupted,

    /// A keepalive ping could not be sent.
    PingFailed,
}

// ============================================================================
// PumpEnd
// ============================================================================

/// Completion marker fired by the read pump, read once by the control loop.
enum PumpEnd {
    /// The feed closed cleanly.
    Closed,

    /// The pump stopped on a read error.
    Error,
}

// ============================================================================
// Subscriber
// ============================================================================

/// A change-feed subscriber.
///
/// Holds the configuration; each call to [`Subscriber::run`] owns exactly
/// one connection for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Subscriber {
    config: GatewayConfig,
}

impl Subscriber {
    /// Creates a subscriber for the given gateway.
    #[inline]
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Returns the subscriber's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs one subscription session.
    ///
    /// Dials the change-feed endpoint, then pumps messages into `sink`
    /// until the feed ends, an I/O error occurs, or `interrupt` resolves.
    /// For process use pass `tokio::signal::ctrl_c()` (mapped to `()`);
    /// tests can pass any future.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`] if the dial fails. Everything
    /// after a successful dial is reported via [`SessionEnd`].
    pub async fn run<S, F>(&self, sink: S, interrupt: F) -> Result<SessionEnd>
    where
        S: ChangeSink + 'static,
        F: Future<Output = ()>,
    {
        let url = self.config.changes_url();
        info!(%url, "subscribing to change feed");

        let connection = Connection::dial(&url).await?;
        let (mut write, read) = connection.split();

        let (done_tx, mut done_rx) = oneshot::channel();
        tokio::spawn(read_pump(read, sink, done_tx));

        // First tick after one full interval, matching the peer's expected
        // keepalive cadence.
        let mut ticker = interval_at(
            TokioInstant::now() + self.config.ping_interval,
            self.config.ping_interval,
        );

        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                end = &mut done_rx => {
                    // No close frame here: the connection is already gone.
                    return Ok(match end {
                        Ok(PumpEnd::Closed) => SessionEnd::FeedClosed,
                        Ok(PumpEnd::Error) | Err(_) => SessionEnd::ReadError,
                    });
                }

                _ = ticker.tick() => {
                    if let Err(e) = write.send_ping().await {
                        error!(error = %e, "keepalive ping failed");
                        return Ok(SessionEnd::PingFailed);
                    }
                    debug!("keepalive ping sent");
                }

                _ = &mut interrupt => {
                    info!("interrupt received, closing connection");

                    if let Err(e) = write.send_close().await {
                        error!(error = %e, "close frame send failed");
                        return Ok(SessionEnd::Interrupted);
                    }

                    // Give the pump one grace period to observe the peer's
                    // close acknowledgement, then exit either way.
                    let waited = Instant::now();
                    match timeout(self.config.close_grace, &mut done_rx).await {
                        Ok(_) => debug!(
                            elapsed_ms = waited.elapsed().as_millis() as u64,
                            "close handshake completed"
                        ),
                        Err(_) => warn!("close grace period elapsed, exiting unilaterally"),
                    }

                    return Ok(SessionEnd::Interrupted);
                }
            }
        }
    }
}

// ============================================================================
// Read Pump
// ============================================================================

/// Drains incoming frames and delivers payloads to the sink.
///
/// Fires `done` exactly once on exit. Delivery is sequential, so the sink
/// observes payloads in wire order with no loss or duplication.
async fn read_pump<S: ChangeSink>(
    mut read: ReadHalf,
    mut sink: S,
    done: oneshot::Sender<PumpEnd>,
) {
    let end = loop {
        match read.next_message().await {
            Ok(FeedMessage::Text(text)) => sink.deliver(text.as_str().to_owned()).await,
            Ok(FeedMessage::Binary(data)) => {
                sink.deliver(String::from_utf8_lossy(&data).into_owned()).await;
            }
            Ok(FeedMessage::Closed) => break PumpEnd::Closed,
            Err(e) => {
                error!(error = %e, "read error");
                break PumpEnd::Error;
            }
        }
    };

    debug!("read pump terminated");
    let _ = done.send(end);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use url::Url;

    #[test]
    fn test_subscriber_holds_config() {
        let config = GatewayConfig::new(Url::parse("ws://localhost:4984/db/").unwrap());
        let subscriber = Subscriber::new(config.clone());
        assert_eq!(subscriber.config(), &config);
    }

    #[tokio::test]
    async fn test_dial_failure_is_fatal() {
        // Port 1 is never listening locally.
        let config = GatewayConfig::new(Url::parse("ws://127.0.0.1:1/db/").unwrap());
        let subscriber = Subscriber::new(config);

        let result = subscriber
            .run(crate::feed::LogSink, std::future::pending())
            .await;

        assert!(matches!(result, Err(crate::Error::Connection { .. })));
    }
}
