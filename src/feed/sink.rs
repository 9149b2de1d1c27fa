//! Delivery sinks for incoming payloads.
//!
//! The read pump hands every incoming payload to a [`ChangeSink`], in
//! arrival order, with no loss or duplication. Two stock implementations
//! are provided:
//!
//! - [`LogSink`] logs each payload, with structured fields when the payload
//!   parses as a change batch. This is what the `changes-client` binary uses.
//! - [`ChannelSink`] forwards payloads into an `mpsc` channel, for embedding
//!   the subscriber in a larger program (and for tests).

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::event::ChangeEvent;

// ============================================================================
// ChangeSink
// ============================================================================

/// Receives feed payloads from the read pump.
///
/// Delivery is sequential: the pump awaits each `deliver` before reading
/// the next frame, so implementations observe payloads in wire order.
#[async_trait]
pub trait ChangeSink: Send {
    /// Delivers one feed payload.
    async fn deliver(&mut self, payload: String);
}

// ============================================================================
// LogSink
// ============================================================================

/// Logs each payload via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ChangeSink for LogSink {
    async fn deliver(&mut self, payload: String) {
        match ChangeEvent::parse_batch(&payload) {
            Some(batch) => {
                for change in &batch {
                    info!(
                        seq = change.seq,
                        id = %change.id,
                        rev = change.rev().unwrap_or_default(),
                        deleted = change.deleted,
                        "change received"
                    );
                }
            }
            None => info!(%payload, "feed message received"),
        }
    }
}

// ============================================================================
// ChannelSink
// ============================================================================

/// Forwards each payload into an `mpsc` channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Creates a sink and the receiver it feeds.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ChangeSink for ChannelSink {
    async fn deliver(&mut self, payload: String) {
        if self.tx.send(payload).is_err() {
            warn!("change receiver dropped, payload discarded");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_preserves_order() {
        let (mut sink, mut rx) = ChannelSink::new();

        for i in 0..5 {
            sink.deliver(format!("payload-{i}")).await;
        }

        for i in 0..5 {
            assert_eq!(rx.recv().await.unwrap(), format!("payload-{i}"));
        }
    }

    #[tokio::test]
    async fn test_channel_sink_receiver_dropped() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);

        // Must not panic or error out.
        sink.deliver("payload".into()).await;
    }

    #[tokio::test]
    async fn test_log_sink_accepts_any_payload() {
        let mut sink = LogSink;
        sink.deliver(r#"[{"seq": 1, "id": "doc", "changes": []}]"#.into())
            .await;
        sink.deliver("not json".into()).await;
    }
}
