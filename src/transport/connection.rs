//! WebSocket dial and split read/write halves.
//!
//! The gateway's change feed is a plain WebSocket upgrade with no handshake
//! payload: once the connection is established the gateway pushes change
//! notifications on its own. The subscriber only writes keepalive pings and,
//! on shutdown, a single close frame.
//!
//! The connection splits into a [`ReadHalf`] (owned by the read pump) and a
//! [`WriteHalf`] (owned by the control loop). Only one write path is active
//! at a time: pings during steady state, the close frame during shutdown.

// ============================================================================
// Imports
// ============================================================================

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Bytes, Error as WsError, Message, Utf8Bytes};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// The underlying stream type after the WebSocket upgrade.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// FeedMessage
// ============================================================================

/// An incoming frame, reduced to what the read pump cares about.
///
/// Control frames the library answers on its own (ping/pong) are skipped
/// by [`ReadHalf::next_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    /// A change notification payload.
    Text(Utf8Bytes),

    /// A binary payload. The gateway normally sends text; binary frames are
    /// passed through untouched.
    Binary(Bytes),

    /// The peer sent a close frame or the stream ended.
    Closed,
}

// ============================================================================
// Connection
// ============================================================================

/// An established WebSocket connection to the change-feed endpoint.
///
/// Created by [`Connection::dial`], consumed by [`Connection::split`].
/// At most one connection exists per subscriber session.
pub struct Connection {
    stream: WsStream,
}

impl Connection {
    /// Dials the change-feed endpoint and performs the WebSocket upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the dial or upgrade fails.
    pub async fn dial(url: &Url) -> Result<Self> {
        let (stream, response) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::connection(format!("dial {url} failed: {e}")))?;

        debug!(%url, status = %response.status(), "WebSocket connection established");

        Ok(Self { stream })
    }

    /// Splits the connection into its read and write halves.
    #[must_use]
    pub fn split(self) -> (WriteHalf, ReadHalf) {
        let (sink, stream) = self.stream.split();
        (WriteHalf { sink }, ReadHalf { stream })
    }
}

// ============================================================================
// WriteHalf
// ============================================================================

/// The outbound half of the connection, owned by the control loop.
pub struct WriteHalf {
    sink: SplitSink<WsStream, Message>,
}

impl WriteHalf {
    /// Sends an empty keepalive ping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection is already
    /// closed, [`Error::WebSocket`] for any other send failure; ping
    /// failures are terminal for the session.
    pub async fn send_ping(&mut self) -> Result<()> {
        self.sink
            .send(Message::Ping(Bytes::new()))
            .await
            .map_err(map_send_error)
    }

    /// Sends a normal-closure close frame, initiating the close handshake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection is already
    /// closed, [`Error::WebSocket`] for any other send failure.
    pub async fn send_close(&mut self) -> Result<()> {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: Utf8Bytes::default(),
        };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(map_send_error)
    }
}

/// Maps a send failure, folding tungstenite's two already-closed shapes
/// into [`Error::ConnectionClosed`].
fn map_send_error(e: WsError) -> Error {
    match e {
        WsError::ConnectionClosed | WsError::AlreadyClosed => Error::ConnectionClosed,
        other => other.into(),
    }
}

// ============================================================================
// ReadHalf
// ============================================================================

/// The inbound half of the connection, owned by the read pump.
pub struct ReadHalf {
    stream: SplitStream<WsStream>,
}

impl ReadHalf {
    /// Receives the next feed message.
    ///
    /// Skips ping/pong control frames. Both a peer close frame and the end
    /// of the stream surface as [`FeedMessage::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`] on a read error; read errors are
    /// terminal for the session.
    pub async fn next_message(&mut self) -> Result<FeedMessage> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(FeedMessage::Text(text)),
                Some(Ok(Message::Binary(data))) => return Ok(FeedMessage::Binary(data)),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "close frame received");
                    return Ok(FeedMessage::Closed);
                }
                Some(Ok(_)) => {} // ping/pong, answered by the library
                Some(Err(e)) => return Err(e.into()),
                None => {
                    debug!("WebSocket stream ended");
                    return Ok(FeedMessage::Closed);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_send_error_closed_variants() {
        assert!(matches!(
            map_send_error(WsError::ConnectionClosed),
            Error::ConnectionClosed
        ));
        assert!(matches!(
            map_send_error(WsError::AlreadyClosed),
            Error::ConnectionClosed
        ));
    }

    #[test]
    fn test_map_send_error_passthrough() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(matches!(
            map_send_error(WsError::Io(io)),
            Error::WebSocket(_)
        ));
    }
}
