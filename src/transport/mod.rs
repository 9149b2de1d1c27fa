//! WebSocket transport layer.
//!
//! This module handles the wire connection between the subscriber (Rust)
//! and the gateway's change-feed endpoint.
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │ Subscriber      │                              │  Sync Gateway   │
//! │                 │         WebSocket            │                 │
//! │  Connection     │◄────────────────────────────►│  _changes?feed= │
//! │  → read/write   │                              │  websocket      │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::dial` - Dial the change-feed URL, upgrade to WebSocket
//! 2. `Connection::split` - Hand the read half to the pump, the write half
//!    to the control loop
//! 3. `WriteHalf::send_close` - Initiate the close handshake on shutdown

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket dial and split read/write halves.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, FeedMessage, ReadHalf, WriteHalf};
