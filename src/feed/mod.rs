//! Change-feed payloads and delivery.
//!
//! The gateway pushes JSON batches of change notifications over the
//! WebSocket. This module provides the typed view of those batches and the
//! sink seam the read pump delivers into.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Typed change notifications and batch parsing |
//! | `sink` | The `ChangeSink` delivery trait and stock implementations |

// ============================================================================
// Submodules
// ============================================================================

/// Typed change notifications.
pub mod event;

/// Delivery sinks for incoming payloads.
pub mod sink;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{ChangeEvent, DocRevision};
pub use sink::{ChangeSink, ChannelSink, LogSink};
