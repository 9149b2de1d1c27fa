//! Typed change notifications.
//!
//! The gateway's WebSocket feed pushes JSON batches of change entries, one
//! entry per changed document:
//!
//! ```json
//! [
//!   {"seq": 1, "id": "doc-1", "changes": [{"rev": "1-abc"}]},
//!   {"seq": 2, "id": "doc-2", "changes": [{"rev": "2-def"}], "deleted": true}
//! ]
//! ```
//!
//! Some gateway versions wrap the batch in `{"results": [...]}`; both shapes
//! are accepted. Payloads that parse as neither are not an error - the feed
//! also carries frames the subscriber does not model, and those reach the
//! sink as raw text.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// ChangeEvent
// ============================================================================

/// A single document change from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeEvent {
    /// Sequence number assigned by the gateway.
    pub seq: u64,

    /// Document ID.
    pub id: String,

    /// Revisions introduced by this change (usually exactly one).
    #[serde(default)]
    pub changes: Vec<DocRevision>,

    /// Whether this change is a deletion.
    #[serde(default)]
    pub deleted: bool,
}

/// A revision reference inside a change entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocRevision {
    /// Revision ID, e.g. `1-abc`.
    pub rev: String,
}

// ============================================================================
// Batch Parsing
// ============================================================================

/// Wrapper shape used by some gateway versions.
#[derive(Deserialize)]
struct ResultsWrapper {
    results: Vec<ChangeEvent>,
}

impl ChangeEvent {
    /// Parses a feed payload into change entries.
    ///
    /// Accepts a bare JSON array or a `{"results": [...]}` wrapper.
    /// Returns `None` for payloads in neither shape.
    #[must_use]
    pub fn parse_batch(text: &str) -> Option<Vec<ChangeEvent>> {
        if let Ok(batch) = serde_json::from_str::<Vec<ChangeEvent>>(text) {
            return Some(batch);
        }
        if let Ok(wrapper) = serde_json::from_str::<ResultsWrapper>(text) {
            return Some(wrapper.results);
        }
        None
    }

    /// Returns the first revision of this change, if any.
    #[inline]
    #[must_use]
    pub fn rev(&self) -> Option<&str> {
        self.changes.first().map(|r| r.rev.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let batch = ChangeEvent::parse_batch(
            r#"[{"seq": 1, "id": "doc-1", "changes": [{"rev": "1-abc"}]}]"#,
        )
        .expect("bare array should parse");

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].seq, 1);
        assert_eq!(batch[0].id, "doc-1");
        assert_eq!(batch[0].rev(), Some("1-abc"));
        assert!(!batch[0].deleted);
    }

    #[test]
    fn test_parse_results_wrapper() {
        let batch = ChangeEvent::parse_batch(
            r#"{"results": [{"seq": 5, "id": "doc-5", "changes": [], "deleted": true}]}"#,
        )
        .expect("wrapper should parse");

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].seq, 5);
        assert!(batch[0].deleted);
        assert_eq!(batch[0].rev(), None);
    }

    #[test]
    fn test_parse_empty_batch() {
        let batch = ChangeEvent::parse_batch("[]").expect("empty array should parse");
        assert!(batch.is_empty());
    }

    #[test]
    fn test_unmodeled_payload() {
        assert!(ChangeEvent::parse_batch("not json").is_none());
        assert!(ChangeEvent::parse_batch(r#"{"last_seq": 7}"#).is_none());
    }
}
