//! Gateway connection configuration.
//!
//! Provides a type-safe interface for configuring the change-feed
//! subscription: gateway base URL, keepalive cadence, and the close
//! handshake grace period.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use changefeed::GatewayConfig;
//!
//! let config = GatewayConfig::new("ws://localhost:4984/db/".parse()?)
//!     .with_ping_interval(Duration::from_secs(5));
//!
//! let url = config.changes_url();
//! // ws://localhost:4984/db/_changes?feed=websocket
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Environment variable naming the gateway base URL.
///
/// Example: `SYNC_GATEWAY_URL="ws://localhost:4984/db/"`
pub const GATEWAY_URL_ENV: &str = "SYNC_GATEWAY_URL";

/// Default interval between keepalive pings.
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(1);

/// Default grace period after sending a close frame.
const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(1);

// ============================================================================
// GatewayConfig
// ============================================================================

/// Configuration for a change-feed subscription.
///
/// The ping interval and close grace period default to one second each,
/// matching the gateway's expected keepalive cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway base URL, typically ending with the database path.
    pub base_url: Url,

    /// Interval between keepalive pings.
    pub ping_interval: Duration,

    /// How long to wait for the peer's close acknowledgement before
    /// tearing down unilaterally.
    pub close_grace: Duration,
}

// ============================================================================
// Constructors
// ============================================================================

impl GatewayConfig {
    /// Creates a configuration for the given gateway base URL.
    #[inline]
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ping_interval: DEFAULT_PING_INTERVAL,
            close_grace: DEFAULT_CLOSE_GRACE,
        }
    }

    /// Creates a configuration from the `SYNC_GATEWAY_URL` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the variable is unset or empty
    /// - [`Error::Config`] if the value is not a valid URL
    pub fn from_env() -> Result<Self> {
        let raw = env::var(GATEWAY_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config(format!("{GATEWAY_URL_ENV} is not set")))?;

        let base_url = Url::parse(&raw)
            .map_err(|e| Error::config(format!("invalid {GATEWAY_URL_ENV} `{raw}`: {e}")))?;

        Ok(Self::new(base_url))
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl GatewayConfig {
    /// Sets the keepalive ping interval.
    #[inline]
    #[must_use]
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Sets the close handshake grace period.
    #[inline]
    #[must_use]
    pub fn with_close_grace(mut self, grace: Duration) -> Self {
        self.close_grace = grace;
        self
    }
}

// ============================================================================
// URL Building
// ============================================================================

impl GatewayConfig {
    /// Returns the WebSocket change-feed endpoint URL.
    ///
    /// The gateway exposes the feed at `<base-url>_changes?feed=websocket`;
    /// `_changes` is appended to the base path as-is, so a base URL of
    /// `ws://host:4984/db/` yields `ws://host:4984/db/_changes`.
    #[must_use]
    pub fn changes_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}_changes", url.path());
        url.set_path(&path);
        url.set_query(Some("feed=websocket"));
        url
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    /// Serializes tests that mutate `SYNC_GATEWAY_URL`.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("valid test url")
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new(base("ws://localhost:4984/db/"));
        assert_eq!(config.ping_interval, Duration::from_secs(1));
        assert_eq!(config.close_grace, Duration::from_secs(1));
    }

    #[test]
    fn test_builder_overrides() {
        let config = GatewayConfig::new(base("ws://localhost:4984/db/"))
            .with_ping_interval(Duration::from_millis(50))
            .with_close_grace(Duration::from_millis(200));

        assert_eq!(config.ping_interval, Duration::from_millis(50));
        assert_eq!(config.close_grace, Duration::from_millis(200));
    }

    #[test]
    fn test_changes_url_trailing_slash() {
        let config = GatewayConfig::new(base("ws://localhost:4984/db/"));
        assert_eq!(
            config.changes_url().as_str(),
            "ws://localhost:4984/db/_changes?feed=websocket"
        );
    }

    #[test]
    fn test_changes_url_no_trailing_slash() {
        // The path convention is concatenation, same as the gateway docs show.
        let config = GatewayConfig::new(base("ws://localhost:4984/db"));
        assert_eq!(
            config.changes_url().as_str(),
            "ws://localhost:4984/db_changes?feed=websocket"
        );
    }

    #[test]
    fn test_from_env_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        let saved = env::var(GATEWAY_URL_ENV).ok();
        env::remove_var(GATEWAY_URL_ENV);

        let result = GatewayConfig::from_env();
        assert!(matches!(result, Err(Error::Config { .. })));

        if let Some(v) = saved {
            env::set_var(GATEWAY_URL_ENV, v);
        }
    }

    #[test]
    fn test_from_env_invalid_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        let saved = env::var(GATEWAY_URL_ENV).ok();
        env::set_var(GATEWAY_URL_ENV, "not a url");

        let result = GatewayConfig::from_env();
        assert!(matches!(result, Err(Error::Config { .. })));

        match saved {
            Some(v) => env::set_var(GATEWAY_URL_ENV, v),
            None => env::remove_var(GATEWAY_URL_ENV),
        }
    }
}
