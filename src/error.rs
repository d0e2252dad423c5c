//! Error types for the TaskWire realtime client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use taskwire::{ClientConfig, Result};
//!
//! fn example() -> Result<ClientConfig> {
//!     ClientConfig::builder()
//!         .server_url("ws://127.0.0.1:5000/realtime")
//!         .build()
//! }
//! ```
//!
//! Connectivity problems are never surfaced synchronously from
//! [`connect`](crate::RealtimeClient::connect): the transport layer reports
//! them through [`Lifecycle`](crate::Lifecycle) notifications, carrying the
//! rendered error message.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidServerUrl`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::HandshakeTimeout`], [`Error::HandshakeRejected`] |
//! | Protocol | [`Error::Protocol`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Server URL is not a valid WebSocket address.
    ///
    /// Returned when the configured URL cannot be parsed or uses a scheme
    /// other than `ws`/`wss`.
    #[error("Invalid server URL {url:?}: {message}")]
    InvalidServerUrl {
        /// The offending URL string.
        url: String,
        /// Description of what is wrong with it.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the connection cannot be established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// WebSocket connection closed unexpectedly.
    ///
    /// Returned when the connection is lost during operation.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Handshake acknowledgement not received in time.
    ///
    /// Returned when the server does not send its ready frame within the
    /// configured handshake timeout.
    #[error("Handshake timeout after {timeout_ms}ms")]
    HandshakeTimeout {
        /// Milliseconds waited before timing out.
        timeout_ms: u64,
    },

    /// Server rejected the authentication handshake.
    ///
    /// Returned when the server answers the auth frame with an error frame.
    #[error("Handshake rejected: {message}")]
    HandshakeRejected {
        /// Server-supplied error code, if any.
        code: Option<String>,
        /// Server-supplied error message.
        message: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected frame.
    ///
    /// Returned when an inbound frame does not match the expected format.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid server URL error.
    #[inline]
    pub fn invalid_server_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidServerUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a handshake timeout error.
    #[inline]
    pub fn handshake_timeout(timeout_ms: u64) -> Self {
        Self::HandshakeTimeout { timeout_ms }
    }

    /// Creates a handshake rejected error.
    #[inline]
    pub fn handshake_rejected(code: Option<String>, message: impl Into<String>) -> Self {
        Self::HandshakeRejected {
            code,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::HandshakeTimeout { .. }
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is a handshake error.
    #[inline]
    #[must_use]
    pub fn is_handshake_error(&self) -> bool {
        matches!(
            self,
            Self::HandshakeTimeout { .. } | Self::HandshakeRejected { .. }
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on a later reconnect attempt; the
    /// session supervisor keeps retrying on them.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::HandshakeTimeout { .. }
                | Self::HandshakeRejected { .. }
                | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing server URL");
        assert_eq!(err.to_string(), "Configuration error: missing server URL");
    }

    #[test]
    fn test_invalid_server_url() {
        let err = Error::invalid_server_url("http://example.com", "scheme must be ws or wss");
        assert!(err.to_string().contains("http://example.com"));
        assert!(err.to_string().contains("scheme must be ws or wss"));
    }

    #[test]
    fn test_handshake_rejected_display() {
        let err = Error::handshake_rejected(Some("401".into()), "invalid token");
        assert_eq!(err.to_string(), "Handshake rejected: invalid token");
    }

    #[test]
    fn test_is_connection_error() {
        let conn_err = Error::connection("test");
        let timeout_err = Error::handshake_timeout(1000);
        let closed_err = Error::ConnectionClosed;
        let other_err = Error::config("test");

        assert!(conn_err.is_connection_error());
        assert!(timeout_err.is_connection_error());
        assert!(closed_err.is_connection_error());
        assert!(!other_err.is_connection_error());
    }

    #[test]
    fn test_is_handshake_error() {
        assert!(Error::handshake_timeout(1000).is_handshake_error());
        assert!(Error::handshake_rejected(None, "nope").is_handshake_error());
        assert!(!Error::ConnectionClosed.is_handshake_error());
    }

    #[test]
    fn test_is_recoverable() {
        let closed_err = Error::ConnectionClosed;
        let config_err = Error::config("test");

        assert!(closed_err.is_recoverable());
        assert!(!config_err.is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
