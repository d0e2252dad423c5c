//! Client configuration and credential provider seam.
//!
//! Provides a type-safe builder for configuring a
//! [`RealtimeClient`](crate::RealtimeClient): server address, transport
//! preference, handshake deadline, and reconnect backoff bounds.
//!
//! # Example
//!
//! ```ignore
//! use taskwire::{ClientConfig, StaticToken};
//!
//! let config = ClientConfig::builder()
//!     .server_url("wss://collab.taskwire.io/realtime")
//!     .credentials(StaticToken::new("eyJhbG..."))
//!     .build()?;
//! ```
//!
//! The server address can also come from the environment
//! (`TASKWIRE_SERVER_URL`) via [`ClientConfig::from_env`].

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the server URL.
pub const SERVER_URL_ENV: &str = "TASKWIRE_SERVER_URL";

/// Default server URL when none is configured.
const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:5000/realtime";

/// Default deadline for the ready frame after dialing.
const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default initial reconnect backoff delay.
const DEFAULT_RECONNECT_INITIAL: Duration = Duration::from_millis(500);

/// Default reconnect backoff ceiling.
const DEFAULT_RECONNECT_MAX: Duration = Duration::from_secs(30);

// ============================================================================
// TransportKind
// ============================================================================

/// Transport mechanisms the client can request, in preference order.
///
/// The preference list is carried in the auth frame so the connection can
/// fail over between mechanisms server-side without the consumer seeing a
/// different API. The default is `[WebSocket, Polling]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Persistent WebSocket connection (preferred).
    WebSocket,
    /// HTTP long-polling fallback.
    Polling,
}

// ============================================================================
// CredentialProvider
// ============================================================================

/// External source of the bearer token used in the auth handshake.
///
/// The client reads the token once per [`connect`](crate::RealtimeClient::connect)
/// call and never stores, validates, or refreshes it; storage policy belongs
/// to the application. Returning `None` sends a `null` token and leaves
/// rejection to the server.
pub trait CredentialProvider: Send + Sync {
    /// Returns the current bearer token, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// Credential provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a provider that always returns `token`.
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Credential provider with no token; the handshake carries `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Configuration for a [`RealtimeClient`](crate::RealtimeClient).
///
/// Construct through [`ClientConfig::builder`] or [`ClientConfig::from_env`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Server WebSocket address (`ws` or `wss`).
    pub server_url: Url,

    /// Transport mechanisms in preference order; sent in the auth frame.
    pub transports: Vec<TransportKind>,

    /// Deadline for the ready frame after dialing.
    pub handshake_timeout: Duration,

    /// Initial reconnect backoff delay. Doubles per failed attempt.
    pub reconnect_initial: Duration,

    /// Reconnect backoff ceiling.
    pub reconnect_max: Duration,

    /// Bearer token source, read once per connect.
    pub credentials: Arc<dyn CredentialProvider>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url.as_str())
            .field("transports", &self.transports)
            .field("handshake_timeout", &self.handshake_timeout)
            .field("reconnect_initial", &self.reconnect_initial)
            .field("reconnect_max", &self.reconnect_max)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Builds a configuration from the environment.
    ///
    /// Reads the server URL from [`SERVER_URL_ENV`], falling back to the
    /// local development default. Credentials stay [`Anonymous`]; install a
    /// provider with the builder when the application has one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServerUrl`] if the environment value is not a
    /// valid `ws`/`wss` URL.
    pub fn from_env() -> Result<Self> {
        let url = env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::builder().server_url(url).build()
    }
}

// ============================================================================
// ClientConfigBuilder
// ============================================================================

/// Builder for [`ClientConfig`].
///
/// Use [`ClientConfig::builder()`] to create one.
pub struct ClientConfigBuilder {
    server_url: Option<String>,
    transports: Vec<TransportKind>,
    handshake_timeout: Duration,
    reconnect_initial: Duration,
    reconnect_max: Duration,
    credentials: Arc<dyn CredentialProvider>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            server_url: None,
            transports: vec![TransportKind::WebSocket, TransportKind::Polling],
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            reconnect_initial: DEFAULT_RECONNECT_INITIAL,
            reconnect_max: DEFAULT_RECONNECT_MAX,
            credentials: Arc::new(Anonymous),
        }
    }

    /// Sets the server WebSocket address.
    #[inline]
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Sets the transport preference list.
    #[inline]
    #[must_use]
    pub fn transports(mut self, transports: Vec<TransportKind>) -> Self {
        self.transports = transports;
        self
    }

    /// Sets the handshake deadline.
    #[inline]
    #[must_use]
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Sets the reconnect backoff bounds.
    #[inline]
    #[must_use]
    pub fn reconnect_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_initial = initial;
        self.reconnect_max = max;
        self
    }

    /// Sets the credential provider.
    #[inline]
    #[must_use]
    pub fn credentials(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.credentials = Arc::new(provider);
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no server URL is set or the transport list is
    ///   empty
    /// - [`Error::InvalidServerUrl`] if the URL does not parse or is not
    ///   `ws`/`wss`
    pub fn build(self) -> Result<ClientConfig> {
        let raw = self
            .server_url
            .ok_or_else(|| Error::config("server URL not set"))?;

        let server_url =
            Url::parse(&raw).map_err(|e| Error::invalid_server_url(&raw, e.to_string()))?;

        match server_url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::invalid_server_url(
                    &raw,
                    format!("scheme must be ws or wss, got {other:?}"),
                ));
            }
        }

        if self.transports.is_empty() {
            return Err(Error::config("transport preference list is empty"));
        }

        Ok(ClientConfig {
            server_url,
            transports: self.transports,
            handshake_timeout: self.handshake_timeout,
            reconnect_initial: self.reconnect_initial,
            reconnect_max: self.reconnect_max,
            credentials: self.credentials,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .server_url("ws://127.0.0.1:5000/realtime")
            .build()
            .expect("build should succeed");

        assert_eq!(
            config.transports,
            vec![TransportKind::WebSocket, TransportKind::Polling]
        );
        assert_eq!(config.handshake_timeout, DEFAULT_HANDSHAKE_TIMEOUT);
        assert_eq!(config.reconnect_initial, DEFAULT_RECONNECT_INITIAL);
        assert_eq!(config.reconnect_max, DEFAULT_RECONNECT_MAX);
        assert!(config.credentials.bearer_token().is_none());
    }

    #[test]
    fn test_missing_server_url() {
        let result = ClientConfig::builder().build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_http_scheme() {
        let result = ClientConfig::builder()
            .server_url("http://127.0.0.1:5000")
            .build();
        assert!(matches!(result, Err(Error::InvalidServerUrl { .. })));
    }

    #[test]
    fn test_rejects_unparsable_url() {
        let result = ClientConfig::builder().server_url("not a url").build();
        assert!(matches!(result, Err(Error::InvalidServerUrl { .. })));
    }

    #[test]
    fn test_rejects_empty_transports() {
        let result = ClientConfig::builder()
            .server_url("ws://127.0.0.1:5000")
            .transports(vec![])
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_static_token_provider() {
        let provider = StaticToken::new("tok-1");
        assert_eq!(provider.bearer_token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_wss_accepted() {
        let config = ClientConfig::builder()
            .server_url("wss://collab.taskwire.io/realtime")
            .credentials(StaticToken::new("t"))
            .build()
            .expect("build should succeed");

        assert_eq!(config.server_url.scheme(), "wss");
        assert_eq!(config.credentials.bearer_token().as_deref(), Some("t"));
    }
}
