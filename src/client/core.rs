//! Realtime client facade.
//!
//! [`RealtimeClient`] is the consumer-facing entry point: it owns the
//! listener registry and at most one live session at a time, and exposes
//! the connection lifecycle, subscription, and room signaling APIs.
//!
//! # Example
//!
//! ```ignore
//! use taskwire::{ClientConfig, RealtimeClient, StaticToken};
//!
//! let config = ClientConfig::builder()
//!     .server_url("wss://collab.taskwire.io/realtime")
//!     .credentials(StaticToken::new(token))
//!     .build()?;
//!
//! let client = RealtimeClient::new(config);
//! client.on_task_created(|payload| println!("task created: {payload}"));
//! client.connect();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::identifiers::{ListenerId, SessionId};
use crate::protocol::{EventKind, Lifecycle, Signal};
use crate::transport::session::{Session, SessionShared};

use super::registry::ListenerRegistry;

// ============================================================================
// RealtimeClient
// ============================================================================

/// Client for the realtime collaboration channel.
///
/// An explicitly owned service instance: construct one per process (or per
/// account) and pass it by reference to whatever needs it. The type itself
/// enforces the "at most one live session" invariant: a second
/// [`connect`](Self::connect) replaces the previous session rather than
/// layering onto it.
///
/// # Semantics
///
/// - `connect` is fire-and-forget: it returns before connectivity is
///   confirmed, and all connection problems surface through
///   [`Lifecycle`] notifications, never as return values.
/// - Listeners are registered against the fixed [`EventKind`] catalog and
///   survive reconnects; room membership does not and must be re-joined by
///   the consumer on every [`Lifecycle::Connected`].
/// - All signaling methods are silent no-ops without a connected session,
///   so UI code can call them defensively at any time.
pub struct RealtimeClient {
    /// Connection configuration, reused by every session of this client.
    config: ClientConfig,

    /// Listener table, shared with the session's frame pump.
    registry: Arc<ListenerRegistry>,

    /// State shared with the session task.
    shared: Arc<SessionShared>,

    /// The live session, if any.
    session: Mutex<Option<Session>>,
}

impl fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("server_url", &self.config.server_url.as_str())
            .field("connected", &self.is_connected())
            .field("listeners", &self.registry.total_listeners())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RealtimeClient - Construction
// ============================================================================

impl RealtimeClient {
    /// Creates a client from a configuration. No connection is opened until
    /// [`connect`](Self::connect).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        let shared = Arc::new(SessionShared::new(Arc::clone(&registry)));

        Self {
            config,
            registry,
            shared,
            session: Mutex::new(None),
        }
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServerUrl`](crate::Error::InvalidServerUrl)
    /// if the environment URL is invalid.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

// ============================================================================
// RealtimeClient - Connection Lifecycle
// ============================================================================

impl RealtimeClient {
    /// Opens the session.
    ///
    /// Reads the bearer token once from the credential provider, then
    /// spawns the session supervisor and returns immediately; connectivity
    /// is confirmed later via [`Lifecycle::Connected`]. Reconnection after
    /// a drop is automatic (with backoff) until [`disconnect`](Self::disconnect).
    ///
    /// If a session already exists it is torn down first, taking its frame
    /// pump and any wire handling with it; listeners registered on this
    /// client carry over to the new session.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(&self) {
        let mut guard = self.session.lock();

        if let Some(previous) = guard.take() {
            debug!("existing session superseded by connect");
            previous.abort();
            self.shared.reset();
        }

        let token = self.config.credentials.bearer_token();
        let session = Session::spawn(self.config.clone(), token, Arc::clone(&self.shared));
        *guard = Some(session);
    }

    /// Closes the session.
    ///
    /// The socket is closed gracefully and reconnection stops. No-op
    /// without a session; never fails.
    pub fn disconnect(&self) {
        let Some(session) = self.session.lock().take() else {
            trace!("disconnect without session, ignored");
            return;
        };

        session.shutdown();
        self.shared.reset();
    }

    /// Returns `true` while the session is connected and authenticated.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Returns the server-issued connection identifier, if connected.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.shared.session_id()
    }

    /// Installs a lifecycle hook, replacing any previous one.
    ///
    /// The hook fires on the session task for connected, disconnected, and
    /// connect-error transitions. Observability only: the client keeps
    /// reconnecting regardless of what the hook does.
    pub fn set_lifecycle_hook<F>(&self, hook: F)
    where
        F: Fn(&Lifecycle) + Send + Sync + 'static,
    {
        self.shared.set_hook(Some(Arc::new(hook)));
    }

    /// Removes the lifecycle hook.
    pub fn clear_lifecycle_hook(&self) {
        self.shared.set_hook(None);
    }
}

// ============================================================================
// RealtimeClient - Subscription
// ============================================================================

impl RealtimeClient {
    /// Registers a listener for `kind`.
    ///
    /// Listeners run synchronously on the connection's reader task, in
    /// registration order, with the event payload passed through from the
    /// wire unmodified. The same closure may be registered more than once
    /// and will fire once per registration.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.registry.on(kind, callback)
    }

    /// Removes the listener registered under `id`.
    ///
    /// Returns `true` if a listener was removed. Removing an id twice (or
    /// one that was never registered) is a harmless no-op.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.registry.off(kind, id)
    }
}

// ============================================================================
// RealtimeClient - Internal
// ============================================================================

impl RealtimeClient {
    /// Forwards a signal if a connected session exists; drops it otherwise.
    pub(crate) fn send_signal(&self, signal: Signal) {
        if !self.shared.is_connected() {
            trace!(signal = signal.wire_name(), "no live session, signal dropped");
            return;
        }

        if let Some(session) = self.session.lock().as_ref() {
            session.send(signal);
        }
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        if let Some(session) = self.session.lock().take() {
            session.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
