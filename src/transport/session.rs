//! Session supervisor: connection state machine and reconnect loop.
//!
//! One [`Session`] is spawned per [`connect`](crate::RealtimeClient::connect)
//! call and owns the connection lifecycle until `disconnect` (or a
//! superseding `connect`) tears it down.
//!
//! # State Machine
//!
//! ```text
//!             dial + handshake           connection lost
//! Disconnected ──────────────► Connected ───────────────► Disconnected
//!      ▲        (Connecting)       │                            │
//!      │                           │ shutdown                   │ backoff,
//!      └───────────────────────────┘                            │ then retry
//!                                                               ▼
//!                                                          Connecting
//! ```
//!
//! Every Disconnected → Connected transition arms a fresh frame pump over
//! the shared listener registry; a torn-down session detaches all of its
//! wire handling at once because the pump dies with the task. Fan-out can
//! therefore never duplicate across reconnects.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::client::ListenerRegistry;
use crate::config::ClientConfig;
use crate::identifiers::SessionId;
use crate::protocol::{Lifecycle, Signal};

use super::connection::{CloseReason, Connection};

// ============================================================================
// Types
// ============================================================================

/// Lifecycle hook callback type.
///
/// Invoked on the session task for every lifecycle transition. Must not
/// block; the frame pump waits on it.
pub type LifecycleFn = dyn Fn(&Lifecycle) + Send + Sync;

/// Commands from the client to the session task.
pub(crate) enum SessionCommand {
    /// Forward one outbound signal.
    Signal(Signal),
    /// Close the connection and stop reconnecting.
    Shutdown,
}

/// Connection state, readable by the client between transitions.
#[derive(Debug, Clone, Default)]
pub(crate) enum SessionState {
    /// No live connection and no attempt in flight.
    #[default]
    Disconnected,
    /// An attempt is in flight; not yet usable for signals.
    Connecting,
    /// Handshake complete; signals flow and events fan out.
    Connected {
        /// Server-issued connection identifier.
        sid: SessionId,
    },
}

// ============================================================================
// SessionShared
// ============================================================================

/// State shared between the client handle and the session task.
pub(crate) struct SessionShared {
    /// Current connection state.
    state: Mutex<SessionState>,
    /// Listener table; lives as long as the client, across reconnects.
    pub(crate) registry: Arc<ListenerRegistry>,
    /// Optional consumer lifecycle hook.
    hook: Mutex<Option<Arc<LifecycleFn>>>,
}

impl SessionShared {
    /// Creates shared state around the client's registry.
    pub(crate) fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self {
            state: Mutex::new(SessionState::Disconnected),
            registry,
            hook: Mutex::new(None),
        }
    }

    /// Returns `true` while the state is `Connected`.
    pub(crate) fn is_connected(&self) -> bool {
        matches!(*self.state.lock(), SessionState::Connected { .. })
    }

    /// Returns the connection identifier while connected.
    pub(crate) fn session_id(&self) -> Option<SessionId> {
        match &*self.state.lock() {
            SessionState::Connected { sid } => Some(sid.clone()),
            _ => None,
        }
    }

    /// Replaces the lifecycle hook.
    pub(crate) fn set_hook(&self, hook: Option<Arc<LifecycleFn>>) {
        *self.hook.lock() = hook;
    }

    /// Resets the state to `Disconnected` without notifying.
    ///
    /// Used when a session is torn down from the client side (superseding
    /// `connect`, drop) and the task cannot report for itself.
    pub(crate) fn reset(&self) {
        *self.state.lock() = SessionState::Disconnected;
    }

    /// Moves to `Connecting`.
    fn transition_connecting(&self) {
        *self.state.lock() = SessionState::Connecting;
    }

    /// Moves to `Connected` and fires the lifecycle notification.
    fn transition_connected(&self, sid: SessionId) {
        *self.state.lock() = SessionState::Connected { sid: sid.clone() };
        info!(%sid, "session connected");
        self.notify(&Lifecycle::Connected { sid });
    }

    /// Moves to `Disconnected` and fires the lifecycle notification.
    fn transition_disconnected(&self, reason: String) {
        *self.state.lock() = SessionState::Disconnected;
        info!(reason = %reason, "session disconnected");
        self.notify(&Lifecycle::Disconnected { reason });
    }

    /// Records a failed attempt and fires the lifecycle notification.
    fn attempt_failed(&self, message: String) {
        *self.state.lock() = SessionState::Disconnected;
        warn!(error = %message, "connection attempt failed");
        self.notify(&Lifecycle::ConnectError { message });
    }

    /// Invokes the lifecycle hook outside the hook lock.
    fn notify(&self, lifecycle: &Lifecycle) {
        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            (*hook)(lifecycle);
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Handle to one spawned session task.
pub(crate) struct Session {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    task: JoinHandle<()>,
}

impl Session {
    /// Spawns the supervisor for one session.
    ///
    /// The credential has already been read (once, by `connect`); the same
    /// token is re-presented on every reconnect attempt of this session.
    pub(crate) fn spawn(
        config: ClientConfig,
        token: Option<String>,
        shared: Arc<SessionShared>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_supervisor(config, token, shared, command_rx));

        Self { command_tx, task }
    }

    /// Forwards one outbound signal to the session task.
    ///
    /// Best-effort: returns `false` if the task is already gone.
    pub(crate) fn send(&self, signal: Signal) -> bool {
        self.command_tx.send(SessionCommand::Signal(signal)).is_ok()
    }

    /// Requests a graceful shutdown; the task closes the socket and exits.
    pub(crate) fn shutdown(&self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown);
    }

    /// Hard teardown: aborts the task and its connection outright.
    ///
    /// Used when a new `connect` supersedes this session; the dying task
    /// takes its socket and frame pump with it, so no stale handlers can
    /// fire afterwards.
    pub(crate) fn abort(&self) {
        self.task.abort();
    }
}

// ============================================================================
// Supervisor
// ============================================================================

/// Reconnect loop: dial, pump, back off, repeat until shutdown.
async fn run_supervisor(
    config: ClientConfig,
    token: Option<String>,
    shared: Arc<SessionShared>,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
) {
    let mut backoff = config.reconnect_initial;

    loop {
        shared.transition_connecting();
        debug!(url = %config.server_url, "connecting");

        let attempt = tokio::select! {
            result = Connection::establish(&config, token.clone()) => result,
            () = drain_until_shutdown(&mut command_rx) => {
                shared.reset();
                return;
            }
        };

        match attempt {
            Ok(connection) => {
                shared.transition_connected(connection.session_id().clone());
                backoff = config.reconnect_initial;

                match connection.run(&mut command_rx, &shared.registry).await {
                    CloseReason::Shutdown => {
                        shared.transition_disconnected("client disconnect".to_string());
                        return;
                    }
                    CloseReason::Lost(reason) => {
                        shared.transition_disconnected(reason);
                    }
                }
            }

            Err(e) => {
                shared.attempt_failed(e.to_string());
            }
        }

        debug!(delay_ms = backoff.as_millis() as u64, "reconnecting after backoff");
        tokio::select! {
            () = sleep(backoff) => {}
            () = drain_until_shutdown(&mut command_rx) => {
                shared.reset();
                return;
            }
        }
        backoff = next_backoff(backoff, config.reconnect_max);
    }
}

/// Consumes commands while no connection exists.
///
/// Signals arriving here have no session to ride on and are dropped
/// silently (best-effort, at-most-once). Resolves when a shutdown is
/// requested or the client handle is gone.
async fn drain_until_shutdown(command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>) {
    loop {
        match command_rx.recv().await {
            Some(SessionCommand::Signal(signal)) => {
                trace!(signal = signal.wire_name(), "no live session, signal dropped");
            }
            Some(SessionCommand::Shutdown) | None => return,
        }
    }
}

/// Doubles the backoff delay up to `max`.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap() {
        let max = Duration::from_secs(30);
        let mut delay = Duration::from_millis(500);

        delay = next_backoff(delay, max);
        assert_eq!(delay, Duration::from_secs(1));
        delay = next_backoff(delay, max);
        assert_eq!(delay, Duration::from_secs(2));

        for _ in 0..10 {
            delay = next_backoff(delay, max);
        }
        assert_eq!(delay, max);
    }

    #[test]
    fn test_state_defaults_disconnected() {
        let shared = SessionShared::new(Arc::new(ListenerRegistry::new()));
        assert!(!shared.is_connected());
        assert!(shared.session_id().is_none());
    }

    #[test]
    fn test_transitions_update_queries() {
        let shared = SessionShared::new(Arc::new(ListenerRegistry::new()));

        shared.transition_connecting();
        assert!(!shared.is_connected());
        assert!(shared.session_id().is_none());

        shared.transition_connected(SessionId::new("s-1"));
        assert!(shared.is_connected());
        assert_eq!(shared.session_id().map(|s| s.to_string()), Some("s-1".into()));

        shared.transition_disconnected("test".to_string());
        assert!(!shared.is_connected());
        assert!(shared.session_id().is_none());
    }

    #[test]
    fn test_hook_sees_transitions() {
        let shared = SessionShared::new(Arc::new(ListenerRegistry::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        shared.set_hook(Some(Arc::new(move |lifecycle: &Lifecycle| {
            let label = match lifecycle {
                Lifecycle::Connected { .. } => "connected",
                Lifecycle::Disconnected { .. } => "disconnected",
                Lifecycle::ConnectError { .. } => "connect-error",
            };
            s.lock().push(label);
        })));

        shared.attempt_failed("refused".to_string());
        shared.transition_connected(SessionId::new("s-1"));
        shared.transition_disconnected("bye".to_string());

        assert_eq!(*seen.lock(), vec!["connect-error", "connected", "disconnected"]);
    }

    #[test]
    fn test_hook_observes_connected_state() {
        // The state must already read Connected when the hook fires, so a
        // consumer can re-join rooms from inside it.
        let shared = Arc::new(SessionShared::new(Arc::new(ListenerRegistry::new())));
        let observed = Arc::new(Mutex::new(None));

        let sh = Arc::clone(&shared);
        let o = Arc::clone(&observed);
        shared.set_hook(Some(Arc::new(move |lifecycle: &Lifecycle| {
            if matches!(lifecycle, Lifecycle::Connected { .. }) {
                *o.lock() = Some(sh.is_connected());
            }
        })));

        shared.transition_connected(SessionId::new("s-2"));
        assert_eq!(*observed.lock(), Some(true));
    }
}
