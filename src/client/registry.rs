//! Listener registry and synchronous fan-out.
//!
//! Maps each [`EventKind`] to an ordered list of callbacks. Fan-out is
//! synchronous and in registration order; a panicking callback is isolated
//! so its siblings still run and the session stays alive.
//!
//! The registry outlives any one connection: it belongs to the client, and
//! every reconnected session dispatches into the same table.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{trace, warn};

use crate::identifiers::ListenerId;
use crate::protocol::EventKind;

// ============================================================================
// Types
// ============================================================================

/// Listener callback type.
///
/// Called synchronously on the connection's reader task with the event
/// payload, unmodified from the wire. Callbacks must be cheap and must not
/// block; hand heavy work to a channel or task.
pub type ListenerFn = dyn Fn(&Value) + Send + Sync;

/// One registration: a callback plus the handle that removes it.
struct ListenerEntry {
    id: ListenerId,
    callback: Arc<ListenerFn>,
}

// ============================================================================
// ListenerRegistry
// ============================================================================

/// Ordered per-event listener table.
///
/// # Semantics
///
/// - Registration order is invocation order.
/// - No de-duplication: the same closure registered twice fires twice.
/// - Removal is by [`ListenerId`]; removing an unknown id is a no-op.
/// - Callbacks may re-enter the registry (`on`/`off` mid-fan-out); changes
///   take effect from the next fan-out, never the current one.
pub struct ListenerRegistry {
    table: Mutex<FxHashMap<EventKind, Vec<ListenerEntry>>>,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(FxHashMap::default()),
        }
    }

    /// Appends `callback` to the listener list for `kind`.
    ///
    /// Returns the [`ListenerId`] that removes this registration.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = ListenerId::generate();
        let entry = ListenerEntry {
            id,
            callback: Arc::new(callback),
        };

        self.table.lock().entry(kind).or_default().push(entry);

        trace!(event = kind.name(), %id, "listener registered");
        id
    }

    /// Removes the registration identified by `id` from `kind`'s list.
    ///
    /// Returns `true` if a listener was removed; removing an id that was
    /// never registered (or already removed) is a no-op returning `false`.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut table = self.table.lock();

        let Some(entries) = table.get_mut(&kind) else {
            return false;
        };

        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return false;
        };

        entries.remove(index);
        if entries.is_empty() {
            table.remove(&kind);
        }

        trace!(event = kind.name(), %id, "listener removed");
        true
    }

    /// Invokes every listener registered for `kind`, in registration order.
    ///
    /// The listener list is snapshotted before invocation, so callbacks may
    /// safely call [`on`](Self::on)/[`off`](Self::off) without deadlocking;
    /// such changes apply from the next fan-out. A panicking callback is
    /// caught and logged, and remaining callbacks still run.
    pub fn emit(&self, kind: EventKind, payload: &Value) {
        let snapshot: Vec<Arc<ListenerFn>> = {
            let table = self.table.lock();
            match table.get(&kind) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
                None => return,
            }
        };

        trace!(event = kind.name(), listeners = snapshot.len(), "fan-out");

        for callback in snapshot {
            if catch_unwind(AssertUnwindSafe(|| (*callback)(payload))).is_err() {
                warn!(event = kind.name(), "listener panicked during fan-out");
            }
        }
    }

    /// Returns the number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.table.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Returns the total number of registrations across all events.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.table.lock().values().map(Vec::len).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    #[test]
    fn test_fanout_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = Arc::clone(&order);
        registry.on(EventKind::TaskCreated, move |_| o1.lock().push(1));
        let o2 = Arc::clone(&order);
        registry.on(EventKind::TaskCreated, move |_| o2.lock().push(2));

        registry.emit(EventKind::TaskCreated, &json!({}));
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn test_off_removes_only_target() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&calls);
        let first = registry.on(EventKind::TaskUpdated, move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&calls);
        registry.on(EventKind::TaskUpdated, move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        });

        assert!(registry.off(EventKind::TaskUpdated, first));
        registry.emit(EventKind::TaskUpdated, &json!({}));

        // Only the second listener ran.
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_off_twice_is_noop() {
        let registry = ListenerRegistry::new();
        let id = registry.on(EventKind::CommentAdded, |_| {});

        assert!(registry.off(EventKind::CommentAdded, id));
        assert!(!registry.off(EventKind::CommentAdded, id));
        assert_eq!(registry.listener_count(EventKind::CommentAdded), 0);
    }

    #[test]
    fn test_off_wrong_event_is_noop() {
        let registry = ListenerRegistry::new();
        let id = registry.on(EventKind::UserOnline, |_| {});

        assert!(!registry.off(EventKind::UserOffline, id));
        assert_eq!(registry.listener_count(EventKind::UserOnline), 1);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let cb = {
            let calls = Arc::clone(&calls);
            move |_: &Value| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        };
        registry.on(EventKind::UserOnline, cb.clone());
        registry.on(EventKind::UserOnline, cb);

        registry.emit(EventKind::UserOnline, &json!({}));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        registry.on(EventKind::TaskDeleted, |_| panic!("listener bug"));
        let c = Arc::clone(&calls);
        registry.on(EventKind::TaskDeleted, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.emit(EventKind::TaskDeleted, &json!({}));
        registry.emit(EventKind::TaskDeleted, &json!({}));

        // The sibling ran on both fan-outs despite the panic.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_payload_passthrough() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(None));

        let s = Arc::clone(&seen);
        registry.on(EventKind::TaskCreated, move |payload| {
            *s.lock() = Some(payload.clone());
        });

        let payload = json!({ "id": "t1", "title": "X" });
        registry.emit(EventKind::TaskCreated, &payload);

        assert_eq!(seen.lock().as_ref(), Some(&payload));
    }

    #[test]
    fn test_emit_without_listeners() {
        let registry = ListenerRegistry::new();
        // Must not panic or allocate an entry.
        registry.emit(EventKind::NewNotification, &json!({}));
        assert_eq!(registry.total_listeners(), 0);
    }

    #[test]
    fn test_reentrant_registration_applies_next_fanout() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let reg = Arc::clone(&registry);
        let c = Arc::clone(&calls);
        registry.on(EventKind::UserTyping, move |_| {
            let c = Arc::clone(&c);
            reg.on(EventKind::UserTyping, move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            });
        });

        // First fan-out only runs the registering listener.
        registry.emit(EventKind::UserTyping, &json!({}));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Second fan-out includes the listener added mid-flight.
        registry.emit(EventKind::UserTyping, &json!({}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_count() {
        let registry = ListenerRegistry::new();
        registry.on(EventKind::ProjectCreated, |_| {});
        registry.on(EventKind::ProjectCreated, |_| {});
        registry.on(EventKind::ProjectDeleted, |_| {});

        assert_eq!(registry.listener_count(EventKind::ProjectCreated), 2);
        assert_eq!(registry.listener_count(EventKind::ProjectDeleted), 1);
        assert_eq!(registry.listener_count(EventKind::ProjectUpdated), 0);
        assert_eq!(registry.total_listeners(), 3);
    }
}
