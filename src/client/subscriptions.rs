//! Convenience subscription methods, one per event in the catalog.
//!
//! Pure sugar over [`RealtimeClient::on`]; each method is exactly
//! `on(EventKind::..., callback)` with the kind fixed.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::identifiers::ListenerId;
use crate::protocol::EventKind;

use super::core::RealtimeClient;

// ============================================================================
// RealtimeClient - Convenience Subscriptions
// ============================================================================

impl RealtimeClient {
    /// Subscribes to `taskCreated` events.
    #[inline]
    pub fn on_task_created<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TaskCreated, callback)
    }

    /// Subscribes to `taskUpdated` events.
    #[inline]
    pub fn on_task_updated<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TaskUpdated, callback)
    }

    /// Subscribes to `taskDeleted` events.
    #[inline]
    pub fn on_task_deleted<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TaskDeleted, callback)
    }

    /// Subscribes to `taskAssigned` events.
    #[inline]
    pub fn on_task_assigned<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TaskAssigned, callback)
    }

    /// Subscribes to `projectCreated` events.
    #[inline]
    pub fn on_project_created<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::ProjectCreated, callback)
    }

    /// Subscribes to `projectUpdated` events.
    #[inline]
    pub fn on_project_updated<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::ProjectUpdated, callback)
    }

    /// Subscribes to `projectDeleted` events.
    #[inline]
    pub fn on_project_deleted<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::ProjectDeleted, callback)
    }

    /// Subscribes to `teamMemberAdded` events.
    #[inline]
    pub fn on_team_member_added<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TeamMemberAdded, callback)
    }

    /// Subscribes to `teamMemberRemoved` events.
    #[inline]
    pub fn on_team_member_removed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::TeamMemberRemoved, callback)
    }

    /// Subscribes to `commentAdded` events.
    #[inline]
    pub fn on_comment_added<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::CommentAdded, callback)
    }

    /// Subscribes to `commentUpdated` events.
    #[inline]
    pub fn on_comment_updated<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::CommentUpdated, callback)
    }

    /// Subscribes to `commentDeleted` events.
    #[inline]
    pub fn on_comment_deleted<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::CommentDeleted, callback)
    }

    /// Subscribes to `newNotification` events.
    #[inline]
    pub fn on_new_notification<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::NewNotification, callback)
    }

    /// Subscribes to `userOnline` events.
    #[inline]
    pub fn on_user_online<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::UserOnline, callback)
    }

    /// Subscribes to `userOffline` events.
    #[inline]
    pub fn on_user_offline<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::UserOffline, callback)
    }

    /// Subscribes to `userTyping` events.
    #[inline]
    pub fn on_user_typing<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on(EventKind::UserTyping, callback)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ClientConfig;

    fn offline_client() -> RealtimeClient {
        let config = ClientConfig::builder()
            .server_url("ws://127.0.0.1:9")
            .build()
            .expect("config");
        RealtimeClient::new(config)
    }

    #[test]
    fn test_each_method_registers_its_event() {
        let client = offline_client();

        // `off` only succeeds when the id sits under that exact event, so a
        // hit proves each method targeted the right catalog entry.
        let cases: Vec<(ListenerId, EventKind)> = vec![
            (client.on_task_created(|_| {}), EventKind::TaskCreated),
            (client.on_task_updated(|_| {}), EventKind::TaskUpdated),
            (client.on_task_deleted(|_| {}), EventKind::TaskDeleted),
            (client.on_task_assigned(|_| {}), EventKind::TaskAssigned),
            (client.on_project_created(|_| {}), EventKind::ProjectCreated),
            (client.on_project_updated(|_| {}), EventKind::ProjectUpdated),
            (client.on_project_deleted(|_| {}), EventKind::ProjectDeleted),
            (client.on_team_member_added(|_| {}), EventKind::TeamMemberAdded),
            (
                client.on_team_member_removed(|_| {}),
                EventKind::TeamMemberRemoved,
            ),
            (client.on_comment_added(|_| {}), EventKind::CommentAdded),
            (client.on_comment_updated(|_| {}), EventKind::CommentUpdated),
            (client.on_comment_deleted(|_| {}), EventKind::CommentDeleted),
            (client.on_new_notification(|_| {}), EventKind::NewNotification),
            (client.on_user_online(|_| {}), EventKind::UserOnline),
            (client.on_user_offline(|_| {}), EventKind::UserOffline),
            (client.on_user_typing(|_| {}), EventKind::UserTyping),
        ];

        assert_eq!(cases.len(), EventKind::ALL.len());
        for (id, kind) in cases {
            assert!(client.off(kind, id), "listener missing under {kind:?}");
        }
    }
}
