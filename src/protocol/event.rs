//! Inbound event catalog and server frame types.
//!
//! Events are notifications pushed by the server when other collaborators
//! change shared state. On the wire they are named `domain:action`; locally
//! consumers subscribe by [`EventKind`], the closed camel-cased catalog.
//!
//! # Event Catalog
//!
//! | Domain | Wire events |
//! |--------|-------------|
//! | `task` | `created`, `updated`, `deleted`, `assigned` |
//! | `project` | `created`, `updated`, `deleted` |
//! | `team` | `member_added`, `member_removed` |
//! | `comment` | `added`, `updated`, `deleted` |
//! | `notification` | `new` |
//! | `user` | `online`, `offline`, `typing` |
//!
//! The mapping is total and injective over this set. Wire names outside the
//! catalog are dropped silently so newer servers can add events without
//! breaking older clients.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::SessionId;

// ============================================================================
// EventKind
// ============================================================================

/// Application-level event names, one per wire event.
///
/// Consumers register listeners against these variants; the frame pump
/// translates inbound wire names through [`EventKind::from_wire`] before
/// fan-out. The enum is exhaustive and fixed: servers may push more event
/// types than this catalog, but those are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A task was created (`task:created`).
    TaskCreated,
    /// A task was updated (`task:updated`).
    TaskUpdated,
    /// A task was deleted (`task:deleted`).
    TaskDeleted,
    /// A task was assigned to a user (`task:assigned`).
    TaskAssigned,
    /// A project was created (`project:created`).
    ProjectCreated,
    /// A project was updated (`project:updated`).
    ProjectUpdated,
    /// A project was deleted (`project:deleted`).
    ProjectDeleted,
    /// A member joined a team (`team:member_added`).
    TeamMemberAdded,
    /// A member left a team (`team:member_removed`).
    TeamMemberRemoved,
    /// A comment was added (`comment:added`).
    CommentAdded,
    /// A comment was updated (`comment:updated`).
    CommentUpdated,
    /// A comment was deleted (`comment:deleted`).
    CommentDeleted,
    /// A notification arrived for the current user (`notification:new`).
    NewNotification,
    /// A user came online (`user:online`).
    UserOnline,
    /// A user went offline (`user:offline`).
    UserOffline,
    /// A user started or stopped typing (`user:typing`).
    UserTyping,
}

impl EventKind {
    /// Every event kind, in catalog order.
    pub const ALL: [EventKind; 16] = [
        Self::TaskCreated,
        Self::TaskUpdated,
        Self::TaskDeleted,
        Self::TaskAssigned,
        Self::ProjectCreated,
        Self::ProjectUpdated,
        Self::ProjectDeleted,
        Self::TeamMemberAdded,
        Self::TeamMemberRemoved,
        Self::CommentAdded,
        Self::CommentUpdated,
        Self::CommentDeleted,
        Self::NewNotification,
        Self::UserOnline,
        Self::UserOffline,
        Self::UserTyping,
    ];

    /// Translates a wire event name into its application event.
    ///
    /// Returns `None` for names outside the catalog; callers drop those
    /// without error.
    #[must_use]
    pub fn from_wire(wire: &str) -> Option<Self> {
        match wire {
            "task:created" => Some(Self::TaskCreated),
            "task:updated" => Some(Self::TaskUpdated),
            "task:deleted" => Some(Self::TaskDeleted),
            "task:assigned" => Some(Self::TaskAssigned),
            "project:created" => Some(Self::ProjectCreated),
            "project:updated" => Some(Self::ProjectUpdated),
            "project:deleted" => Some(Self::ProjectDeleted),
            "team:member_added" => Some(Self::TeamMemberAdded),
            "team:member_removed" => Some(Self::TeamMemberRemoved),
            "comment:added" => Some(Self::CommentAdded),
            "comment:updated" => Some(Self::CommentUpdated),
            "comment:deleted" => Some(Self::CommentDeleted),
            "notification:new" => Some(Self::NewNotification),
            "user:online" => Some(Self::UserOnline),
            "user:offline" => Some(Self::UserOffline),
            "user:typing" => Some(Self::UserTyping),
            _ => None,
        }
    }

    /// Returns the wire name (`domain:action`) for this event.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::TaskCreated => "task:created",
            Self::TaskUpdated => "task:updated",
            Self::TaskDeleted => "task:deleted",
            Self::TaskAssigned => "task:assigned",
            Self::ProjectCreated => "project:created",
            Self::ProjectUpdated => "project:updated",
            Self::ProjectDeleted => "project:deleted",
            Self::TeamMemberAdded => "team:member_added",
            Self::TeamMemberRemoved => "team:member_removed",
            Self::CommentAdded => "comment:added",
            Self::CommentUpdated => "comment:updated",
            Self::CommentDeleted => "comment:deleted",
            Self::NewNotification => "notification:new",
            Self::UserOnline => "user:online",
            Self::UserOffline => "user:offline",
            Self::UserTyping => "user:typing",
        }
    }

    /// Returns the application name (camel-cased) for this event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TaskCreated => "taskCreated",
            Self::TaskUpdated => "taskUpdated",
            Self::TaskDeleted => "taskDeleted",
            Self::TaskAssigned => "taskAssigned",
            Self::ProjectCreated => "projectCreated",
            Self::ProjectUpdated => "projectUpdated",
            Self::ProjectDeleted => "projectDeleted",
            Self::TeamMemberAdded => "teamMemberAdded",
            Self::TeamMemberRemoved => "teamMemberRemoved",
            Self::CommentAdded => "commentAdded",
            Self::CommentUpdated => "commentUpdated",
            Self::CommentDeleted => "commentDeleted",
            Self::NewNotification => "newNotification",
            Self::UserOnline => "userOnline",
            Self::UserOffline => "userOffline",
            Self::UserTyping => "userTyping",
        }
    }

    /// Returns the domain prefix of the wire name.
    #[inline]
    #[must_use]
    pub fn domain(self) -> &'static str {
        self.wire_name()
            .split(':')
            .next()
            .unwrap_or_default()
    }
}

// ============================================================================
// ServerFrame
// ============================================================================

/// An inbound frame from the server, tagged by `"type"`.
///
/// # Format
///
/// ```json
/// { "type": "ready", "sid": "conn-8f2a" }
/// { "type": "event", "event": "task:created", "payload": { ... } }
/// { "type": "error", "code": "401", "message": "invalid token" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Handshake acknowledgement; the session counts as connected once this
    /// arrives.
    Ready {
        /// Server-issued connection identifier.
        sid: SessionId,
    },

    /// A pushed application event. The payload is forwarded to listeners
    /// unmodified; this layer neither validates nor transforms it.
    Event {
        /// Wire event name (`domain:action`).
        event: String,
        /// Opaque event payload.
        #[serde(default)]
        payload: Value,
    },

    /// Server-side handshake or session error.
    Error {
        /// Machine-readable error code, if the server sent one.
        #[serde(default)]
        code: Option<String>,
        /// Human-readable error message.
        #[serde(default)]
        message: Option<String>,
    },
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Connection lifecycle notifications.
///
/// Observability only: the client never retries or raises in response to
/// these on the caller's behalf. Delivered to the hook registered with
/// [`set_lifecycle_hook`](crate::RealtimeClient::set_lifecycle_hook), and
/// mirrored to `tracing`.
#[derive(Debug, Clone)]
pub enum Lifecycle {
    /// The transport completed its handshake; event dispatch is armed.
    Connected {
        /// Server-issued connection identifier.
        sid: SessionId,
    },

    /// The transport lost its connection. The supervisor will reconnect
    /// with backoff; room membership is not restored automatically.
    Disconnected {
        /// Close reason, as reported by the transport.
        reason: String,
    },

    /// A connection or handshake attempt failed.
    ConnectError {
        /// Rendered error message.
        message: String,
    },
}

// ============================================================================
// Tests
// ============================================================================
