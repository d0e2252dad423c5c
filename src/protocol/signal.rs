//! Outbound signal and handshake frame types.
//!
//! Everything the client sends upstream is one of two frames: the auth
//! handshake (first frame on every connection) or a fire-and-forget signal.
//! Signals carry no correlation IDs and expect no acknowledgement.
//!
//! # Outbound Catalog
//!
//! | Wire event | Payload |
//! |------------|---------|
//! | `join:project` / `leave:project` | project id string |
//! | `join:task` / `leave:task` | task id string |
//! | `typing` | `{ "taskId": ..., "isTyping": ... }` |
//! | `user:status` | `{ "status": "online" \| "away" \| "busy" \| "offline" }` |

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::config::TransportKind;
use crate::identifiers::{ProjectId, TaskId};

// ============================================================================
// FrameType
// ============================================================================

/// Outbound frame discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameType {
    /// Authentication handshake frame.
    Auth,
    /// Fire-and-forget signal frame.
    Signal,
}

// ============================================================================
// AuthFrame
// ============================================================================

/// The authentication handshake, sent as the first frame on every
/// connection (including reconnects).
///
/// # Format
///
/// ```json
/// {
///   "type": "auth",
///   "auth": { "token": "eyJhbG..." },
///   "transports": ["websocket", "polling"]
/// }
/// ```
///
/// The token is read once from the credential provider per connect; a
/// missing token is sent as `null` and left for the server to reject.
#[derive(Debug, Clone, Serialize)]
pub struct AuthFrame {
    /// Frame discriminator (always `auth`).
    #[serde(rename = "type")]
    pub frame_type: FrameType,

    /// Credential payload.
    pub auth: AuthPayload,

    /// Transport mechanisms the client is willing to use, in preference
    /// order, so the server side can fail over between them.
    pub transports: Vec<TransportKind>,
}

impl AuthFrame {
    /// Creates an auth frame carrying the given bearer token.
    #[inline]
    #[must_use]
    pub fn new(token: Option<String>, transports: &[TransportKind]) -> Self {
        Self {
            frame_type: FrameType::Auth,
            auth: AuthPayload { token },
            transports: transports.to_vec(),
        }
    }
}

/// Credential payload nested under the `auth` key.
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    /// Opaque bearer token, or `null` when the provider has none.
    pub token: Option<String>,
}

// ============================================================================
// Signal
// ============================================================================

/// A one-way upstream signal.
///
/// Serialized with the wire event name under `event` and the argument under
/// `payload`. Best-effort, at-most-once: no queuing, retry, or reply.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum Signal {
    /// Join a project-scoped room.
    #[serde(rename = "join:project")]
    JoinProject(ProjectId),

    /// Leave a project-scoped room.
    #[serde(rename = "leave:project")]
    LeaveProject(ProjectId),

    /// Join a task-scoped room.
    #[serde(rename = "join:task")]
    JoinTask(TaskId),

    /// Leave a task-scoped room.
    #[serde(rename = "leave:task")]
    LeaveTask(TaskId),

    /// Typing indicator for a task.
    #[serde(rename = "typing")]
    Typing {
        /// Task being typed in.
        #[serde(rename = "taskId")]
        task_id: TaskId,
        /// Whether the user is currently typing.
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },

    /// Presence status change for the current user.
    #[serde(rename = "user:status")]
    Status {
        /// New presence status.
        status: PresenceStatus,
    },
}

impl Signal {
    /// Returns the wire event name for this signal.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::JoinProject(_) => "join:project",
            Self::LeaveProject(_) => "leave:project",
            Self::JoinTask(_) => "join:task",
            Self::LeaveTask(_) => "leave:task",
            Self::Typing { .. } => "typing",
            Self::Status { .. } => "user:status",
        }
    }
}

// ============================================================================
// SignalFrame
// ============================================================================

/// Envelope around a [`Signal`] for the wire.
///
/// # Format
///
/// ```json
/// { "type": "signal", "event": "join:project", "payload": "p1" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SignalFrame {
    /// Frame discriminator (always `signal`).
    #[serde(rename = "type")]
    pub frame_type: FrameType,

    /// The signal, flattened to `event` + `payload`.
    #[serde(flatten)]
    pub signal: Signal,
}

impl SignalFrame {
    /// Wraps a signal for sending.
    #[inline]
    #[must_use]
    pub fn new(signal: Signal) -> Self {
        Self {
            frame_type: FrameType::Signal,
            signal,
        }
    }
}

// ============================================================================
// PresenceStatus
// ============================================================================

/// Presence status values understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Actively connected and available.
    Online,
    /// Connected but idle.
    Away,
    /// Connected, do not disturb.
    Busy,
    /// Explicitly shown as offline.
    Offline,
}

// ============================================================================
// Tests
// ============================================================================
