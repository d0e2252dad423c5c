//! Room membership and presence signaling.
//!
//! Rooms are server-side broadcast scopes: joining a project or task room
//! opts this session into events scoped to it. The client holds no room
//! state of its own. Membership is a transient side effect of an outbound
//! signal, the server is the source of truth, and membership is lost on
//! reconnect. Consumers that care should re-join from their own state when
//! the lifecycle hook reports [`Lifecycle::Connected`](crate::Lifecycle::Connected).
//!
//! Every method here is best-effort and at-most-once: with no connected
//! session the signal is silently dropped, never queued or retried, so UI
//! code can call these defensively before connectivity is guaranteed.

// ============================================================================
// Imports
// ============================================================================

use crate::identifiers::{ProjectId, TaskId};
use crate::protocol::{PresenceStatus, Signal};

use super::core::RealtimeClient;

// ============================================================================
// RealtimeClient - Room Membership
// ============================================================================

impl RealtimeClient {
    /// Joins the room of a project (`join:project`).
    pub fn join_project(&self, project_id: impl Into<ProjectId>) {
        self.send_signal(Signal::JoinProject(project_id.into()));
    }

    /// Leaves the room of a project (`leave:project`).
    pub fn leave_project(&self, project_id: impl Into<ProjectId>) {
        self.send_signal(Signal::LeaveProject(project_id.into()));
    }

    /// Joins the room of a task (`join:task`).
    pub fn join_task(&self, task_id: impl Into<TaskId>) {
        self.send_signal(Signal::JoinTask(task_id.into()));
    }

    /// Leaves the room of a task (`leave:task`).
    pub fn leave_task(&self, task_id: impl Into<TaskId>) {
        self.send_signal(Signal::LeaveTask(task_id.into()));
    }
}

// ============================================================================
// RealtimeClient - Presence
// ============================================================================

impl RealtimeClient {
    /// Signals whether the current user is typing in a task (`typing`).
    pub fn set_typing(&self, task_id: impl Into<TaskId>, is_typing: bool) {
        self.send_signal(Signal::Typing {
            task_id: task_id.into(),
            is_typing,
        });
    }

    /// Signals the current user's presence status (`user:status`).
    pub fn set_status(&self, status: PresenceStatus) {
        self.send_signal(Signal::Status { status });
    }
}

// ============================================================================
// Tests
// ============================================================================
