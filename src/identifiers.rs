//! Type-safe identifiers for realtime entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//! a [`TaskId`] cannot be passed where a [`ProjectId`] is expected, and a
//! [`ListenerId`] from one registration cannot be confused with a room id.
//!
//! | Type | Backing | Origin |
//! |------|---------|--------|
//! | [`SessionId`] | `String` | Issued by the server in the ready frame |
//! | [`ListenerId`] | `u64` | Process-local counter, returned by `on` |
//! | [`ProjectId`] | `String` | Application-level project identifier |
//! | [`TaskId`] | `String` | Application-level task identifier |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// SessionId
// ============================================================================

/// Opaque connection identifier issued by the server.
///
/// Present only while a session is connected; a new one is issued on every
/// successful handshake, including reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session ID from a server-issued string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// ListenerId
// ============================================================================

/// Handle identifying one listener registration.
///
/// Returned by [`on`](crate::RealtimeClient::on); pass it to
/// [`off`](crate::RealtimeClient::off) to remove that registration without
/// disturbing other listeners on the same event. IDs are unique within the
/// process and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Generates a fresh, process-unique listener ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

// ============================================================================
// ProjectId
// ============================================================================

/// Identifier of a project-scoped room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a project ID.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProjectId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProjectId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// TaskId
// ============================================================================

/// Identifier of a task-scoped room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task ID.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
