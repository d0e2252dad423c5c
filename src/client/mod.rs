//! Consumer-facing client API.
//!
//! This module contains the realtime client facade and the listener
//! registry behind it:
//!
//! - [`RealtimeClient`] - connection lifecycle, subscriptions, rooms
//! - [`ListenerRegistry`] - ordered per-event fan-out table
//!
//! The facade is split by concern: subscription sugar lives in
//! `subscriptions`, room/presence signaling in `rooms`.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Client facade and session ownership |
//! | `registry` | Listener table and synchronous fan-out |
//! | `subscriptions` | Per-event convenience subscription methods |
//! | `rooms` | Room membership and presence signaling |

// ============================================================================
// Submodules
// ============================================================================

/// Client facade and session ownership.
pub mod core;

/// Listener table and synchronous fan-out.
pub mod registry;

/// Room membership and presence signaling.
pub mod rooms;

/// Per-event convenience subscription methods.
pub mod subscriptions;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::RealtimeClient;
pub use registry::{ListenerFn, ListenerRegistry};
