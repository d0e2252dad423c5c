//! TaskWire realtime client - live collaboration over one WebSocket.
//!
//! This library maintains a single authenticated, auto-reconnecting
//! connection to a TaskWire collaboration server and multiplexes the
//! server's pushed events onto a local typed publish/subscribe registry,
//! so application code reacts to changes made by other users without
//! polling.
//!
//! # Architecture
//!
//! The client follows a supervisor model:
//!
//! - **Client (consumer side)**: registers listeners, sends room/presence
//!   signals, queries connection state
//! - **Session task (transport side)**: dials, authenticates, pumps frames,
//!   reconnects with backoff
//!
//! Key design principles:
//!
//! - One [`RealtimeClient`] owns at most one live session; a second
//!   `connect` replaces the session instead of layering onto it
//! - Events are a closed, typed catalog ([`EventKind`]) translated from
//!   `domain:action` wire names; unknown names are dropped, not errors
//! - Fan-out is synchronous and in registration order; a panicking
//!   listener is isolated from its siblings
//! - Outbound signals are fire-and-forget: no session means a silent
//!   no-op, never an error
//!
//! # Quick Start
//!
//! ```no_run
//! use taskwire::{ClientConfig, RealtimeClient, Result, StaticToken};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .server_url("wss://collab.taskwire.io/realtime")
//!         .credentials(StaticToken::new("eyJhbG..."))
//!         .build()?;
//!
//!     let client = RealtimeClient::new(config);
//!
//!     client.on_task_created(|payload| {
//!         println!("task created elsewhere: {payload}");
//!     });
//!
//!     client.connect();
//!     client.join_project("p1");
//!
//!     // ... run the application; disconnect when done
//!     client.disconnect();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client facade: [`RealtimeClient`], listener registry |
//! | [`config`] | Configuration, credential provider seam |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire frame types (internal) |
//! | [`transport`] | WebSocket session layer (internal) |
//!
//! # Delivery Semantics
//!
//! - At-most-once: events sent while disconnected are lost, not replayed
//! - Per-event-type, per-connection ordering only
//! - Room membership is server-authoritative and lost on reconnect;
//!   re-join from the lifecycle hook

// ============================================================================
// Modules
// ============================================================================

/// Consumer-facing client API.
///
/// This module contains the core types for realtime collaboration:
///
/// - [`RealtimeClient`] - connection lifecycle, subscriptions, rooms
/// - [`client::ListenerRegistry`] - ordered per-event fan-out
pub mod client;

/// Client configuration and credential provider seam.
///
/// Use [`ClientConfig::builder()`] to create a configured client.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for realtime entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Wire protocol frame types.
///
/// Internal module defining auth/signal/event frame structures.
pub mod protocol;

/// WebSocket session layer.
///
/// Internal module handling connection attempts and the reconnect loop.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::RealtimeClient;

// Configuration types
pub use config::{
    Anonymous, ClientConfig, ClientConfigBuilder, CredentialProvider, StaticToken, TransportKind,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ListenerId, ProjectId, SessionId, TaskId};

// Protocol types
pub use protocol::{EventKind, Lifecycle, PresenceStatus};
