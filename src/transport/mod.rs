//! WebSocket transport layer.
//!
//! This module owns the connection lifecycle between the client and the
//! collaboration server: dialing, the auth/ready handshake, the frame pump,
//! and reconnection with backoff.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                              ┌─────────────────┐
//! │ RealtimeClient   │   commands (mpsc)            │  Session task   │
//! │  (consumer API)  │─────────────────────────────►│  supervisor     │
//! │                  │   shared state (Mutex)       │   └► Connection │
//! │                  │◄─────────────────────────────│       WebSocket │
//! └──────────────────┘                              └─────────────────┘
//! ```
//!
//! # Session Lifecycle
//!
//! 1. `Session::spawn` - supervisor task created by `connect`
//! 2. `Connection::establish` - dial, auth frame, ready frame
//! 3. `Connection::run` - pump frames until lost or shut down
//! 4. On loss: lifecycle notification, backoff, retry from step 2
//! 5. On shutdown: close socket, stop; the task dies with its handlers
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | One socket: dial, handshake, frame pump |
//! | `session` | Supervisor: state machine, backoff, command channel |

// ============================================================================
// Submodules
// ============================================================================

/// Single WebSocket connection: dial, handshake, frame pump.
pub(crate) mod connection;

/// Session supervisor: connection state machine and reconnect loop.
pub(crate) mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use session::LifecycleFn;
