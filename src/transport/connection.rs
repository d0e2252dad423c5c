//! Single WebSocket connection: dial, handshake, frame pump.
//!
//! A [`Connection`] covers exactly one underlying socket. The session
//! supervisor creates a fresh one per attempt, so every reconnect starts
//! from a clean handler set; nothing accumulates across connections.
//!
//! # Connection Flow
//!
//! 1. Dial the configured `ws`/`wss` URL
//! 2. Send the auth frame (token + transport preference)
//! 3. Await the server's ready frame under the handshake deadline
//! 4. Pump frames: inbound events fan out through the shared registry,
//!    outbound signals drain from the session command channel

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};

use crate::client::ListenerRegistry;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::{AuthFrame, EventKind, ServerFrame, SignalFrame};

use super::session::SessionCommand;

// ============================================================================
// Types
// ============================================================================

/// The socket type produced by dialing.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connection's frame pump stopped.
#[derive(Debug)]
pub(crate) enum CloseReason {
    /// Local, deliberate shutdown; the supervisor must not reconnect.
    Shutdown,
    /// The connection was lost; the supervisor reconnects with backoff.
    Lost(String),
}

// ============================================================================
// Connection
// ============================================================================

/// One established, authenticated connection.
#[derive(Debug)]
pub(crate) struct Connection {
    ws: WsStream,
    sid: SessionId,
}

impl Connection {
    /// Dials the server and completes the auth/ready handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::WebSocket`] if dialing fails
    /// - [`Error::HandshakeTimeout`] if the ready frame does not arrive in
    ///   time
    /// - [`Error::HandshakeRejected`] if the server answers with an error
    ///   frame
    /// - [`Error::ConnectionClosed`] if the socket closes mid-handshake
    pub(crate) async fn establish(config: &ClientConfig, token: Option<String>) -> Result<Self> {
        let (mut ws, _) = connect_async(config.server_url.as_str()).await?;
        debug!(url = %config.server_url, "socket open, authenticating");

        let auth = AuthFrame::new(token, &config.transports);
        let json = serde_json::to_string(&auth)?;
        ws.send(Message::Text(json.into())).await?;

        let deadline = config.handshake_timeout;
        let sid = timeout(deadline, Self::wait_ready(&mut ws))
            .await
            .map_err(|_| Error::handshake_timeout(deadline.as_millis() as u64))??;

        debug!(%sid, "handshake completed");
        Ok(Self { ws, sid })
    }

    /// Returns the server-issued connection identifier.
    #[inline]
    pub(crate) fn session_id(&self) -> &SessionId {
        &self.sid
    }

    /// Waits for the ready frame, rejecting error frames.
    async fn wait_ready(ws: &mut WsStream) -> Result<SessionId> {
        while let Some(message) = ws.next().await {
            match message? {
                Message::Text(text) => match serde_json::from_str::<ServerFrame>(&text) {
                    Ok(ServerFrame::Ready { sid }) => return Ok(sid),

                    Ok(ServerFrame::Error { code, message }) => {
                        let message =
                            message.unwrap_or_else(|| "authentication rejected".to_string());
                        return Err(Error::handshake_rejected(code, message));
                    }

                    // Events pushed before the handshake completes have no
                    // session to belong to.
                    Ok(ServerFrame::Event { event, .. }) => {
                        trace!(event = %event, "event before ready, dropped");
                    }

                    Err(e) => {
                        return Err(Error::protocol(format!("invalid handshake frame: {e}")));
                    }
                },

                Message::Close(_) => return Err(Error::ConnectionClosed),

                // Ignore Binary, Ping, Pong
                _ => {}
            }
        }

        Err(Error::ConnectionClosed)
    }

    /// Pumps frames until the connection closes or a shutdown is requested.
    ///
    /// Inbound events dispatch synchronously on this task, in arrival
    /// order. Outbound signals drain from `command_rx`; the channel is owned
    /// by the supervisor and survives this connection, so signals sent
    /// during a reconnect window are handled there.
    pub(crate) async fn run(
        self,
        command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
        registry: &ListenerRegistry,
    ) -> CloseReason {
        let (mut ws_write, mut ws_read) = self.ws.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::dispatch(&text, registry);
                        }

                        Some(Ok(Message::Close(frame))) => {
                            let reason = frame
                                .map(|f| f.reason.to_string())
                                .filter(|r| !r.is_empty())
                                .unwrap_or_else(|| "closed by server".to_string());
                            debug!(reason = %reason, "WebSocket closed by remote");
                            return CloseReason::Lost(reason);
                        }

                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            return CloseReason::Lost(e.to_string());
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            return CloseReason::Lost("stream ended".to_string());
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(SessionCommand::Signal(signal)) => {
                            let frame = SignalFrame::new(signal);
                            let json = match serde_json::to_string(&frame) {
                                Ok(json) => json,
                                Err(e) => {
                                    warn!(error = %e, "failed to serialize signal");
                                    continue;
                                }
                            };

                            if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                                warn!(error = %e, "failed to send signal");
                                return CloseReason::Lost(e.to_string());
                            }
                            trace!(signal = frame.signal.wire_name(), "signal sent");
                        }

                        Some(SessionCommand::Shutdown) | None => {
                            debug!("shutdown requested");
                            let _ = ws_write.close().await;
                            return CloseReason::Shutdown;
                        }
                    }
                }
            }
        }
    }

    /// Translates one inbound text frame and fans it out.
    ///
    /// Wire events outside the catalog are dropped without error so newer
    /// servers can add event types freely.
    fn dispatch(text: &str, registry: &ListenerRegistry) {
        match serde_json::from_str::<ServerFrame>(text) {
            Ok(ServerFrame::Event { event, payload }) => match EventKind::from_wire(&event) {
                Some(kind) => registry.emit(kind, &payload),
                None => trace!(event = %event, "unmapped wire event dropped"),
            },

            Ok(ServerFrame::Ready { sid }) => {
                debug!(%sid, "duplicate ready frame ignored");
            }

            Ok(ServerFrame::Error { code, message }) => {
                warn!(?code, ?message, "server error frame");
            }

            Err(e) => {
                warn!(error = %e, "failed to parse inbound frame");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use crate::config::StaticToken;

    /// Binds a scripted one-shot server; returns its ws URL and a handle to
    /// the received auth frame.
    async fn one_shot_server(
        reply: Option<Value>,
    ) -> (String, tokio::task::JoinHandle<Option<Value>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.ok()?;
            let mut ws = accept_async(stream).await.ok()?;

            let auth = match ws.next().await?.ok()? {
                Message::Text(text) => serde_json::from_str::<Value>(&text).ok()?,
                _ => return None,
            };

            // Without a reply the socket must outlive the client's handshake
            // deadline so the timeout path is what fires, not a remote close.
            let hold = if reply.is_some() {
                Duration::from_millis(50)
            } else {
                Duration::from_millis(700)
            };

            if let Some(reply) = reply {
                ws.send(Message::Text(reply.to_string().into())).await.ok()?;
            }

            tokio::time::sleep(hold).await;
            Some(auth)
        });

        (format!("ws://127.0.0.1:{port}"), handle)
    }

    fn test_config(url: &str) -> ClientConfig {
        ClientConfig::builder()
            .server_url(url)
            .credentials(StaticToken::new("tok-test"))
            .handshake_timeout(Duration::from_millis(500))
            .build()
            .expect("config")
    }

    #[tokio::test]
    async fn test_establish_sends_auth_and_reads_ready() {
        let (url, server) = one_shot_server(Some(json!({ "type": "ready", "sid": "s-1" }))).await;
        let config = test_config(&url);

        let connection = Connection::establish(&config, Some("tok-test".into()))
            .await
            .expect("establish");
        assert_eq!(connection.session_id().as_str(), "s-1");

        let auth = server.await.expect("join").expect("auth frame");
        assert_eq!(auth["type"], "auth");
        assert_eq!(auth["auth"]["token"], "tok-test");
        assert_eq!(auth["transports"], json!(["websocket", "polling"]));
    }

    #[tokio::test]
    async fn test_establish_rejected_by_server() {
        let (url, _server) = one_shot_server(Some(json!({
            "type": "error", "code": "401", "message": "invalid token"
        })))
        .await;
        let config = test_config(&url);

        let err = Connection::establish(&config, None)
            .await
            .expect_err("should be rejected");
        assert!(matches!(err, Error::HandshakeRejected { .. }));
    }

    #[tokio::test]
    async fn test_establish_times_out_without_ready() {
        let (url, _server) = one_shot_server(None).await;
        let config = test_config(&url);

        let err = Connection::establish(&config, None)
            .await
            .expect_err("should time out");
        assert!(matches!(err, Error::HandshakeTimeout { .. }));
    }

    #[tokio::test]
    async fn test_establish_against_closed_port() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("ws://127.0.0.1:{}", listener.local_addr().expect("addr").port());
        drop(listener);

        let config = test_config(&url);
        let err = Connection::establish(&config, None)
            .await
            .expect_err("should fail to dial");
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_dispatch_known_event() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        registry.on(EventKind::TaskCreated, move |payload| {
            assert_eq!(payload["id"], "t1");
            c.fetch_add(1, Ordering::SeqCst);
        });

        let text = json!({
            "type": "event",
            "event": "task:created",
            "payload": { "id": "t1", "title": "X" }
        })
        .to_string();
        Connection::dispatch(&text, &registry);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unknown_event_dropped() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for kind in EventKind::ALL {
            let c = Arc::clone(&calls);
            registry.on(kind, move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        let text = json!({
            "type": "event",
            "event": "task:archived",
            "payload": {}
        })
        .to_string();
        Connection::dispatch(&text, &registry);

        // No listener on any catalog event fired.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_malformed_frame_is_harmless() {
        let registry = ListenerRegistry::new();
        Connection::dispatch("not json at all", &registry);
        Connection::dispatch(r#"{ "type": "pong" }"#, &registry);
    }
}
