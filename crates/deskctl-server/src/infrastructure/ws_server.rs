//! WebSocket server: accept loop and per-session message loop.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections.
//! 3. Upgrading each connection to a WebSocket session with the configured
//!    message and frame size limits.
//! 4. Reading one message at a time, handing it to the [`Dispatcher`], and
//!    writing back exactly one response envelope before reading the next.
//! 5. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Sessions
//!
//! Each connection runs in its own Tokio task, so a slow action on one
//! connection never delays another.  Within a session processing is strictly
//! sequential: responses go out in receive order.
//!
//! Ping and pong frames are answered by tungstenite and produce no envelope.
//! A message larger than `max_message_size` is a transport error: the session
//! sends a best-effort Close (1009, "message too big") and ends.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async_with_config,
    tungstenite::{
        error::CapacityError,
        protocol::{frame::coding::CloseCode, CloseFrame, WebSocketConfig},
        Error as WsError, Message as WsMessage,
    },
    WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::application::Dispatcher;
use crate::domain::ServerConfig;

/// How long one `accept` waits before the loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the listener, then serves until `running` is set to `false`.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server(
    config: &ServerConfig,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = bind(config.bind_addr).await?;
    serve(listener, config.max_message_size, dispatcher, running).await
}

/// Binds the TCP listener for the command server.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;
    let local = listener.local_addr().unwrap_or(addr);
    info!("deskctl server listening on ws://{local}");
    Ok(listener)
}

/// Runs the accept loop on an already-bound listener until `running` is
/// cleared.  In-flight sessions are not drained.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and the loop continues.
pub async fn serve(
    listener: TcpListener,
    max_message_size: usize,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let ws_config = ws_config(max_message_size);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                info!("new connection from {peer_addr}");
                let dispatcher = Arc::clone(&dispatcher);
                let ws_config = ws_config.clone();
                tokio::spawn(async move {
                    handle_session(stream, peer_addr, ws_config, dispatcher).await;
                });
            }
            Ok(Err(e)) => {
                // Transient (e.g. out of file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {
                // No connection within the poll window.
            }
        }
    }

    Ok(())
}

/// WebSocket settings enforcing the per-message size limit on both whole
/// messages and individual frames.
pub fn ws_config(max_message_size: usize) -> WebSocketConfig {
    let mut config = WebSocketConfig::default();
    config.max_message_size = Some(max_message_size);
    config.max_frame_size = Some(max_message_size);
    config
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Liveness of one session, owned by the task servicing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Closing,
    Closed,
}

async fn handle_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    ws_config: WebSocketConfig,
    dispatcher: Arc<Dispatcher>,
) {
    match run_session(raw_stream, peer_addr, ws_config, dispatcher).await {
        Ok(handled) => info!("session {peer_addr} closed after {handled} message(s)"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs one session to completion and returns how many commands it answered.
///
/// # Errors
///
/// Returns an error if the handshake fails, a frame exceeds the size limit,
/// or a response cannot be written.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    ws_config: WebSocketConfig,
    dispatcher: Arc<Dispatcher>,
) -> anyhow::Result<u64> {
    let mut ws = accept_async_with_config(raw_stream, Some(ws_config))
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;
    debug!("session {peer_addr}: WebSocket established");

    let mut state = SessionState::Open;
    let mut handled: u64 = 0;

    while state == SessionState::Open {
        let msg = match ws.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed | WsError::Protocol(_))) => {
                debug!("session {peer_addr}: connection closed");
                state = SessionState::Closed;
                continue;
            }
            Some(Err(WsError::Capacity(e))) => {
                reject_oversized(&mut ws, peer_addr, &e).await;
                return Err(e).context(format!("session {peer_addr}: message over size limit"));
            }
            Some(Err(e)) => {
                return Err(e).context(format!("session {peer_addr}: read failed"));
            }
            None => {
                debug!("session {peer_addr}: stream ended");
                state = SessionState::Closed;
                continue;
            }
        };

        let envelope = match msg {
            WsMessage::Text(text) => dispatcher.dispatch_text(&text).await,
            WsMessage::Binary(bytes) => dispatcher.dispatch_bytes(&bytes).await,
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            WsMessage::Close(_) => {
                debug!("session {peer_addr}: Close frame received");
                state = SessionState::Closing;
                continue;
            }
        };

        ws.send(WsMessage::Text(envelope.to_json()))
            .await
            .with_context(|| format!("session {peer_addr}: failed to send response"))?;
        handled += 1;
    }

    if state == SessionState::Closing {
        // tungstenite has already queued the Close reply; flushing completes the handshake.
        let _ = ws.flush().await;
    }
    Ok(handled)
}

async fn reject_oversized(
    ws: &mut WebSocketStream<TcpStream>,
    peer_addr: SocketAddr,
    err: &CapacityError,
) {
    warn!("session {peer_addr}: {err}; closing");
    let frame = CloseFrame {
        code: CloseCode::Size,
        reason: "message too big".into(),
    };
    if let Err(e) = ws.close(Some(frame)).await {
        debug!("session {peer_addr}: close after oversized message failed: {e}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
