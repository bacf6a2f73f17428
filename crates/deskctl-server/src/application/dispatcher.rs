//! Per-message dispatch.
//!
//! [`Dispatcher::dispatch_text`] turns one received frame into exactly one
//! [`Envelope`].  The checks run in a fixed order (decode, token, action,
//! reload, lookup, invoke) and any failure short-circuits into an error
//! envelope.  Nothing a client sends can make this return anything other
//! than an envelope.

use std::error::Error as StdError;
use std::sync::Arc;

use deskctl_core::{CommandMessage, Envelope, ErrorCode, FrameError};
use serde_json::{json, Value};
use tokio::task::JoinError;
use tracing::{debug, warn};

use super::handlers::{HandlerContext, HandlerError};
use super::registry::{ActionRegistry, RELOAD_ACTION};

/// Routes authenticated commands to registered handlers.
///
/// Cheap to share: one instance serves every session.
pub struct Dispatcher {
    auth_token: String,
    registry: Arc<ActionRegistry>,
    context: Arc<HandlerContext>,
}

impl Dispatcher {
    pub fn new(
        auth_token: impl Into<String>,
        registry: Arc<ActionRegistry>,
        context: Arc<HandlerContext>,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            registry,
            context,
        }
    }

    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    /// Handles one text frame.
    pub async fn dispatch_text(&self, text: &str) -> Envelope {
        match CommandMessage::parse(text) {
            Ok(cmd) => self.dispatch(cmd).await,
            Err(e) => frame_error(e),
        }
    }

    /// Handles one binary frame, which must hold UTF-8 JSON.
    pub async fn dispatch_bytes(&self, bytes: &[u8]) -> Envelope {
        match CommandMessage::parse_bytes(bytes) {
            Ok(cmd) => self.dispatch(cmd).await,
            Err(e) => frame_error(e),
        }
    }

    /// Handles one decoded command.
    pub async fn dispatch(&self, cmd: CommandMessage) -> Envelope {
        if cmd.token() != Some(self.auth_token.as_str()) {
            debug!("rejecting command with bad or missing token");
            return Envelope::bare_error(ErrorCode::Unauthorized);
        }

        let Some(action) = cmd.action().map(str::to_owned) else {
            return Envelope::error(ErrorCode::InvalidAction, "Missing or non-string 'action'");
        };
        debug!(%action, "dispatching");

        if action == RELOAD_ACTION {
            return self.reload().await;
        }

        let Some(handler) = self.registry.lookup(&action) else {
            return Envelope::error(
                ErrorCode::UnsupportedAction,
                format!("Action '{action}' not supported"),
            );
        };

        let context = Arc::clone(&self.context);
        let outcome = tokio::task::spawn_blocking(move || handler.handle(&cmd, &context)).await;

        match outcome {
            Ok(Ok(result)) => Envelope::ok(result),
            Ok(Err(HandlerError::InvalidParams(details))) => {
                debug!(%action, %details, "invalid parameters");
                Envelope::error(ErrorCode::InvalidParams, details)
            }
            Ok(Err(e)) => {
                warn!(%action, "action failed: {e}");
                Envelope::error(e.code(), error_details(&e))
            }
            Err(join) => {
                warn!(%action, "handler task aborted: {join}");
                Envelope::error(ErrorCode::ExecutionError, join_details(join))
            }
        }
    }

    async fn reload(&self) -> Envelope {
        let registry = Arc::clone(&self.registry);
        match tokio::task::spawn_blocking(move || registry.reload()).await {
            Ok(Ok(count)) => Envelope::ok(json!({
                "message": "Handlers reloaded",
                "count": count,
            })),
            Ok(Err(e)) => {
                warn!("reload failed: {e}");
                Envelope::error(ErrorCode::ReloadFailed, error_details(&e))
            }
            Err(join) => {
                warn!("reload task aborted: {join}");
                Envelope::error(ErrorCode::ReloadFailed, join_details(join))
            }
        }
    }
}

fn frame_error(err: FrameError) -> Envelope {
    let code = match err {
        FrameError::InvalidJson(_) => ErrorCode::InvalidJson,
        FrameError::NotAnObject(_) => ErrorCode::MalformedMessage,
    };
    debug!(%code, "undecodable frame: {err}");
    Envelope::error(code, err.to_string())
}

/// Diagnostic details for an unexpected failure: the error message plus the
/// messages of its source chain, outermost first.
pub fn error_details(err: &dyn StdError) -> Value {
    let mut traceback = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        traceback.push(cause.to_string());
        source = cause.source();
    }
    json!({ "exception": err.to_string(), "traceback": traceback })
}

fn join_details(err: JoinError) -> Value {
    let exception = if err.is_panic() {
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        format!("handler panicked: {message}")
    } else {
        err.to_string()
    };
    json!({ "exception": exception, "traceback": [] })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
