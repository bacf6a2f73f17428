//! Command protocol: request accessors and the response envelope.
//!
//! A request is one JSON object per WebSocket frame:
//!
//! ```text
//! {"token": "<secret>", "action": "<name>", ...action-specific fields}
//! ```
//!
//! A response is exactly one [`envelope::Envelope`] per request, written back
//! on the same connection in the order the requests arrived.

pub mod envelope;
pub mod messages;
