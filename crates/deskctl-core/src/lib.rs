//! # deskctl-core
//!
//! Shared library for deskctl containing the command protocol types, the
//! response envelope, and the key name table used to validate keyboard
//! actions.
//!
//! This crate has zero dependencies on OS APIs, sockets, or async runtimes.
//! The server crate layers I/O on top of it.
//!
//! # Overview
//!
//! deskctl is a remote desktop-automation command server.  A client opens a
//! WebSocket, sends JSON commands such as
//!
//! ```json
//! {"token":"s3cret","action":"click","x":100,"y":200,"button":"left"}
//! ```
//!
//! and receives exactly one JSON response per command:
//!
//! ```json
//! {"status":"ok","result":{"clicked":[100,200],"button":"left"}}
//! ```
//!
//! This crate defines:
//!
//! - **`protocol`** - [`CommandMessage`] (typed accessors over the raw JSON
//!   object), [`Envelope`] (the ok/error response wrapper) and the stable
//!   [`ErrorCode`] strings clients match on.
//!
//! - **`keymap`** - The canonical key representation (USB HID Usage IDs) and
//!   the table that maps client-facing key names (`"enter"`, `"ctrl"`, `"f5"`)
//!   onto it.

pub mod keymap;
pub mod protocol;

pub use keymap::hid::HidKeyCode;
pub use protocol::envelope::{Envelope, ErrorBody, ErrorCode};
pub use protocol::messages::{CommandMessage, FrameError, MouseButton, ParamError, Region};
