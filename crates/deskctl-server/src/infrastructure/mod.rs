//! Infrastructure layer for deskctl-server.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `deskctl_core`, but MUST NOT be imported by them (tests excepted, which
//! borrow the recording driver).
//!
//! # Sub-modules
//!
//! - **`ws_server`** - Binds the TCP listener, upgrades connections to
//!   WebSocket with the configured size limits, and runs one session task per
//!   connection.
//!
//! - **`driver`** - `InputDriver` adapters: the headless virtual display, the
//!   fail-safe/pause wrapper, and the recording mock used by tests.
//!
//! - **`storage`** - TOML configuration file loading.

pub mod driver;
pub mod storage;
pub mod ws_server;
