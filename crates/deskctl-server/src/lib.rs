//! deskctl-server library crate.
//!
//! A long-lived WebSocket listener that accepts authenticated clients,
//! receives JSON action requests (move, click, type, press keys, drag, scroll,
//! capture screen), routes each to a named handler, and writes back exactly
//! one response envelope per request.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (JSON over WebSocket)
//!         ↕
//! [deskctl-server]
//!   ├── domain/           ServerConfig
//!   ├── application/
//!   │     ├── driver      InputDriver trait (the OS input/display seam)
//!   │     ├── handlers/   One ActionHandler per action
//!   │     ├── registry    Name → handler map with atomic reload
//!   │     └── dispatcher  Auth gate, routing, per-message error isolation
//!   └── infrastructure/
//!         ├── ws_server/  Accept loop + per-session message loop
//!         ├── driver/     Recording mock, headless display, safety wrapper
//!         └── storage/    TOML configuration file
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `deskctl-core`; it spawns blocking
//!   tasks but never touches sockets.
//! - `infrastructure` depends on all other layers plus `tokio-tungstenite`.

/// Domain layer: plain runtime configuration.
pub mod domain;

/// Application layer: driver seam, handlers, registry, dispatcher.
pub mod application;

/// Infrastructure layer: WebSocket server, driver adapters, config storage.
pub mod infrastructure;
