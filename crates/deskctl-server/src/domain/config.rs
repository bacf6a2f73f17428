//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup (config file, then CLI overrides) and is not
//! reloaded while the process runs.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8765;

/// Default per-message size limit (1 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1 << 20;

/// Placeholder secret shipped in defaults.  `main` warns when it is still in use.
pub const PLACEHOLDER_TOKEN: &str = "replace-with-a-strong-secret";

/// All runtime configuration for the command server.
///
/// # Example
///
/// ```rust
/// use deskctl_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8765);
/// assert_eq!(cfg.max_message_size, 1 << 20);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.  Loopback by default; the
    /// server injects input, so exposing it on a LAN is an explicit choice.
    pub bind_addr: SocketAddr,

    /// Shared secret every command must carry in its `token` field.
    pub auth_token: String,

    /// Directory screenshots are written to.  Created at startup.
    pub screenshot_dir: PathBuf,

    /// Refuse input actions while the pointer sits in a screen corner.
    pub failsafe: bool,

    /// Sleep after every input action.
    pub pause: Duration,

    /// Largest accepted WebSocket message (and frame), in bytes.
    pub max_message_size: usize,

    /// Virtual screen size used by the headless driver.
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for ServerConfig {
    /// | Field            | Default                        |
    /// |------------------|--------------------------------|
    /// | bind_addr        | `127.0.0.1:8765`               |
    /// | auth_token       | `replace-with-a-strong-secret` |
    /// | screenshot_dir   | `./screenshots`                |
    /// | failsafe         | `true`                         |
    /// | pause            | 50 ms                          |
    /// | max_message_size | 1 MiB                          |
    /// | screen           | 1920 × 1080                    |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            auth_token: PLACEHOLDER_TOKEN.to_string(),
            screenshot_dir: PathBuf::from("./screenshots"),
            failsafe: true,
            pause: Duration::from_millis(50),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

impl ServerConfig {
    /// `true` while the shipped placeholder secret is still configured.
    pub fn uses_placeholder_token(&self) -> bool {
        self.auth_token == PLACEHOLDER_TOKEN
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
