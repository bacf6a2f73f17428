//! TOML configuration file.
//!
//! The server reads an optional TOML file once at startup.  Every field has
//! a default, so an empty file (or no file at all) yields
//! [`ServerConfig::default`].  Example:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8765
//! auth_token = "a-long-random-secret"
//! max_message_size = 1048576
//! log_level = "info"
//!
//! [automation]
//! screenshot_dir = "./screenshots"
//! failsafe = true
//! pause = 0.05
//!
//! [screen]
//! width = 1920
//! height = 1080
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` fall back to
//! `some_fn()` when absent, so older files keep working as fields are added.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PORT, PLACEHOLDER_TOKEN};
use crate::domain::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `host`/`port` do not form a usable listen address.
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    /// A field holds a value outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub automation: AutomationSection,
    #[serde(default)]
    pub screen: ScreenSection,
}

/// Listener, authentication, and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Host name or IP address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret every command must carry.
    #[serde(default = "default_auth_token")]
    pub auth_token: String,
    /// Largest accepted WebSocket message, in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Input safety and screenshot output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationSection {
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    /// Refuse input while the pointer sits in a screen corner.
    #[serde(default = "default_true")]
    pub failsafe: bool,
    /// Seconds to sleep after every input action.
    #[serde(default = "default_pause")]
    pub pause: f64,
}

/// Virtual display size for the headless driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenSection {
    #[serde(default = "default_screen_width")]
    pub width: u32,
    #[serde(default = "default_screen_height")]
    pub height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_auth_token() -> String {
    PLACEHOLDER_TOKEN.to_string()
}
fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("./screenshots")
}
fn default_true() -> bool {
    true
}
fn default_pause() -> f64 {
    0.05
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_token: default_auth_token(),
            max_message_size: default_max_message_size(),
            log_level: default_log_level(),
        }
    }
}

impl Default for AutomationSection {
    fn default() -> Self {
        Self {
            screenshot_dir: default_screenshot_dir(),
            failsafe: default_true(),
            pause: default_pause(),
        }
    }
}

impl Default for ScreenSection {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

impl ConfigFile {
    /// Validates the file's values and builds the runtime configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAddress`] when `host`/`port` do not resolve, and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let bind_addr = resolve_addr(&self.server.host, self.server.port)?;

        if self.server.auth_token.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth_token",
                reason: "must not be empty".into(),
            });
        }
        if self.server.max_message_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_message_size",
                reason: "must be positive".into(),
            });
        }
        let pause = Duration::try_from_secs_f64(self.automation.pause).map_err(|e| {
            ConfigError::InvalidValue {
                field: "pause",
                reason: e.to_string(),
            }
        })?;
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "screen",
                reason: "width and height must be positive".into(),
            });
        }

        Ok(ServerConfig {
            bind_addr,
            auth_token: self.server.auth_token.clone(),
            screenshot_dir: self.automation.screenshot_dir.clone(),
            failsafe: self.automation.failsafe,
            pause,
            max_message_size: self.server.max_message_size,
            screen_width: self.screen.width,
            screen_height: self.screen.height,
        })
    }

    /// Renders the file as pretty-printed TOML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Resolves `host:port` to the first matching socket address.
///
/// # Errors
///
/// [`ConfigError::InvalidAddress`] when the pair does not resolve.
pub fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| ConfigError::InvalidAddress(format!("{host}:{port}")))
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads the configuration file at `path`.
///
/// Unlike the optional default location, an explicitly named file must exist.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read and [`ConfigError::Parse`]
/// if the TOML is malformed.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_matches_server_defaults() {
        // Arrange
        let file: ConfigFile = toml::from_str("").unwrap();

        // Act
        let cfg = file.to_server_config().unwrap();

        // Assert
        let defaults = ServerConfig::default();
        assert_eq!(cfg.bind_addr, defaults.bind_addr);
        assert_eq!(cfg.auth_token, defaults.auth_token);
        assert_eq!(cfg.pause, defaults.pause);
        assert_eq!(cfg.max_message_size, defaults.max_message_size);
        assert_eq!(file.server.log_level, "info");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [server]
            port = 9000
            auth_token = "s3cret"

            [automation]
            failsafe = false
            "#,
        )
        .unwrap();

        let cfg = file.to_server_config().unwrap();

        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.auth_token, "s3cret");
        assert!(!cfg.failsafe);
        assert_eq!(cfg.screen_width, 1920);
    }

    #[test]
    fn test_rejects_unparseable_host() {
        let mut file = ConfigFile::default();
        file.server.host = "not a host name!".into();
        assert!(matches!(
            file.to_server_config(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_rejects_negative_pause() {
        let mut file = ConfigFile::default();
        file.automation.pause = -1.0;
        assert!(matches!(
            file.to_server_config(),
            Err(ConfigError::InvalidValue { field: "pause", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_token_and_zero_limits() {
        let mut file = ConfigFile::default();
        file.server.auth_token.clear();
        assert!(file.to_server_config().is_err());

        let mut file = ConfigFile::default();
        file.server.max_message_size = 0;
        assert!(file.to_server_config().is_err());

        let mut file = ConfigFile::default();
        file.screen.height = 0;
        assert!(file.to_server_config().is_err());
    }

    #[test]
    fn test_rendered_defaults_parse_back() {
        let rendered = ConfigFile::default().to_toml().unwrap();
        let parsed: ConfigFile = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, ConfigFile::default());
    }

    #[test]
    fn test_load_config_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskctl.toml");
        std::fs::write(&path, "[screen]\nwidth = 800\nheight = 600\n").unwrap();

        let file = load_config_file(&path).unwrap();

        assert_eq!(file.screen.width, 800);
        assert_eq!(file.screen.height, 600);
    }

    #[test]
    fn test_load_config_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_config_file_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
