//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the TOML file named on the command line and
//! turns it into a validated [`ServerConfig`](crate::domain::ServerConfig).

pub mod config;

pub use config::{load_config_file, ConfigError, ConfigFile};
