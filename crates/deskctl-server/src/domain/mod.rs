//! Domain layer for deskctl-server.
//!
//! Pure types with no dependencies on I/O, networking, or external
//! frameworks.  The infrastructure layer populates them from the config file
//! and CLI.

pub mod config;

pub use config::ServerConfig;
