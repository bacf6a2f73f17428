//! deskctl server entry point.
//!
//! Accepts WebSocket connections, authenticates every JSON command against a
//! shared secret, and drives the desktop through the configured input driver.
//!
//! # Usage
//!
//! ```text
//! deskctl-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>          TOML configuration file
//!   --host <HOST>            Listen host [default: 127.0.0.1]
//!   --port <PORT>            Listen port [default: 8765]
//!   --token <SECRET>         Shared secret clients must send
//!   --screenshot-dir <DIR>   Where screenshots are written
//!   --no-failsafe            Disable the screen-corner fail-safe
//!   --log-level <LEVEL>      tracing level when RUST_LOG is unset
//!   --print-default-config   Print a default config file and exit
//! ```
//!
//! # Precedence
//!
//! Command-line flag, then environment variable, then config file, then the
//! built-in default.
//!
//! | Variable                 | Flag               |
//! |--------------------------|--------------------|
//! | `DESKCTL_CONFIG`         | `--config`         |
//! | `DESKCTL_HOST`           | `--host`           |
//! | `DESKCTL_PORT`           | `--port`           |
//! | `DESKCTL_TOKEN`          | `--token`          |
//! | `DESKCTL_SCREENSHOT_DIR` | `--screenshot-dir` |
//! | `DESKCTL_LOG`            | `--log-level`      |

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use deskctl_server::application::{
    ActionRegistry, BuiltinCatalog, Dispatcher, HandlerContext, InputDriver,
};
use deskctl_server::domain::ServerConfig;
use deskctl_server::infrastructure::driver::{HeadlessDriver, SafetyDriver};
use deskctl_server::infrastructure::storage::{load_config_file, ConfigFile};
use deskctl_server::infrastructure::ws_server::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Authenticated WebSocket command server for remote desktop automation.
#[derive(Debug, Parser)]
#[command(name = "deskctl-server", version)]
struct Cli {
    /// TOML configuration file.  Must exist when given.
    #[arg(long, env = "DESKCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Host name or IP address to listen on.
    ///
    /// The server injects real input, so binding beyond loopback exposes the
    /// desktop to the network.
    #[arg(long, env = "DESKCTL_HOST")]
    host: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "DESKCTL_PORT")]
    port: Option<u16>,

    /// Shared secret every command must carry in its `token` field.
    #[arg(long, env = "DESKCTL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Directory screenshots are written to.
    #[arg(long, env = "DESKCTL_SCREENSHOT_DIR")]
    screenshot_dir: Option<PathBuf>,

    /// Disable the screen-corner fail-safe.
    #[arg(long)]
    no_failsafe: bool,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[arg(long, env = "DESKCTL_LOG")]
    log_level: Option<String>,

    /// Print a config file holding every default and exit.
    #[arg(long)]
    print_default_config: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the named config file cannot be read or parsed.
    fn load_file(&self) -> anyhow::Result<ConfigFile> {
        let mut file = match &self.config {
            Some(path) => load_config_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ConfigFile::default(),
        };

        if let Some(host) = &self.host {
            file.server.host = host.clone();
        }
        if let Some(port) = self.port {
            file.server.port = port;
        }
        if let Some(token) = &self.token {
            file.server.auth_token = token.clone();
        }
        if let Some(dir) = &self.screenshot_dir {
            file.automation.screenshot_dir = dir.clone();
        }
        if self.no_failsafe {
            file.automation.failsafe = false;
        }
        if let Some(level) = &self.log_level {
            file.server.log_level = level.clone();
        }
        Ok(file)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", ConfigFile::default().to_toml()?);
        return Ok(());
    }

    let file = cli.load_file()?;
    let config = file
        .to_server_config()
        .context("invalid server configuration")?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&file.server.log_level)),
        )
        .init();

    info!(
        "deskctl server starting: listen={}, screen={}x{}, failsafe={}",
        config.bind_addr, config.screen_width, config.screen_height, config.failsafe
    );
    if config.uses_placeholder_token() {
        warn!("auth token is still the shipped placeholder; set --token or DESKCTL_TOKEN");
    }

    let dispatcher = Arc::new(build_dispatcher(&config)?);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(&config, dispatcher, running).await?;

    info!("deskctl server stopped");
    Ok(())
}

/// Wires the driver stack, registry, and dispatcher for `config`.
///
/// # Errors
///
/// Returns an error if the screenshot directory cannot be created or the
/// handler catalog fails to load.
fn build_dispatcher(config: &ServerConfig) -> anyhow::Result<Dispatcher> {
    std::fs::create_dir_all(&config.screenshot_dir).with_context(|| {
        format!(
            "failed to create screenshot directory {}",
            config.screenshot_dir.display()
        )
    })?;

    let driver = SafetyDriver::new(
        HeadlessDriver::new(config.screen_width, config.screen_height),
        config.failsafe,
        config.pause,
    );
    let context = Arc::new(HandlerContext {
        driver: Arc::new(driver) as Arc<dyn InputDriver>,
        screenshot_dir: config.screenshot_dir.clone(),
    });
    let registry = Arc::new(ActionRegistry::load(BuiltinCatalog).context("failed to load actions")?);

    Ok(Dispatcher::new(config.auth_token.clone(), registry, context))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
