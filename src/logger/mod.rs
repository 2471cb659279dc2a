//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber setup (stdout or file) driven by configuration
//! - Leveled log helpers used throughout the pipeline
//! - Access logging with multiple formats

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines so they can be filtered separately
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup. `RUST_LOG` overrides the
/// configured level when set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.log_file.as_deref() {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.try_init(),
    };

    installed.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> std::io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Server started, listening on http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
    tracing::info!("Static sources: {}", config.sources.len());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_info(message: &str) {
    tracing::info!("{message}");
}

pub fn log_debug(message: &str) {
    tracing::debug!("{message}");
}

/// Log an error together with its source chain
pub fn log_exception(context: &str, err: &(dyn std::error::Error + 'static)) {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    tracing::error!("{context}: {chain}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
