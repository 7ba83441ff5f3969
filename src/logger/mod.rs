//! Logger module
//!
//! Provides logging for the HTTP server including:
//! - A `tracing` subscriber with compact or JSON console output
//! - Access logging with multiple formats, optionally to its own file
//! - A WARN+ error log file

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::filter::{filter_fn, LevelFilter, ParseError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Target of access log events
pub const ACCESS_TARGET: &str = "access";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log level directive: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggerError> {
    let level = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let access_to_file = config.access_log_file.is_some();

    let console: BoxedLayer = match config.format {
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };
    let mut layers: Vec<BoxedLayer> = vec![console
        .with_filter(level)
        .with_filter(filter_fn(move |meta| {
            !(access_to_file && meta.target() == ACCESS_TARGET)
        }))
        .boxed()];

    if let Some(path) = &config.access_log_file {
        layers.push(
            fmt::layer()
                .with_writer(writer::log_file_writer(path)?)
                .with_ansi(false)
                .without_time()
                .with_level(false)
                .with_target(false)
                .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET))
                .boxed(),
        );
    }

    if let Some(path) = &config.error_log_file {
        layers.push(
            fmt::layer()
                .with_writer(writer::log_file_writer(path)?)
                .with_ansi(false)
                .with_filter(LevelFilter::WARN)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, route_count: usize) {
    tracing::info!("======================================");
    tracing::info!("Server started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Routes: {route_count}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        tracing::info!("Error log: {path}");
    }
    tracing::info!("======================================");
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    tracing::warn!("Failed to serve connection from {peer_addr}: {err}");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        tracing::debug!("[Headers] Count: {count}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
