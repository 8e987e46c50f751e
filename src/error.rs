//! Error handling for snapshot processing operations.
//!
//! Provides error types with context for snapshot discovery, conversion,
//! live fetching, and time-series write failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RttError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data directory not found at path: {}", path.display())]
    DataDirNotFound { path: PathBuf },

    #[error("Invalid snapshot in file: {} - {reason}", path.display())]
    SnapshotParseFailed { path: PathBuf, reason: String },

    #[error("Point construction failed for service {service_uid}: {reason}")]
    PointConstruction { service_uid: String, reason: String },

    #[error("InfluxDB rejected write to database {database}: status {status} - {body}")]
    InfluxWriteRejected {
        database: String,
        status: u16,
        body: String,
    },

    #[error("Station search for {station} failed with status {status}")]
    FetchRejected { station: String, status: u16 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RttError>;
