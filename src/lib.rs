//! RTT Processor Library
//!
//! A Rust library for converting Realtime Trains station schedule snapshots
//! into InfluxDB time-series points tracking railway punctuality.
//!
//! This library provides tools for:
//! - Discovering per-station snapshot files named by station code and date
//! - Parsing Realtime Trains JSON schedule documents
//! - Computing arrival and departure delays from booked and realtime clocks
//! - Encoding delay points in InfluxDB line protocol and posting them in batches
//! - Fetching live station schedules from the Realtime Trains API
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod models;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, RttError};
pub use models::{DelayPoint, ImportStats, Service, Station};
