//! Command-line argument definitions for the RTT processor
//!
//! Defines the CLI interface using the clap derive API: a batch `import`
//! command over a snapshot directory and a live `fetch` command for one
//! station.

use crate::error::{Result, RttError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the RTT snapshot processor
///
/// Converts Realtime Trains station schedule snapshots into InfluxDB
/// time-series points recording per-service arrival and departure delays.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rtt-processor",
    version,
    about = "Convert Realtime Trains station snapshots into InfluxDB delay points",
    long_about = "Converts per-station railway schedule snapshots (one JSON document per day) \
                  into InfluxDB time-series points recording arrival delay, departure delay, \
                  platform, origin, destination, operator and cancellation reason for every \
                  service. Snapshots can be imported in bulk from a data directory or fetched \
                  live from the Realtime Trains API."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the RTT processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import snapshot files from a data directory
    Import(ImportArgs),
    /// Fetch today's schedule for one station and write it
    Fetch(FetchArgs),
}

/// Arguments for the import command (batch directory conversion)
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Directory containing snapshot files
    ///
    /// Files must be named <STATION_CODE>-<YYYY-MM-DD>.json; the date in
    /// the filename is used for every point converted from the file.
    /// If not specified, defaults to the configured data directory (/data).
    #[arg(
        short = 'i',
        long = "data-dir",
        value_name = "PATH",
        help = "Directory containing snapshot files"
    )]
    pub data_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file for endpoint and credential settings. If not
    /// specified, looks for ~/.config/rtt-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Override the InfluxDB URL from configuration
    #[arg(
        long = "influx-url",
        value_name = "URL",
        help = "InfluxDB base URL (overrides configuration)"
    )]
    pub influx_url: Option<String>,

    /// Perform a dry run without writing
    ///
    /// Discovers and converts every snapshot but skips the storage writes.
    /// Useful for previewing a batch and catching malformed files.
    #[arg(long = "dry-run", help = "Convert snapshots without writing points")]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the fetch command (live station poll)
#[derive(Debug, Clone, Parser)]
pub struct FetchArgs {
    /// Station to fetch, as a CRS or TIPLOC code (e.g. LDS)
    #[arg(value_name = "STATION", help = "Station CRS or TIPLOC code")]
    pub station: String,

    /// Path to configuration file
    ///
    /// TOML configuration file for endpoint and credential settings. If not
    /// specified, looks for ~/.config/rtt-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Override the InfluxDB URL from configuration
    #[arg(
        long = "influx-url",
        value_name = "URL",
        help = "InfluxDB base URL (overrides configuration)"
    )]
    pub influx_url: Option<String>,

    /// Fetch and convert without writing
    ///
    /// Prints the encoded points instead of posting them to storage.
    #[arg(long = "dry-run", help = "Fetch and convert without writing points")]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl ImportArgs {
    /// Validate the import command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.data_dir {
            if !data_dir.exists() {
                return Err(RttError::Configuration {
                    message: format!("Data directory does not exist: {}", data_dir.display()),
                });
            }

            if !data_dir.is_dir() {
                return Err(RttError::Configuration {
                    message: format!("Data path is not a directory: {}", data_dir.display()),
                });
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(RttError::Configuration {
                    message: format!("Config file does not exist: {}", config_file.display()),
                });
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl FetchArgs {
    /// Validate the fetch command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.station.is_empty() || self.station.len() > 7 {
            return Err(RttError::Configuration {
                message: format!(
                    "Station code must be 1-7 characters, got: {:?}",
                    self.station
                ),
            });
        }

        if !self.station.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RttError::Configuration {
                message: format!("Station code must be alphanumeric, got: {:?}", self.station),
            });
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(RttError::Configuration {
                    message: format!("Config file does not exist: {}", config_file.display()),
                });
            }
        }

        Ok(())
    }

    /// Station code as the API expects it
    pub fn station_code(&self) -> String {
        self.station.to_ascii_uppercase()
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress output (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for ImportArgs {
    fn default() -> Self {
        Self {
            data_dir: None,
            config_file: None,
            influx_url: None,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            station: String::new(),
            config_file: None,
            influx_url: None,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}
