//! Application constants for the RTT processor
//!
//! This module contains the fixed storage schema names, file and clock
//! formats, endpoint defaults, and environment variable names used
//! throughout the application.

// =============================================================================
// Storage Schema Constants
// =============================================================================

/// Measurement name every delay point is written under
pub const MEASUREMENT_NAME: &str = "services";

/// Fixed tag attached to every point (key and value)
pub const SERVICE_TAG_KEY: &str = "service";
pub const SERVICE_TAG_VALUE: &str = "service";

/// Write precision sent to InfluxDB (epoch seconds)
pub const WRITE_PRECISION: &str = "s";

/// Field keys within the `services` measurement
pub mod fields {
    pub const ARRIVAL_DELAY: &str = "arrival_delay";
    pub const DEPARTURE_DELAY: &str = "departure_delay";
    pub const PLATFORM: &str = "platform";
    pub const ORIGIN: &str = "origin";
    pub const DESTINATION: &str = "destination";
    pub const OPERATOR: &str = "operator";
    pub const CANCELLATION_CODE: &str = "cancellation_code";
}

// =============================================================================
// Endpoint and Credential Defaults
// =============================================================================

/// Default InfluxDB endpoint (1.x write API)
pub const DEFAULT_INFLUX_URL: &str = "http://influxdb:8086";

/// Database every batch is written to
pub const DEFAULT_DATABASE: &str = "trains";

/// Default Realtime Trains API base URL
pub const DEFAULT_RTT_BASE_URL: &str = "https://api.rtt.io/api/v1/json";

/// Environment variables holding the RTT API credentials
pub const RTT_USERNAME_VAR: &str = "RTT_USERNAME";
pub const RTT_PASSWORD_VAR: &str = "RTT_PASSWORD";

/// Request timeouts in seconds
pub const RTT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const INFLUX_WRITE_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Snapshot File Constants
// =============================================================================

/// Default directory scanned for snapshot files
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Snapshot filename pattern: `<STATION_CODE>-<YYYY-MM-DD>.json`
pub const SNAPSHOT_NAME_PATTERN: &str = r"^([A-Za-z0-9]+)-(\d{4}-\d{2}-\d{2})\.json$";

/// Date format of the snapshot filename segment
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Extension snapshot files must carry
pub const SNAPSHOT_EXTENSION: &str = "json";

// =============================================================================
// Clock Constants
// =============================================================================

/// Format of schedule clock values ("0805" is five past eight)
pub const CLOCK_FORMAT: &str = "%H%M";

// =============================================================================
// Configuration File Constants
// =============================================================================

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "rtt-processor";

/// Configuration filename
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Helper Functions
// =============================================================================

/// Build the canonical filename for a station snapshot
pub fn snapshot_filename(station: &str, date: chrono::NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        station,
        date.format(SNAPSHOT_DATE_FORMAT),
        SNAPSHOT_EXTENSION
    )
}

/// Build the write endpoint for an InfluxDB base URL
pub fn write_endpoint(base_url: &str) -> String {
    format!("{}/write", base_url.trim_end_matches('/'))
}

/// Build the station search endpoint for an RTT base URL
pub fn search_endpoint(base_url: &str, station: &str) -> String {
    format!("{}/search/{}", base_url.trim_end_matches('/'), station)
}
