//! Core data structures for snapshot processing.
//!
//! Defines the deserialized Realtime Trains station schema, the converted
//! delay point, and run statistics used throughout the library.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One station schedule document, either read from a snapshot file or
/// fetched live from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub location: Option<StationLocation>,
    /// The upstream API serialises an empty day as `null`, not `[]`.
    pub services: Option<Vec<Service>>,
}

impl Station {
    /// Services listed in the document, empty when the day had none.
    pub fn services(&self) -> &[Service] {
        self.services.as_deref().unwrap_or_default()
    }
}

/// Identity of the searched station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLocation {
    pub name: Option<String>,
    pub crs: Option<String>,
    pub tiploc: Option<String>,
}

/// One scheduled train movement through the searched station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub location_detail: LocationDetail,
    #[serde(default)]
    pub service_uid: String,
    /// Operator (ATOC) code, e.g. "NT". Absent on some non-passenger
    /// services.
    #[serde(default)]
    pub atoc_code: String,
}

/// Calling details for the service at the searched station.
///
/// Clock values are "HHMM" strings with no date component. The booked
/// arrival pair is absent for services that originate here; the departure
/// pair is expected on every record, so an absent key degrades to an empty
/// string rather than failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub gbtt_booked_arrival: Option<String>,
    pub realtime_arrival: Option<String>,
    #[serde(default)]
    pub gbtt_booked_departure: String,
    #[serde(default)]
    pub realtime_departure: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub origin: Vec<CallPoint>,
    #[serde(default)]
    pub destination: Vec<CallPoint>,
    pub cancel_reason_code: Option<String>,
}

/// Origin or destination entry on a service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPoint {
    #[serde(default)]
    pub tiploc: String,
    pub description: Option<String>,
}

/// One converted delay measurement, ready for line-protocol encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayPoint {
    /// Snapshot date combined with the real departure clock, local time,
    /// zero seconds.
    pub timestamp: DateTime<Local>,
    pub arrival_delay: i64,
    pub departure_delay: i64,
    pub platform: String,
    pub origin: String,
    pub destination: String,
    pub operator: String,
    /// Omitted from the encoded point when absent, never a placeholder.
    pub cancellation_code: Option<String>,
}

/// Statistics for one processor run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportStats {
    pub files_discovered: usize,
    pub files_imported: usize,
    pub files_skipped: usize,
    pub services_converted: usize,
    pub points_written: usize,
    pub degraded_records: usize,
    pub processing_time_ms: u128,
}
