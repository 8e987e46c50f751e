//! Snapshot file discovery
//!
//! Handles discovering station snapshot files in the data directory and
//! extracting the station code and calendar date each file carries.

use crate::constants::{SNAPSHOT_DATE_FORMAT, SNAPSHOT_EXTENSION, SNAPSHOT_NAME_PATTERN};
use crate::error::{Result, RttError};
use chrono::NaiveDate;
use regex::Regex;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// One discovered snapshot file.
///
/// The date comes from the filename and is authoritative for every point
/// converted from the file, regardless of dates inside the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub station: String,
    pub date: NaiveDate,
}

/// Snapshot discovery component for the data directory
#[derive(Debug)]
pub struct SnapshotDiscovery {
    data_dir: PathBuf,
    pattern: Regex,
    ignored_count: usize,
}

impl SnapshotDiscovery {
    /// Create a new discovery instance
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            pattern: Regex::new(SNAPSHOT_NAME_PATTERN).expect("snapshot name pattern is valid"),
            ignored_count: 0,
        }
    }

    /// Number of directory entries ignored by the last discovery pass
    pub fn ignored_count(&self) -> usize {
        self.ignored_count
    }

    /// Discover all snapshot files in the data directory
    ///
    /// The directory is flat; entries are expected to be named
    /// `<STATION_CODE>-<YYYY-MM-DD>.json`. Anything else is counted as
    /// ignored and left alone. Results are sorted by station then date so
    /// batch order is deterministic.
    pub async fn discover_snapshots(&mut self) -> Result<Vec<SnapshotFile>> {
        if !self.data_dir.exists() {
            return Err(RttError::DataDirNotFound {
                path: self.data_dir.clone(),
            });
        }

        debug!("Searching for snapshots in: {}", self.data_dir.display());

        let mut snapshots = Vec::new();
        self.ignored_count = 0;

        let mut dir = fs::read_dir(&self.data_dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                debug!("Skipping directory entry: {}", path.display());
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            match parse_snapshot_name(&self.pattern, &name) {
                Some((station, date)) => snapshots.push(SnapshotFile {
                    path,
                    station,
                    date,
                }),
                None => {
                    self.ignored_count += 1;
                    if name.ends_with(SNAPSHOT_EXTENSION) {
                        warn!("Ignoring file with unrecognised snapshot name: {}", name);
                    } else {
                        debug!("Ignoring non-snapshot entry: {}", name);
                    }
                }
            }
        }

        snapshots.sort_by(|a, b| (&a.station, a.date).cmp(&(&b.station, b.date)));

        debug!(
            "Found {} snapshot files ({} entries ignored)",
            snapshots.len(),
            self.ignored_count
        );

        Ok(snapshots)
    }
}

/// Extract the station code and date from a snapshot filename
fn parse_snapshot_name(pattern: &Regex, name: &str) -> Option<(String, NaiveDate)> {
    let captures = pattern.captures(name)?;
    let station = captures.get(1)?.as_str().to_string();
    // The regex only checks digit shape; chrono rejects impossible dates.
    let date = NaiveDate::parse_from_str(captures.get(2)?.as_str(), SNAPSHOT_DATE_FORMAT).ok()?;
    Some((station, date))
}
