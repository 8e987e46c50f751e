//! Snapshot import engine.
//!
//! Orchestrates the batch workflow: discover snapshot files, parse and
//! convert each one, and write one batch of points per file. Files are
//! handled strictly one after another; a write for an earlier file is
//! already flushed when a later file aborts the run.

pub mod convert;
pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::{SnapshotDiscovery, SnapshotFile};
use self::writer::InfluxWriter;

use crate::config::InfluxConfig;
use crate::error::{Result, RttError};
use crate::models::{ImportStats, Station};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

/// Main importer for snapshot-to-InfluxDB conversion
#[derive(Debug)]
pub struct SnapshotImporter {
    data_dir: PathBuf,
    writer: InfluxWriter,
    dry_run: bool,
    show_progress: bool,
}

/// Per-file conversion result
struct FileOutcome {
    converted: usize,
    written: usize,
    degraded: usize,
}

impl SnapshotImporter {
    /// Create a new importer over a data directory
    pub fn new(data_dir: PathBuf, influx: InfluxConfig) -> Self {
        Self {
            data_dir,
            writer: InfluxWriter::new(influx),
            dry_run: false,
            show_progress: true,
        }
    }

    /// Convert without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Toggle console progress output
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Main import entry point
    pub async fn import(&self) -> Result<ImportStats> {
        let start_time = Instant::now();

        if self.show_progress {
            println!("{}", "Starting snapshot import".bright_green().bold());
            println!("  {} {}", "Data dir:".bright_cyan(), self.data_dir.display());
            println!(
                "  {} {}",
                "Mode:".bright_cyan(),
                if self.dry_run { "dry-run" } else { "write" }
            );
            println!("\n{}", "Discovering snapshot files...".bright_yellow());
        }

        let mut discovery = SnapshotDiscovery::new(self.data_dir.clone());
        let snapshots = discovery.discover_snapshots().await?;

        let mut stats = ImportStats {
            files_discovered: snapshots.len(),
            files_skipped: discovery.ignored_count(),
            ..Default::default()
        };

        if self.show_progress {
            println!(
                "  {} {} snapshot files ({} entries ignored)",
                "Found".bright_green(),
                snapshots.len().to_string().bright_white().bold(),
                discovery.ignored_count()
            );
        }

        if snapshots.is_empty() {
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        let progress_bar = if self.show_progress {
            let pb = ProgressBar::new(snapshots.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for snapshot in &snapshots {
            if let Some(pb) = &progress_bar {
                pb.set_message(format!("{} {}", snapshot.station, snapshot.date));
            }

            match self.import_snapshot(snapshot).await {
                Ok(outcome) => {
                    stats.files_imported += 1;
                    stats.services_converted += outcome.converted;
                    stats.points_written += outcome.written;
                    stats.degraded_records += outcome.degraded;
                }
                // An unreadable file is reported and skipped; the batch
                // carries on with the next snapshot.
                Err(RttError::Io(error)) => {
                    warn!(
                        "Skipping unreadable snapshot {}: {}",
                        snapshot.path.display(),
                        error
                    );
                    stats.files_skipped += 1;
                }
                Err(error) => {
                    if let Some(pb) = &progress_bar {
                        pb.finish_and_clear();
                    }
                    return Err(error);
                }
            }

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();

        if self.show_progress {
            println!("\n{}", "Import Summary".bright_green().bold());
            println!(
                "  {} {}ms",
                "Time elapsed:".bright_cyan(),
                stats.processing_time_ms.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "Files imported:".bright_cyan(),
                stats.files_imported.to_string().bright_white()
            );
            if stats.files_skipped > 0 {
                println!(
                    "  {} {}",
                    "Files skipped:".bright_red(),
                    stats.files_skipped.to_string().bright_red().bold()
                );
            }
            println!(
                "  {} {}",
                "Services converted:".bright_cyan(),
                stats.services_converted.to_string().bright_white().bold()
            );
            println!(
                "  {} {}",
                "Points written:".bright_cyan(),
                stats.points_written.to_string().bright_white().bold()
            );
            if stats.degraded_records > 0 {
                println!(
                    "  {} {}",
                    "Degraded records:".bright_cyan(),
                    stats.degraded_records.to_string().bright_yellow().bold()
                );
            }
        }

        Ok(stats)
    }

    /// Import one snapshot file as one batch write
    async fn import_snapshot(&self, snapshot: &SnapshotFile) -> Result<FileOutcome> {
        let raw = tokio::fs::read(&snapshot.path).await?;

        let station: Station =
            serde_json::from_slice(&raw).map_err(|error| RttError::SnapshotParseFailed {
                path: snapshot.path.clone(),
                reason: error.to_string(),
            })?;

        let batch = convert::convert_station(&station, snapshot.date)?;
        for record in &batch.degraded {
            warn!(
                "Degraded clock values for service {:?} in {}: {}",
                record.service_uid,
                snapshot.path.display(),
                record.fields.join(", ")
            );
        }

        let written = if self.dry_run || batch.points.is_empty() {
            0
        } else {
            self.writer.write_batch(&batch.points).await?
        };

        debug!(
            "Imported {}: {} services converted, {} points written",
            snapshot.path.display(),
            batch.points.len(),
            written
        );

        Ok(FileOutcome {
            converted: batch.points.len(),
            written,
            degraded: batch.degraded.len(),
        })
    }
}
