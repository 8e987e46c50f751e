//! Command implementations for the RTT processor CLI
//!
//! This module contains the command execution logic, logging setup, and
//! report generation for the `import` and `fetch` subcommands.

use crate::cli::args::{Args, Commands, FetchArgs, ImportArgs, OutputFormat};
use crate::config::Config;
use crate::constants::SNAPSHOT_DATE_FORMAT;
use crate::error::{Result, RttError};
use crate::fetch::RttClient;
use crate::models::ImportStats;
use crate::processor::SnapshotImporter;
use crate::processor::convert::convert_station;
use crate::processor::writer::{InfluxWriter, encode_point};
use chrono::Local;
use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main command runner for the RTT processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `import`: batch conversion of a snapshot directory
/// - `fetch`: live poll of one station for today's schedule
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Import(import_args)) => run_import(import_args).await,
        Some(Commands::Fetch(fetch_args)) => run_fetch(fetch_args).await,
        None => Err(RttError::Configuration {
            message: "no command specified; run with --help to list commands".to_string(),
        }),
    }
}

/// Execute the import command over a snapshot directory
async fn run_import(args: ImportArgs) -> Result<()> {
    setup_logging(args.quiet, args.get_log_level())?;

    info!("Starting snapshot import");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(args.config_file.as_deref(), args.influx_url.as_deref())?;
    debug!("Loaded configuration: {:?}", config);

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.import.data_dir.clone());

    let human = matches!(args.output_format, OutputFormat::Human);
    let importer = SnapshotImporter::new(data_dir, config.influx.clone())
        .with_dry_run(args.dry_run)
        .with_progress(args.show_progress() && human);

    let stats = importer.import().await?;

    generate_report(&args.output_format, &stats)
}

/// Execute the fetch command for a single station
async fn run_fetch(args: FetchArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.quiet, args.get_log_level())?;

    info!("Starting live station fetch");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(args.config_file.as_deref(), args.influx_url.as_deref())?;
    debug!("Loaded configuration: {:?}", config);

    let station = args.station_code();
    let date = Local::now().date_naive();
    let human = matches!(args.output_format, OutputFormat::Human);

    let client = RttClient::new(&config.rtt)?;

    if args.show_progress() && human {
        println!("{}", "Fetching station schedule".bright_green().bold());
        println!(
            "  {} {}",
            "Station:".bright_cyan(),
            station.bright_white()
        );
        println!(
            "  {} {}",
            "Date:".bright_cyan(),
            date.format(SNAPSHOT_DATE_FORMAT).to_string().bright_white()
        );
    }

    let snapshot = client.search_station(&station).await?;
    info!(
        "Fetched {} services for {}",
        snapshot.services().len(),
        station
    );

    let batch = convert_station(&snapshot, date)?;

    for record in &batch.degraded {
        warn!(
            "Service {} carried unparsable clock fields {:?}",
            record.service_uid, record.fields
        );
    }

    let points_written = if args.dry_run {
        if args.show_progress() && human {
            println!("\n{}", "Dry run, encoded points:".bright_yellow());
            for point in &batch.points {
                println!("{}", encode_point(point));
            }
        }
        0
    } else {
        let writer = InfluxWriter::new(config.influx.clone());
        writer.write_batch(&batch.points).await?
    };

    let stats = ImportStats {
        files_discovered: 1,
        files_imported: 1,
        services_converted: batch.points.len(),
        points_written,
        degraded_records: batch.degraded.len(),
        processing_time_ms: start_time.elapsed().as_millis(),
        ..Default::default()
    };

    if args.show_progress() && human {
        println!("\n{}", "Fetch Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Services converted:".bright_cyan(),
            stats.services_converted.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Points written:".bright_cyan(),
            stats.points_written.to_string().bright_white()
        );
        if stats.degraded_records > 0 {
            println!(
                "  {} {}",
                "Degraded records:".bright_cyan(),
                stats.degraded_records.to_string().bright_yellow()
            );
        }
    }

    generate_report(&args.output_format, &stats)
}

/// Set up structured logging based on CLI verbosity flags
fn setup_logging(quiet: bool, log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rtt_processor={}", log_level)));

    // Set up subscriber based on output format preference
    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
fn load_configuration(config_file: Option<&Path>, influx_url: Option<&str>) -> Result<Config> {
    info!("Loading configuration");

    if let Some(path) = config_file {
        info!("Using config file: {}", path.display());
    } else {
        info!("No config file specified, trying default location and environment");
    }

    let mut config = Config::load_layered(config_file)?;

    // Apply CLI argument overrides
    if let Some(url) = influx_url {
        config.influx.url = url.to_string();
    }

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Generate the final report in the requested output format
///
/// Human output is printed as the commands run; this handles the
/// machine-readable formats.
fn generate_report(format: &OutputFormat, stats: &ImportStats) -> Result<()> {
    match format {
        OutputFormat::Human => Ok(()),
        OutputFormat::Json => generate_json_report(stats),
        OutputFormat::Csv => generate_csv_report(stats),
    }
}

/// Generate JSON report for machine consumption
fn generate_json_report(stats: &ImportStats) -> Result<()> {
    let json_stats = serde_json::json!({
        "files_discovered": stats.files_discovered,
        "files_imported": stats.files_imported,
        "files_skipped": stats.files_skipped,
        "services_converted": stats.services_converted,
        "points_written": stats.points_written,
        "degraded_records": stats.degraded_records,
        "processing_time_ms": stats.processing_time_ms,
    });

    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    Ok(())
}

/// Generate CSV report for data analysis
fn generate_csv_report(stats: &ImportStats) -> Result<()> {
    println!("metric,value");
    println!("files_discovered,{}", stats.files_discovered);
    println!("files_imported,{}", stats.files_imported);
    println!("files_skipped,{}", stats.files_skipped);
    println!("services_converted,{}", stats.services_converted);
    println!("points_written,{}", stats.points_written);
    println!("degraded_records,{}", stats.degraded_records);
    println!("processing_time_ms,{}", stats.processing_time_ms);

    Ok(())
}
