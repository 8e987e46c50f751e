use clap::Parser;
use rtt_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(()) => {
            // Success - results have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("RTT Processor - Railway Punctuality Time Series Builder");
    println!("=======================================================");
    println!();
    println!("Convert Realtime Trains station schedule snapshots into InfluxDB");
    println!("time-series points recording arrival and departure delays per service.");
    println!();
    println!("USAGE:");
    println!("    rtt-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Import snapshot files from a data directory (main command)");
    println!("    fetch       Fetch today's schedule for one station and write it");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Import every snapshot under /data:");
    println!("    rtt-processor import");
    println!();
    println!("    # Import from a custom directory without writing anything:");
    println!("    rtt-processor import --data-dir ./snapshots --dry-run");
    println!();
    println!("    # Fetch today's schedule for Leeds and write it:");
    println!("    rtt-processor fetch LDS");
    println!();
    println!("For detailed help on any command, use:");
    println!("    rtt-processor <COMMAND> --help");
}
