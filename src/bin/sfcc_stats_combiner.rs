use clap::Parser;
use log::warn;
use std::fs::File;
use std::path::PathBuf;
use sfcc_tools::io_utils::{io_cli_error, sfcc_cli_error};
use sfcc_tools::report::combine_stats;

/// Replace rows of a statistics CSV with those of a newer run.
#[derive(Parser)]
struct Args {
    original: PathBuf,
    new: PathBuf,
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    sfcc_tools::init_logging();
    let args = Args::parse();
    let original = File::open(&args.original).map_err(|e| io_cli_error("reading", &args.original, e))?;
    let new = File::open(&args.new).map_err(|e| io_cli_error("reading", &args.new, e))?;
    let output = File::create(&args.output).map_err(|e| io_cli_error("creating", &args.output, e))?;
    let report = combine_stats(original, new, output).map_err(|e| sfcc_cli_error("combining", e))?;
    for key in &report.unreplaced_bwt {
        warn!("Failed to replace BWT line [{key}]");
    }
    for key in &report.unmatched_new {
        warn!("Failed to replace [{key}]");
    }
    Ok(())
}
