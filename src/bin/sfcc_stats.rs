use clap::Parser;
use log::info;
use sfcc_tools::io_utils::{sfcc_cli_error, simple_cli_error};
use sfcc_tools::stats::{files_with_prefix, header_row, FileStats};

/// Print value statistics for every file starting with a prefix.
///
/// One call covers a dataset and all of its reordered and compressed
/// variants.
#[derive(Parser)]
struct Args {
    /// Path prefix, e.g. `data/dem.sfcc`
    #[arg(required_unless_present = "header")]
    prefix: Option<String>,
    /// Only print the column header
    #[arg(long)]
    header: bool,
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
    println!("{}", header_row());
    if args.header {
        return Ok(());
    }
    let prefix = args
        .prefix
        .ok_or_else(|| simple_cli_error("missing file prefix"))?;
    let files = files_with_prefix(&prefix).map_err(|e| sfcc_cli_error("listing files", e))?;
    if files.is_empty() {
        return Err(simple_cli_error(&format!("no files start with '{prefix}'")).into());
    }
    info!("Found {} files", files.len());
    let pb = sfcc_tools::progress_bar(files.len() as u64, "Computing statistics");
    for path in &files {
        let stats = FileStats::read(path)
            .map_err(|e| sfcc_cli_error(&format!("reading {}", path.display()), e))?;
        pb.suspend(|| println!("{}", stats.row()));
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(())
}
