use clap::Parser;
use std::io;
use std::path::PathBuf;
use sfcc_tools::io_utils::sfcc_cli_error;
use sfcc_tools::joblog::read_joblog_file;
use sfcc_tools::report::joblog_to_csv;

/// Turn a parallel job log of `sfccompress` runs into a runtime CSV on stdout.
#[derive(Parser)]
struct Args {
    /// Job log written by `parallel --joblog`
    input: PathBuf,
    /// The log has no header line
    #[arg(long)]
    no_header: bool,
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
    let records = read_joblog_file(&args.input, !args.no_header)
        .map_err(|e| sfcc_cli_error(&format!("reading {}", args.input.display()), e))?;
    joblog_to_csv(&records, io::stdout().lock()).map_err(|e| sfcc_cli_error("writing CSV", e))?;
    Ok(())
}
