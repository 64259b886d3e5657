use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use sfcc_tools::io_utils::{io_cli_error, sfcc_cli_error};
use sfcc_tools::report::{du_to_csv, read_size_lines};

/// Turn `du` output over benchmark files into a size CSV on stdout.
#[derive(Parser)]
struct Args {
    /// File of `size<TAB>path` lines
    input: PathBuf,
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
    let file = File::open(&args.input).map_err(|e| io_cli_error("reading", &args.input, e))?;
    let lines = read_size_lines(file).map_err(|e| sfcc_cli_error("parsing size report", e))?;
    let rows = du_to_csv(&lines, io::stdout().lock()).map_err(|e| sfcc_cli_error("writing CSV", e))?;
    log::debug!("{rows} of {} lines written", lines.len());
    Ok(())
}
