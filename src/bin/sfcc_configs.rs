use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use sfcc_tools::io_utils::io_cli_error;
use sfcc_tools::plan::ConfigTree;
use sfcc_tools::Sfc;

/// Write `sfcc_compress` job lines for every benchmark configuration.
///
/// Jobs are ordered so each one only reads files produced by earlier jobs.
#[derive(Parser)]
struct Args {
    /// Job list to write
    output: PathBuf,
    /// Restrict to one curve (raster, zorder, gray, hilbert or an alias)
    #[arg(long)]
    sfc: Option<Sfc>,
    /// Original files to benchmark
    #[arg(required = true)]
    files: Vec<String>,
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
    let tree = match args.sfc {
        Some(sfc) => ConfigTree::for_sfc(sfc),
        None => ConfigTree::build(),
    };
    info!("Processing {} files", args.files.len());
    info!("Saving output to {}", args.output.display());
    print!("{}", tree.render());

    let file = File::create(&args.output).map_err(|e| io_cli_error("creating", &args.output, e))?;
    let mut out = BufWriter::new(file);
    for line in tree.driver_job_lines(&args.files) {
        writeln!(out, "{line}").map_err(|e| io_cli_error("writing", &args.output, e))?;
    }
    out.flush().map_err(|e| io_cli_error("writing", &args.output, e))?;
    Ok(())
}
