use clap::Parser;
use log::info;
use std::path::PathBuf;
use sfcc_tools::config::TOOLS_ENV;
use sfcc_tools::io_utils::sfcc_cli_error;
use sfcc_tools::runner::{invocation, Direction};
use sfcc_tools::{BenchConfig, Compression, Sfc, ToolPaths};

/// Run one benchmark job with `sfccompress` or an external compressor.
#[derive(Parser)]
struct Args {
    /// compress or decompress
    command: Direction,
    /// raster, zorder, gray or hilbert
    sfc: Sfc,
    /// bwt or nobwt
    bwt: String,
    /// btr or nobtr
    bitshuffle: String,
    /// huff, gzip, bzip, lz4, lz77, lzo, lzw, rle or none
    compression: Compression,
    /// Original SFCC file
    file: String,
    /// JSON file overriding tool locations
    #[arg(long, env = TOOLS_ENV)]
    tools: Option<PathBuf>,
    /// Print the command instead of running it
    #[arg(long)]
    dry_run: bool,
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
    let tools = ToolPaths::load(args.tools.as_deref())
        .map_err(|e| sfcc_cli_error("loading tool paths", e))?;
    let config = BenchConfig::new(
        args.sfc,
        sfcc_tools::vocab::is_bwt_token(&args.bwt),
        sfcc_tools::vocab::is_bit_transpose_token(&args.bitshuffle),
        args.compression,
    );
    info!("{config}");
    let job = invocation(&tools, args.command, &config, &args.file)
        .map_err(|e| sfcc_cli_error("building command", e))?;
    if args.dry_run {
        println!("{job}");
        return Ok(());
    }
    job.run().map_err(|e| sfcc_cli_error("running job", e))?;
    Ok(())
}
