use clap::Parser;
use sfcc_tools::io_utils::sfcc_cli_error;
use sfcc_tools::name::legacy_name_info;
use sfcc_tools::report::bool_label;
use sfcc_tools::vocab::compression_label;

/// Decode a benchmark filename into `size,name,curve,compression,bittransposed`.
#[derive(Parser)]
struct Args {
    /// File path; only the name is decoded
    file: String,
    /// Size to report; the file's size on disk when omitted
    size: Option<i64>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let info = legacy_name_info(&args.file).map_err(|e| sfcc_cli_error("decoding name", e))?;
    let size = match args.size {
        Some(size) => size,
        None => std::fs::metadata(&args.file).map_or(-1, |m| m.len() as i64),
    };
    println!(
        "{},{},{},{},{}",
        size,
        info.filename,
        info.sfc,
        compression_label(info.compression, info.bwt),
        bool_label(info.bitshuffle)
    );
    Ok(())
}
