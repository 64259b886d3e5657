use clap::Parser;
use log::info;
use std::path::PathBuf;
use sfcc_tools::convert::geotiff_to_sfcc;
use sfcc_tools::io_utils::{extension_error, has_tiff_extension, sfcc_cli_error};

/// Convert a square, power-of-two GeoTIFF into a raw SFCC file.
#[derive(Parser)]
struct Args {
    /// Input .tif file; the output is written next to it as .sfcc
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
    if !has_tiff_extension(&args.input) {
        return Err(extension_error(&args.input).into());
    }
    info!("Opening {}", args.input.display());
    let converted = geotiff_to_sfcc(&args.input)
        .map_err(|e| sfcc_cli_error(&format!("converting {}", args.input.display()), e))?;
    info!("Header: {:02x?}", converted.header.encode());
    info!("Max= {}", converted.raster.max);
    info!("Min= {}", converted.raster.min);
    println!("{}", converted.output.display());
    Ok(())
}
