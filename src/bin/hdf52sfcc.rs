use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use sfcc_tools::convert::{cube_origins, split_cubes, CubeSource};
use sfcc_tools::hdf5_source::{Hdf5Cube, DEFAULT_DATASET, DEFAULT_GROUP};
use sfcc_tools::io_utils::{io_cli_error, sfcc_cli_error, simple_cli_error};

/// Split the first channel of a 4-D HDF5 dataset into SFCC cubes.
#[derive(Parser)]
struct Args {
    /// Input HDF5 file
    input: PathBuf,
    /// Directory receiving `<stem>_<t>_<x>_<y>.sfcc`
    #[arg(long, default_value = "chunks")]
    outdir: PathBuf,
    /// Cube sidelength, a power of two
    #[arg(long, default_value_t = 128)]
    side: usize,
    #[arg(long, default_value = DEFAULT_GROUP)]
    group: String,
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,
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
    info!("Opening {}", args.input.display());
    let source = Hdf5Cube::open(&args.input, &args.group, &args.dataset)
        .map_err(|e| sfcc_cli_error(&format!("opening {}", args.input.display()), e))?;
    info!("Shape: {:?}", source.dataset_shape());
    info!("Chunk shape: {:?}", source.chunks());
    info!("Data Type: {:?}", source.descriptor());

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| simple_cli_error("input file has no name"))?
        .to_string();
    fs::create_dir_all(&args.outdir).map_err(|e| io_cli_error("creating", &args.outdir, e))?;

    let total = cube_origins(source.shape(), args.side).len();
    let pb = sfcc_tools::progress_bar(total as u64, "Writing cubes");
    let summary = split_cubes(&source, &stem, &args.outdir, args.side, |path| {
        pb.set_message(path.display().to_string());
        pb.inc(1);
    })
    .map_err(|e| sfcc_cli_error("splitting dataset", e))?;
    pb.finish_and_clear();
    info!(
        "Wrote {} cubes, skipped {} existing",
        summary.written, summary.skipped
    );
    Ok(())
}
