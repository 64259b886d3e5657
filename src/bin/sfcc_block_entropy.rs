use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use sfcc_tools::entropy::{block_entropy_file, entropy_name_info, write_entropy_csv, DEFAULT_BLOCK_SIZE};
use sfcc_tools::io_utils::{io_cli_error, sfcc_cli_error};

/// Write the moving block entropy of each file to one CSV.
#[derive(Parser)]
struct Args {
    /// Files to analyse
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Block size in bytes
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
    /// Output CSV; defaults to the first file with `.csv` appended
    #[arg(long)]
    output: Option<PathBuf>,
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
    let output = args.output.clone().unwrap_or_else(|| {
        let mut name = args.files[0].clone().into_os_string();
        name.push(".csv");
        PathBuf::from(name)
    });

    let pb = sfcc_tools::progress_bar(args.files.len() as u64, "Calculating moving entropy");
    let mut rows = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let entropy = block_entropy_file(path, args.block_size)
            .map_err(|e| sfcc_cli_error(&format!("reading {}", path.display()), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        rows.push((entropy_name_info(&name), entropy));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let file = File::create(&output).map_err(|e| io_cli_error("creating", &output, e))?;
    write_entropy_csv(&rows, file).map_err(|e| sfcc_cli_error("writing CSV", e))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
