use clap::Parser;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use sfcc_tools::io_utils::{io_cli_error, sfcc_cli_error};
use sfcc_tools::joblog::{read_joblog_file, JobRecord};
use sfcc_tools::process::{aggregate, JobLogs};
use sfcc_tools::report::read_size_lines;

/// Join file sizes and job runtimes of a benchmark run into one CSV.
#[derive(Parser)]
struct Args {
    /// `du` output over every produced file
    du_results: PathBuf,
    /// Job log of sfccompress compression jobs
    compress_log: PathBuf,
    /// Job log of external compressor compression jobs
    compress_external_log: PathBuf,
    /// Job log of sfccompress decompression jobs
    decompress_log: PathBuf,
    /// Job log of external compressor decompression jobs
    decompress_external_log: PathBuf,
    /// Main results CSV
    #[arg(long, default_value = "results.csv")]
    output: PathBuf,
    /// Rows whose dataset name contains this go to `--split-output`
    #[arg(long, requires = "split_output")]
    split_pattern: Option<String>,
    #[arg(long, requires = "split_pattern")]
    split_output: Option<PathBuf>,
    /// File of dataset names, one per line, left out of the main CSV
    #[arg(long)]
    ignore: Option<PathBuf>,
    /// Report every configuration without exactly this many results
    #[arg(long)]
    expected_count: Option<usize>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn read_log(path: &Path) -> Result<Vec<JobRecord>, Box<dyn std::error::Error>> {
    Ok(read_joblog_file(path, true)
        .map_err(|e| sfcc_cli_error(&format!("reading {}", path.display()), e))?)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    sfcc_tools::init_logging();
    let args = Args::parse();

    let du = File::open(&args.du_results).map_err(|e| io_cli_error("reading", &args.du_results, e))?;
    let sizes = read_size_lines(du).map_err(|e| sfcc_cli_error("parsing size report", e))?;
    let compress = read_log(&args.compress_log)?;
    let compress_external = read_log(&args.compress_external_log)?;
    let decompress = read_log(&args.decompress_log)?;
    let decompress_external = read_log(&args.decompress_external_log)?;

    let mut results = aggregate(
        &sizes,
        JobLogs {
            compress: &compress,
            compress_external: &compress_external,
            decompress: &decompress,
            decompress_external: &decompress_external,
        },
    )
    .map_err(|e| sfcc_cli_error("aggregating results", e))?;

    if let (Some(pattern), Some(path)) = (&args.split_pattern, &args.split_output) {
        let file = File::create(path).map_err(|e| io_cli_error("creating", path, e))?;
        let rows = results
            .write_csv(file, |n| n.filename.contains(pattern.as_str()))
            .map_err(|e| sfcc_cli_error("writing CSV", e))?;
        info!("Wrote {rows} rows to {}", path.display());
    }

    if let Some(path) = &args.ignore {
        info!("Removing files to ignore");
        let text = fs::read_to_string(path).map_err(|e| io_cli_error("reading", path, e))?;
        let ignore: HashSet<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        results.remove_filenames(&ignore);
    }

    let file = File::create(&args.output).map_err(|e| io_cli_error("creating", &args.output, e))?;
    let pattern = args.split_pattern.as_deref();
    let rows = results
        .write_csv(file, |n| pattern.map_or(true, |p| !n.filename.contains(p)))
        .map_err(|e| sfcc_cli_error("writing CSV", e))?;
    info!("Wrote {rows} rows to {}", args.output.display());

    if let Some(expected) = args.expected_count {
        for (config, count) in results.config_counts() {
            if count != expected {
                warn!("{config}: {count}");
            }
        }
    }
    Ok(())
}
