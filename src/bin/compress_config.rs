use clap::Parser;
use sfcc_tools::plan::native_job_lines;

/// List every curve and internal scheme for each file, tab separated, for
/// the parallel job runner.
#[derive(Parser)]
struct Args {
    files: Vec<String>,
}

fn main() {
    let args = Args::parse();
    for line in native_job_lines(&args.files) {
        println!("{line}");
    }
}
