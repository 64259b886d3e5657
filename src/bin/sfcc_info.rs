use clap::Parser;
use std::path::PathBuf;
use sfcc_tools::info::FileInfo;
use sfcc_tools::io_utils::sfcc_cli_error;
use sfcc_tools::SfccError;

/// Print the header and a payload sample of an SFCC file.
#[derive(Parser)]
struct Args {
    /// SFCC file to inspect
    input: PathBuf,
    /// Print JSON instead of the text summary
    #[arg(long)]
    json: bool,
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
    let info = FileInfo::read(&args.input).map_err(|e| match e {
        SfccError::Io(io) => sfcc_tools::io_utils::io_cli_error("reading", &args.input, io),
        other => sfcc_cli_error(&format!("reading {}", args.input.display()), other),
    })?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{info}");
    }
    Ok(())
}
