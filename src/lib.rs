//! Tooling around the `sfccompress` space-filling-curve compressor.
//!
//! The crate reads and writes SFCC containers, converts source datasets into
//! them, plans and runs the compression benchmark, and turns its job logs
//! and file listings into CSV reports.

pub mod bench_config;
pub mod config;
pub mod convert;
pub mod entropy;
mod error;
pub mod header;
pub mod info;
pub mod io_utils;
pub mod joblog;
pub mod name;
pub mod plan;
pub mod process;
pub mod report;
pub mod runner;
pub mod stats;
pub mod vocab;

#[cfg(feature = "hdf5")]
pub mod hdf5_source;

pub use bench_config::BenchConfig;
pub use config::ToolPaths;
pub use error::SfccError;
pub use header::{CompressionType, CurveType, SfccHeader};
pub use name::SfccName;
pub use vocab::{Compression, Sfc};

/// Route `log` output to stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_secs();
    // Several tests in one process may race to install the logger.
    let _ = builder.try_init();
}

/// Progress bar used by the binaries that loop over many files.
pub fn progress_bar(len: u64, message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len);
    if let Ok(style) = indicatif::ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
