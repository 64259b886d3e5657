//! Build and run the compressor invocations of one benchmark job.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use log::{debug, info};

use crate::bench_config::BenchConfig;
use crate::config::ToolPaths;
use crate::vocab::Compression;
use crate::SfccError;

/// Whether a job compresses or decompresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl std::str::FromStr for Direction {
    type Err = SfccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compress" => Ok(Direction::Compress),
            "decompress" => Ok(Direction::Decompress),
            other => Err(SfccError::Parse(format!("invalid command: {other}"))),
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &std::path::Path, args: Vec<String>) -> Self {
        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// Run to completion, failing on a non-zero exit.
    pub fn run(&self) -> Result<(), SfccError> {
        info!("running {self}");
        let status = Command::new(&self.program).args(&self.args).status()?;
        debug!("{} exited with {status}", self.program.display());
        if status.success() {
            Ok(())
        } else {
            Err(SfccError::Subprocess {
                command: self.to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Command producing `config`'s output from the original file.
pub fn compress_invocation(tools: &ToolPaths, config: &BenchConfig, original: &str) -> Invocation {
    let input = config.previous().expected_filename(original);
    let program = tools.program_for(config.compression);
    match config.compression {
        Compression::Bzip2 => Invocation::new(program, strings(["-z", "-k", "-9", "-f", input.as_str()])),
        Compression::Gzip => Invocation::new(program, strings(["-k", "-9", "-f", input.as_str()])),
        Compression::Lz4 => {
            let output = format!("{input}.lz4");
            Invocation::new(program, strings(["-9", "-f", input.as_str(), output.as_str()]))
        }
        Compression::Lzo => {
            let output = format!("{input}.lzo");
            Invocation::new(program, strings(["-9", "-f", "-o", output.as_str(), input.as_str()]))
        }
        _ => {
            let mut args = vec!["compress".to_string()];
            if let Some(native) = config.sfccompress_args() {
                args.extend(native.to_args());
            }
            args.push(input);
            Invocation::new(program, args)
        }
    }
}

/// Command restoring `config`'s input from its output.
pub fn decompress_invocation(tools: &ToolPaths, config: &BenchConfig, original: &str) -> Invocation {
    let expected = config.expected_filename(original);
    let input = config.previous().expected_filename(original);
    let program = tools.program_for(config.compression);
    match config.compression {
        Compression::Bzip2 | Compression::Gzip => {
            Invocation::new(program, strings(["-d", "-k", "-f", expected.as_str()]))
        }
        Compression::Lz4 => Invocation::new(program, strings(["-d", "-f", expected.as_str(), input.as_str()])),
        Compression::Lzo => Invocation::new(program, strings(["-d", "-f", "-o", input.as_str(), expected.as_str()])),
        _ => Invocation::new(program, strings(["decompress", expected.as_str()])),
    }
}

/// Invocation for one job in the given direction.
pub fn invocation(
    tools: &ToolPaths,
    direction: Direction,
    config: &BenchConfig,
    original: &str,
) -> Result<Invocation, SfccError> {
    if !config.is_valid() {
        return Err(SfccError::Config(format!("invalid configuration: {config}")));
    }
    Ok(match direction {
        Direction::Compress => compress_invocation(tools, config, original),
        Direction::Decompress => decompress_invocation(tools, config, original),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Sfc;

    #[test]
    fn internal_scheme_calls_sfccompress() {
        let tools = ToolPaths::default();
        let c = BenchConfig::new(Sfc::Hilbert, true, true, Compression::Lz77);
        let inv = compress_invocation(&tools, &c, "dem.sfcc");
        assert_eq!(
            inv.to_string(),
            "sfccompress compress -s HILBERT -c BZIP_LZ77 -b dem.sfcc"
        );
        let inv = decompress_invocation(&tools, &c, "dem.sfcc");
        assert_eq!(inv.to_string(), "sfccompress decompress dem.sfcc.hbrt.btr.bwt.lz77");
    }

    #[test]
    fn external_scheme_reads_reordered_file() {
        let tools = ToolPaths::default();
        let c = BenchConfig::new(Sfc::Gray, false, true, Compression::Gzip);
        assert_eq!(
            compress_invocation(&tools, &c, "dem.sfcc").to_string(),
            "gzip -k -9 -f dem.sfcc.gry.btr"
        );
        assert_eq!(
            decompress_invocation(&tools, &c, "dem.sfcc").to_string(),
            "gzip -d -k -f dem.sfcc.gry.btr.gz"
        );

        let c = BenchConfig::new(Sfc::ZOrder, true, false, Compression::Lz4);
        assert_eq!(
            compress_invocation(&tools, &c, "dem.sfcc").to_string(),
            "lz4 -9 -f dem.sfcc.mrtn.bwt dem.sfcc.mrtn.bwt.lz4"
        );
        assert_eq!(
            decompress_invocation(&tools, &c, "dem.sfcc").to_string(),
            "lz4 -d -f dem.sfcc.mrtn.bwt.lz4 dem.sfcc.mrtn.bwt"
        );

        let c = BenchConfig::new(Sfc::Raster, false, false, Compression::Lzo);
        assert_eq!(
            compress_invocation(&tools, &c, "dem.sfcc").to_string(),
            "lzo -9 -f -o dem.sfcc.lzo dem.sfcc"
        );
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let tools = ToolPaths::default();
        let c = BenchConfig::new(Sfc::Raster, true, false, Compression::Rle);
        assert!(invocation(&tools, Direction::Compress, &c, "dem.sfcc").is_err());
    }
}
