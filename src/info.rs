//! Header and sample summary of a single SFCC file.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::header::{CompressionType, SfccHeader, BASE_HEADER_SIZE};
use crate::SfccError;

/// Number of payload bytes shown by [`FileInfo`].
pub const SAMPLE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub header: SfccHeader,
    pub sidelength: u64,
    pub file_size: u64,
    /// Size of an uncompressed file with this header.
    pub expected_size: u64,
    /// Payload offset of the sample.
    pub sample_offset: u64,
    pub sample: Vec<u8>,
}

impl FileInfo {
    /// Read the header of `path` and a short payload sample.
    ///
    /// Uncompressed files must be exactly header plus payload long.
    pub fn read(path: &Path) -> Result<Self, SfccError> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let header = SfccHeader::read_from(&mut reader)?;

        let sidelength = header
            .sidelength()
            .ok_or_else(|| SfccError::Header(format!("sidelength 2^{} overflows", header.k)))?;
        let expected_size = header
            .expected_payload_len()
            .and_then(|n| n.checked_add(BASE_HEADER_SIZE as u64))
            .ok_or_else(|| SfccError::Header("array size overflows".into()))?;

        if header.compression == CompressionType::None && expected_size != file_size {
            return Err(SfccError::Header(format!(
                "filesize is not as expected: expected {expected_size} bytes but got {file_size} bytes instead"
            )));
        }

        let sample_offset = two_fifths(expected_size);
        std::io::copy(&mut (&mut reader).take(sample_offset), &mut std::io::sink())?;
        let mut sample = Vec::with_capacity(SAMPLE_LEN);
        reader.take(SAMPLE_LEN as u64).read_to_end(&mut sample)?;

        Ok(Self {
            path: path.to_path_buf(),
            header,
            sidelength,
            file_size,
            expected_size,
            sample_offset,
            sample,
        })
    }
}

/// `floor(n * 2 / 5)` without overflowing.
fn two_fifths(n: u64) -> u64 {
    n / 5 * 2 + n % 5 * 2 / 5
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "#".repeat(40);
        writeln!(f, "Opening {}", self.path.display())?;
        writeln!(f, "{rule}")?;
        writeln!(f, "#    File details")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "# Number of Dimensions:\t{}", self.header.ndims)?;
        writeln!(f, "# Sidelength:\t\t{}\t[2^{}]", self.sidelength, self.header.k)?;
        writeln!(f, "# DType bytes:\t{}", self.header.dtype_nbytes)?;
        writeln!(f, "# SFC Type:\t\t{}", self.header.curve)?;
        writeln!(f, "# Bit-transposed:\t{}", self.header.bit_transposed)?;
        writeln!(f, "# CompressionType:\t{}", self.header.compression)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "#")?;
        writeln!(
            f,
            "# Samples of data [{} {}]",
            self.sample_offset,
            self.sample_offset + SAMPLE_LEN as u64
        )?;
        let hex: Vec<String> = self.sample.iter().map(|b| format!("{b:02X}")).collect();
        writeln!(f, "# ... {} ...", hex.join(" "))?;
        write!(f, "{rule}")
    }
}
