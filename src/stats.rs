//! Value statistics of SFCC payloads.
//!
//! Every file sharing a prefix is summarised on one `;`-separated line, so a
//! single call covers a dataset and all of its reordered and compressed
//! variants.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::header::{CompressionType, SfccHeader};
use crate::report::bool_label;
use crate::SfccError;

/// Summary labels, in output order.
pub const DESCRIBE_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Count, mean, sample standard deviation, extremes and quartiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Description {
    /// Describe `values`. Every statistic but `count` is NaN for empty input.
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                p50: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if count > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    fn fields(&self) -> [String; 8] {
        [
            self.count.to_string(),
            self.mean.to_string(),
            self.std.to_string(),
            self.min.to_string(),
            self.p25.to_string(),
            self.p50.to_string(),
            self.p75.to_string(),
            self.max.to_string(),
        ]
    }
}

/// Linear interpolation between the closest ranks of a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Payload decoded into the values the statistics run over.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements {
    Bytes(Vec<u8>),
    Int16(Vec<i16>),
}

impl Elements {
    /// Compressed payloads, and 4-byte payloads, are read byte by byte.
    ///
    /// An uncompressed 2-byte payload of odd length is an error.
    pub fn from_payload(header: &SfccHeader, payload: Vec<u8>) -> Result<Self, SfccError> {
        if header.compression == CompressionType::None && header.dtype_nbytes == 2 {
            if payload.len() % 2 != 0 {
                return Err(SfccError::Header(format!(
                    "2-byte payload has odd length {}",
                    payload.len()
                )));
            }
            Ok(Elements::Int16(
                payload
                    .chunks_exact(2)
                    .map(|c| i16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ))
        } else {
            Ok(Elements::Bytes(payload))
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Elements::Bytes(_) => 1,
            Elements::Int16(_) => 2,
        }
    }

    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Elements::Bytes(v) => v.iter().map(|&x| f64::from(x)).collect(),
            Elements::Int16(v) => v.iter().map(|&x| f64::from(x)).collect(),
        }
    }

    fn histogram(&self) -> Vec<u64> {
        let mut counts = vec![0u64; 1 << (8 * self.width())];
        match self {
            Elements::Bytes(v) => v.iter().for_each(|&x| counts[usize::from(x)] += 1),
            Elements::Int16(v) => v.iter().for_each(|&x| counts[usize::from(x as u16)] += 1),
        }
        counts
    }

    /// Shannon entropy with logarithm base `2^(8 * width)`, in `0..=1`.
    pub fn entropy(&self) -> Result<f64, SfccError> {
        let histogram = self.histogram();
        let base = histogram.len();
        let distinct = histogram.iter().filter(|&&c| c > 0).count();
        if distinct > base {
            return Err(SfccError::Parse(format!(
                "{distinct} distinct values exceed entropy base {base}"
            )));
        }
        Ok(shannon_entropy(&histogram, base as f64))
    }
}

/// Entropy of a histogram in the given logarithm base.
pub fn shannon_entropy(histogram: &[u64], base: f64) -> f64 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let ln_base = base.ln();
    histogram
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln() / ln_base
        })
        .sum()
}

/// `x[i] - x[i-1]` for consecutive values.
pub fn differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Statistics of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats {
    /// Path up to and including `.sfcc`.
    pub original_name: String,
    pub header: SfccHeader,
    pub entropy: f64,
    pub values: Description,
    pub differences: Description,
}

impl FileStats {
    pub fn read(path: &Path) -> Result<Self, SfccError> {
        let mut reader = BufReader::new(File::open(path)?);
        let header = SfccHeader::read_from(&mut reader)?;
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        let elements = Elements::from_payload(&header, payload)?;
        let entropy = elements.entropy()?;
        let values = elements.to_f64();
        Ok(Self {
            original_name: original_name(&path.to_string_lossy()),
            entropy,
            values: Description::of(&values),
            differences: Description::of(&differences(&values)),
            header,
        })
    }

    pub fn row(&self) -> String {
        let mut fields = vec![
            self.original_name.clone(),
            self.header.curve.to_string(),
            bool_label(self.header.bit_transposed).to_string(),
            self.header.compression.to_string(),
            self.entropy.to_string(),
        ];
        fields.extend(self.values.fields());
        fields.extend(self.differences.fields());
        fields.join(";")
    }
}

/// Column header matching [`FileStats::row`].
pub fn header_row() -> String {
    let mut fields: Vec<String> = ["Filename", "sfc", "bit-transposed", "compression", "Total Entropy"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    fields.extend(DESCRIBE_LABELS.iter().map(|s| s.to_string()));
    fields.extend(DESCRIBE_LABELS.iter().map(|s| format!("diff {s}")));
    fields.join(";")
}

fn original_name(path: &str) -> String {
    match path.find(".sfcc") {
        Some(pos) => path[..pos + ".sfcc".len()].to_string(),
        None => format!("{path}.sfcc"),
    }
}

/// Every file whose path starts with `prefix`, sorted.
pub fn files_with_prefix(prefix: &str) -> Result<Vec<PathBuf>, SfccError> {
    let pattern = format!("{}*", glob::Pattern::escape(prefix));
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| SfccError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
