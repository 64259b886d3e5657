//! One point of the benchmark's configuration space.

use std::fmt;

use serde::Serialize;

use crate::header::{CompressionType, CurveType};
use crate::vocab::{Compression, Sfc};

/// Curve, transforms and compression applied to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BenchConfig {
    pub sfc: Sfc,
    pub bwt: bool,
    pub bitshuffle: bool,
    pub compression: Compression,
}

/// Arguments of one `sfccompress compress` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfccompressArgs {
    pub curve: CurveType,
    pub compression: CompressionType,
    pub bit_transpose: bool,
}

impl SfccompressArgs {
    pub fn to_args(self) -> Vec<String> {
        let mut args = vec![
            "-s".to_string(),
            self.curve.arg().to_string(),
            "-c".to_string(),
            self.compression.arg().to_string(),
        ];
        if self.bit_transpose {
            args.push("-b".to_string());
        }
        args
    }
}

impl BenchConfig {
    pub const ORIGINAL: BenchConfig = BenchConfig {
        sfc: Sfc::Raster,
        bwt: false,
        bitshuffle: false,
        compression: Compression::None,
    };

    pub fn new(sfc: Sfc, bwt: bool, bitshuffle: bool, compression: Compression) -> Self {
        Self {
            sfc,
            bwt,
            bitshuffle,
            compression,
        }
    }

    /// BWT only exists alone, in front of LZ77/LZW inside `sfccompress`, or
    /// piped into lz4.
    pub fn is_valid(&self) -> bool {
        !self.bwt
            || matches!(
                self.compression,
                Compression::None | Compression::Lz77 | Compression::Lzw | Compression::Lz4
            )
    }

    pub fn is_original(&self) -> bool {
        *self == Self::ORIGINAL
    }

    /// Compact `.`-joined name, e.g. `hbrt.btr.bwt.lz77`.
    pub fn short_name(&self) -> String {
        let mut parts = vec![self.sfc.token()];
        if self.bitshuffle {
            parts.push("btr");
        }
        if self.bwt {
            parts.push("bwt");
        }
        parts.push(self.compression.token());
        parts.join(".")
    }

    /// Configuration whose output file is this configuration's input.
    pub fn previous(&self) -> BenchConfig {
        if self.compression.is_external() {
            BenchConfig {
                compression: Compression::None,
                ..*self
            }
        } else {
            Self::ORIGINAL
        }
    }

    /// Name of the file this configuration produces from `original`.
    pub fn expected_filename(&self, original: &str) -> String {
        let mut name = original.to_string();
        if let Some(ext) = self.sfc.extension() {
            name.push('.');
            name.push_str(ext);
        }
        if self.bitshuffle {
            name.push_str(".btr");
        }
        if self.bwt {
            name.push_str(".bwt");
        }
        if let Some(ext) = self.compression.extension() {
            name.push('.');
            name.push_str(ext);
        }
        name
    }

    /// `sfccompress` arguments, `None` for schemes handled by external tools.
    pub fn sfccompress_args(&self) -> Option<SfccompressArgs> {
        let compression = match (self.compression, self.bwt) {
            (Compression::None, false) => CompressionType::None,
            (Compression::None, true) => CompressionType::Bwt,
            (Compression::Lz77, true) => CompressionType::BwtLz77,
            (Compression::Lzw, true) => CompressionType::BwtLzw,
            (Compression::Lz77, false) => CompressionType::Lz77,
            (Compression::Lzw, false) => CompressionType::Lzw,
            (Compression::Huffman, false) => CompressionType::Huffman,
            (Compression::Rle, false) => CompressionType::Rle,
            _ => return None,
        };
        Some(SfccompressArgs {
            curve: self.sfc.curve_type(),
            compression,
            bit_transpose: self.bitshuffle,
        })
    }

    /// `[sfc, bwt|nobwt, btr|nobtr, compression]` as taken by `sfcc_compress`.
    pub fn driver_args(&self) -> [&'static str; 4] {
        [
            self.sfc.driver_token(),
            if self.bwt { "bwt" } else { "nobwt" },
            if self.bitshuffle { "btr" } else { "nobtr" },
            self.compression.driver_token(),
        ]
    }

    /// Every valid configuration, curves outermost.
    pub fn all_valid() -> Vec<BenchConfig> {
        let mut out = Vec::new();
        for sfc in Sfc::ALL {
            for compression in Compression::ALL {
                for bwt in [true, false] {
                    for bitshuffle in [true, false] {
                        let config = BenchConfig::new(sfc, bwt, bitshuffle, compression);
                        if config.is_valid() {
                            out.push(config);
                        }
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for BenchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bwt={} bitshuffle={} {}",
            self.sfc, self.bwt, self.bitshuffle, self.compression
        )
    }
}
