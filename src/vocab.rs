//! Curve and compression vocabulary shared by the benchmark tools.
//!
//! Filenames, job lists and command lines spell the same choice in several
//! ways (`hilbert`, `hbrt`, `HILBERT`), so every lookup goes through the alias
//! tables below and is case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::header::CurveType;
use crate::SfccError;

const RASTER: &[&str] = &["raster", "row_major", "rstr"];
const ZORDER: &[&str] = &["zorder", "morton", "mrtn"];
const GRAY: &[&str] = &["gray", "gray_code", "gry"];
const HILBERT: &[&str] = &["hilbert", "hbrt"];

const NONE: &[&str] = &["none"];
const HUFFMAN: &[&str] = &["huffman", "huff", "hff"];
const GZIP: &[&str] = &["gzip", "gz"];
const BZIP2: &[&str] = &["bzip", "bzip2", "bz2"];
const LZ4: &[&str] = &["lz4"];
const LZ77: &[&str] = &["lz77", "bzip_lz77"];
const LZO: &[&str] = &["lzo"];
const LZW: &[&str] = &["lzw", "bzip_lzw"];
const RLE: &[&str] = &["rle"];

const BWT: &[&str] = &["bwt", "bzip_lz77", "bzip_lzw"];
const BIT_TRANSPOSE: &[&str] = &["btr", "-b"];

/// Space-filling curve used to reorder a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Sfc {
    Raster,
    ZOrder,
    Gray,
    Hilbert,
}

impl Sfc {
    pub const ALL: [Sfc; 4] = [Sfc::Raster, Sfc::ZOrder, Sfc::Gray, Sfc::Hilbert];

    pub fn from_alias(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        let s = s.as_str();
        if RASTER.contains(&s) {
            Some(Sfc::Raster)
        } else if ZORDER.contains(&s) {
            Some(Sfc::ZOrder)
        } else if GRAY.contains(&s) {
            Some(Sfc::Gray)
        } else if HILBERT.contains(&s) {
            Some(Sfc::Hilbert)
        } else {
            None
        }
    }

    /// Filename component appended by `sfccompress`; raster adds none.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Sfc::Raster => None,
            Sfc::ZOrder => Some("mrtn"),
            Sfc::Gray => Some("gry"),
            Sfc::Hilbert => Some("hbrt"),
        }
    }

    /// Short token used in configuration names.
    pub fn token(self) -> &'static str {
        self.extension().unwrap_or("rstr")
    }

    /// Token accepted by the `sfcc_compress` driver.
    pub fn driver_token(self) -> &'static str {
        match self {
            Sfc::Raster => "raster",
            Sfc::ZOrder => "zorder",
            Sfc::Gray => "gray",
            Sfc::Hilbert => "hilbert",
        }
    }

    pub fn curve_type(self) -> CurveType {
        match self {
            Sfc::Raster => CurveType::RowMajor,
            Sfc::ZOrder => CurveType::Morton,
            Sfc::Gray => CurveType::GrayCode,
            Sfc::Hilbert => CurveType::Hilbert,
        }
    }
}

impl fmt::Display for Sfc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sfc::Raster => "Raster",
            Sfc::ZOrder => "Z-Order",
            Sfc::Gray => "Gray",
            Sfc::Hilbert => "Hilbert",
        })
    }
}

impl FromStr for Sfc {
    type Err = SfccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sfc::from_alias(s).ok_or_else(|| SfccError::Parse(format!("unexpected SFC: {s}")))
    }
}

/// Compression scheme applied after reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Compression {
    None,
    Bzip2,
    Gzip,
    Huffman,
    Lz4,
    Lz77,
    Lzo,
    Lzw,
    Rle,
}

impl Compression {
    pub const ALL: [Compression; 9] = [
        Compression::None,
        Compression::Bzip2,
        Compression::Gzip,
        Compression::Huffman,
        Compression::Lz4,
        Compression::Lz77,
        Compression::Lzo,
        Compression::Lzw,
        Compression::Rle,
    ];

    pub fn from_alias(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        let s = s.as_str();
        let table: [(&[&str], Compression); 9] = [
            (HUFFMAN, Compression::Huffman),
            (GZIP, Compression::Gzip),
            (BZIP2, Compression::Bzip2),
            (LZ4, Compression::Lz4),
            (LZ77, Compression::Lz77),
            (LZO, Compression::Lzo),
            (LZW, Compression::Lzw),
            (RLE, Compression::Rle),
            (NONE, Compression::None),
        ];
        table
            .into_iter()
            .find(|(aliases, _)| aliases.contains(&s))
            .map(|(_, c)| c)
    }

    /// Handled by a standalone command-line compressor rather than `sfccompress`.
    pub fn is_external(self) -> bool {
        matches!(
            self,
            Compression::Bzip2 | Compression::Gzip | Compression::Lz4 | Compression::Lzo
        )
    }

    /// Filename component appended by the compressor.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Bzip2 => Some("bz2"),
            Compression::Gzip => Some("gz"),
            Compression::Huffman => Some("hff"),
            Compression::Lz4 => Some("lz4"),
            Compression::Lz77 => Some("lz77"),
            Compression::Lzo => Some("lzo"),
            Compression::Lzw => Some("lzw"),
            Compression::Rle => Some("rle"),
        }
    }

    pub fn token(self) -> &'static str {
        self.extension().unwrap_or("none")
    }

    pub fn driver_token(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            Compression::Huffman => "huffman",
            Compression::Lz4 => "lz4",
            Compression::Lz77 => "lz77",
            Compression::Lzo => "lzo",
            Compression::Lzw => "lzw",
            Compression::Rle => "rle",
        }
    }

    /// Upper-case label of the older size and runtime reports.
    pub fn legacy_label(self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::Bzip2 => "BZIP2",
            Compression::Gzip => "GZIP",
            Compression::Huffman => "HUFFMAN",
            Compression::Lz4 => "LZ4",
            Compression::Lz77 => "LZ77",
            Compression::Lzo => "LZO",
            Compression::Lzw => "LZW",
            Compression::Rle => "RLE",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "None",
            Compression::Bzip2 => "BZIP2",
            Compression::Gzip => "GZIP",
            Compression::Huffman => "Huffman",
            Compression::Lz4 => "LZ4",
            Compression::Lz77 => "LZ77",
            Compression::Lzo => "LZO",
            Compression::Lzw => "LZW",
            Compression::Rle => "RLE",
        })
    }
}

impl FromStr for Compression {
    type Err = SfccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compression::from_alias(s)
            .ok_or_else(|| SfccError::Parse(format!("unexpected compression scheme: {s}")))
    }
}

/// True when `s` marks a Burrows-Wheeler transformed payload.
pub fn is_bwt_token(s: &str) -> bool {
    BWT.contains(&s.to_ascii_lowercase().as_str())
}

/// True when `s` marks a bit-transposed payload.
pub fn is_bit_transpose_token(s: &str) -> bool {
    BIT_TRANSPOSE.contains(&s.to_ascii_lowercase().as_str())
}

/// Report label that folds BWT into the compression name.
pub fn compression_label(compression: Compression, bwt: bool) -> String {
    if !bwt {
        return compression.legacy_label().to_string();
    }
    match compression {
        Compression::Lz77 => "BWT77".to_string(),
        Compression::Lzw => "BWTW".to_string(),
        Compression::Lz4 => "BWT4".to_string(),
        Compression::None => "BWT".to_string(),
        other => other.legacy_label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!("MORTON".parse::<Sfc>().unwrap(), Sfc::ZOrder);
        assert_eq!("Row_Major".parse::<Sfc>().unwrap(), Sfc::Raster);
        assert_eq!("hbrt".parse::<Sfc>().unwrap(), Sfc::Hilbert);
        assert_eq!("BZIP_LZW".parse::<Compression>().unwrap(), Compression::Lzw);
        assert_eq!("bz2".parse::<Compression>().unwrap(), Compression::Bzip2);
        assert!("snake".parse::<Sfc>().is_err());
        assert!("zstd".parse::<Compression>().is_err());
    }

    #[test]
    fn driver_tokens_parse_back() {
        for sfc in Sfc::ALL {
            assert_eq!(sfc.driver_token().parse::<Sfc>().unwrap(), sfc);
            assert_eq!(sfc.token().parse::<Sfc>().unwrap(), sfc);
        }
        for c in Compression::ALL {
            assert_eq!(c.driver_token().parse::<Compression>().unwrap(), c);
            assert_eq!(c.token().parse::<Compression>().unwrap(), c);
        }
    }

    #[test]
    fn external_schemes() {
        let external: Vec<_> = Compression::ALL.into_iter().filter(|c| c.is_external()).collect();
        assert_eq!(
            external,
            vec![Compression::Bzip2, Compression::Gzip, Compression::Lz4, Compression::Lzo]
        );
    }

    #[test]
    fn labels_fold_bwt() {
        assert_eq!(compression_label(Compression::Lz77, true), "BWT77");
        assert_eq!(compression_label(Compression::None, true), "BWT");
        assert_eq!(compression_label(Compression::Lz77, false), "LZ77");
        assert_eq!(compression_label(Compression::Huffman, true), "HUFFMAN");
        assert!(is_bwt_token("BZIP_LZ77"));
        assert!(is_bit_transpose_token("-b"));
        assert!(!is_bit_transpose_token("nobtr"));
    }
}
