//! Recover benchmark metadata from filenames and job command lines.
//!
//! `sfccompress` and the external compressors append one `.`-separated
//! component per processing step, so `dem.sfcc.hbrt.btr.bwt.lz77` is the
//! Hilbert-ordered, bit-transposed, BWT+LZ77 compressed version of
//! `dem.sfcc`.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::bench_config::BenchConfig;
use crate::vocab::{is_bit_transpose_token, is_bwt_token, Compression, Sfc};
use crate::SfccError;

/// Dataset stem plus the processing steps applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SfccName {
    pub filename: String,
    pub sfc: Sfc,
    pub bwt: bool,
    pub bitshuffle: bool,
    pub compression: Compression,
}

impl SfccName {
    /// Unprocessed file with the given stem.
    pub fn original(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sfc: Sfc::Raster,
            bwt: false,
            bitshuffle: false,
            compression: Compression::None,
        }
    }

    pub fn config(&self) -> BenchConfig {
        BenchConfig {
            sfc: self.sfc,
            bwt: self.bwt,
            bitshuffle: self.bitshuffle,
            compression: self.compression,
        }
    }

    /// Same file with a different compression step.
    pub fn with_compression(&self, compression: Compression) -> Self {
        Self {
            compression,
            ..self.clone()
        }
    }

    /// Apply one filename or command-line token. Returns false when the token
    /// is not part of the vocabulary.
    fn apply_token(&mut self, token: &str) -> bool {
        let mut known = false;
        if let Some(sfc) = Sfc::from_alias(token) {
            self.sfc = sfc;
            known = true;
        }
        if let Some(compression) = Compression::from_alias(token) {
            self.compression = compression;
            known = true;
        }
        if is_bwt_token(token) {
            self.bwt = true;
            known = true;
        }
        if is_bit_transpose_token(token) {
            self.bitshuffle = true;
            known = true;
        }
        known
    }
}

impl fmt::Display for SfccName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, bwt: {}, bitshuffle: {}, {}",
            self.filename, self.sfc, self.bwt, self.bitshuffle, self.compression
        )
    }
}

/// Drop the `sfcc` and `tif` components from a dataset stem.
pub fn normalise_stem(stem: &str) -> String {
    let mut parts: Vec<&str> = stem.split('.').collect();
    for marker in ["sfcc", "tif"] {
        if let Some(pos) = parts.iter().position(|p| *p == marker) {
            parts.remove(pos);
        }
    }
    parts.join(".")
}

fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Strictly decode a filename; every component after `sfcc` must be known.
pub fn parse_filename(name: &str) -> Result<SfccName, SfccError> {
    let components: Vec<&str> = name.split('.').collect();
    let pos = components
        .iter()
        .position(|c| *c == "sfcc")
        .ok_or_else(|| SfccError::Parse(format!("'sfcc' not present in filename: {name}")))?;
    let mut parsed = SfccName::original(normalise_stem(&components[..=pos].join(".")));
    for part in &components[pos + 1..] {
        if !parsed.apply_token(part) {
            return Err(SfccError::Parse(format!(
                "unexpected filename part `{part}` in {name}"
            )));
        }
    }
    Ok(parsed)
}

/// Decode the command line of a benchmark job.
///
/// The last argument names the file being processed; earlier arguments
/// override or extend what the filename says.
pub fn parse_command(cmdline: &str) -> Result<SfccName, SfccError> {
    let mut tokens: Vec<&str> = cmdline.split_whitespace().collect();
    let file = tokens
        .pop()
        .ok_or_else(|| SfccError::Parse("empty command line".into()))?;
    let mut parsed = parse_filename(basename(file))?;
    for token in tokens {
        parsed.apply_token(basename(token));
    }
    Ok(parsed)
}

/// Lenient decoder used by the size and runtime reports.
///
/// The stem is everything before `sfcc` and unknown components are ignored.
pub fn legacy_name_info(path: &str) -> Result<SfccName, SfccError> {
    let name = basename(path);
    let components: Vec<&str> = name.split('.').collect();
    let pos = components
        .iter()
        .position(|c| *c == "sfcc")
        .ok_or_else(|| SfccError::Parse(format!("sfcc not present in filename: {name}")))?;
    let parts: HashSet<&str> = components[pos + 1..].iter().copied().collect();

    let sfc = [("mrtn", Sfc::ZOrder), ("gry", Sfc::Gray), ("hbrt", Sfc::Hilbert)]
        .into_iter()
        .find(|(token, _)| parts.contains(token))
        .map_or(Sfc::Raster, |(_, sfc)| sfc);
    let compression = [
        ("gz", Compression::Gzip),
        ("bz2", Compression::Bzip2),
        ("hff", Compression::Huffman),
        ("lz4", Compression::Lz4),
        ("lz77", Compression::Lz77),
        ("lzo", Compression::Lzo),
        ("lzw", Compression::Lzw),
        ("rle", Compression::Rle),
    ]
    .into_iter()
    .find(|(token, _)| parts.contains(token))
    .map_or(Compression::None, |(_, c)| c);

    Ok(SfccName {
        filename: components[..pos].join("."),
        sfc,
        bwt: parts.contains("bwt"),
        bitshuffle: parts.contains("btr"),
        compression,
    })
}

/// Lenient command decoder matching the native `sfccompress` argument names.
pub fn legacy_command_info(cmdline: &str) -> Result<SfccName, SfccError> {
    let mut tokens: Vec<&str> = cmdline.split_whitespace().collect();
    let file = tokens
        .pop()
        .ok_or_else(|| SfccError::Parse("empty command line".into()))?;
    let mut info = legacy_name_info(file)?;
    let tokens: HashSet<&str> = tokens.into_iter().collect();

    if let Some(sfc) = [("MORTON", Sfc::ZOrder), ("HILBERT", Sfc::Hilbert), ("GRAY_CODE", Sfc::Gray)]
        .into_iter()
        .find(|(t, _)| tokens.contains(t))
        .map(|(_, sfc)| sfc)
    {
        info.sfc = sfc;
    }

    let compression = [
        ("HUFFMAN", Compression::Huffman, false),
        ("BZIP_LZW", Compression::Lzw, true),
        ("BZIP_LZ77", Compression::Lz77, true),
        ("LZ77", Compression::Lz77, false),
        ("LZW", Compression::Lzw, false),
        ("RLE", Compression::Rle, false),
        ("NONE", Compression::None, false),
        ("GZIP", Compression::Gzip, false),
        ("BZIP2", Compression::Bzip2, false),
        ("LZ4", Compression::Lz4, false),
        ("LZO", Compression::Lzo, false),
    ]
    .into_iter()
    .find(|(t, _, _)| tokens.contains(t));
    if let Some((_, compression, bwt)) = compression {
        info.compression = compression;
        info.bwt |= bwt;
    }

    if tokens.contains("BWT") {
        info.bwt = true;
    }
    if tokens.contains("-b") {
        info.bitshuffle = true;
    }
    Ok(info)
}
