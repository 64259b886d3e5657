//! Moving entropy over fixed-size blocks of a file.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::warn;

use crate::report::bool_label;
use crate::stats::shannon_entropy;
use crate::SfccError;

pub const DEFAULT_BLOCK_SIZE: usize = 16384;

/// Entropy of every block, starting at the given byte offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockEntropy {
    pub offsets: Vec<u64>,
    /// Bits per byte divided by 8.
    pub entropies: Vec<f64>,
}

/// Entropy of consecutive blocks of `reader`; a short final block is kept.
pub fn block_entropy<R: Read>(mut reader: R, block_size: usize) -> Result<BlockEntropy, SfccError> {
    if block_size == 0 {
        return Err(SfccError::Config("block size must be positive".into()));
    }
    let mut result = BlockEntropy::default();
    let mut buf = vec![0u8; block_size];
    let mut offset = 0u64;
    loop {
        let filled = read_block(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        let mut histogram = [0u64; 256];
        for &b in &buf[..filled] {
            histogram[usize::from(b)] += 1;
        }
        result.offsets.push(offset);
        result.entropies.push(shannon_entropy(&histogram, 256.0));
        offset += filled as u64;
        if filled < block_size {
            break;
        }
    }
    Ok(result)
}

fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, SfccError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

pub fn block_entropy_file(path: &Path, block_size: usize) -> Result<BlockEntropy, SfccError> {
    block_entropy(BufReader::new(File::open(path)?), block_size)
}

/// Dataset name and transforms as read from a block-entropy input name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyName {
    pub name: String,
    /// `Raster`, `Gray`, `Hilbert`, `Morton`, or `NULL` for conflicting curves.
    pub curve: &'static str,
    pub bittransposed: bool,
    pub bwt: bool,
}

/// The first component is the stem and the second (the container
/// extension) is ignored.
pub fn entropy_name_info(filename: &str) -> EntropyName {
    let mut parts = filename.split('.');
    let name = parts.next().unwrap_or_default().to_string();
    parts.next();

    let mut curve: Option<&str> = None;
    let mut conflicting = false;
    let mut bittransposed = false;
    let mut bwt = false;
    for part in parts {
        match part {
            "gry" | "mrtn" | "hbrt" => {
                if curve.is_some() {
                    conflicting = true;
                }
                curve = Some(part);
            }
            "btr" => bittransposed = true,
            "bwt" => bwt = true,
            other => warn!("unknown entry found: {other} in {filename}"),
        }
    }
    let curve = match (conflicting, curve) {
        (true, _) => "NULL",
        (false, None) => "Raster",
        (false, Some("gry")) => "Gray",
        (false, Some("hbrt")) => "Hilbert",
        (false, Some(_)) => "Morton",
    };
    EntropyName {
        name,
        curve,
        bittransposed,
        bwt,
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(T::to_string).collect::<Vec<_>>().join(" ")
}

/// `name,SFC,bittransposed,bwt,entropy_offsets,entropy_encoded`, one row per file.
pub fn write_entropy_csv<W: Write>(
    rows: &[(EntropyName, BlockEntropy)],
    writer: W,
) -> Result<(), SfccError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "name",
        "SFC",
        "bittransposed",
        "bwt",
        "entropy_offsets",
        "entropy_encoded",
    ])?;
    for (info, entropy) in rows {
        wtr.write_record([
            info.name.clone(),
            info.curve.to_string(),
            bool_label(info.bittransposed).to_string(),
            bool_label(info.bwt).to_string(),
            join(&entropy.offsets),
            join(&entropy.entropies),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_and_short_tail() {
        let mut data = vec![0u8; 8];
        data.extend(0..8u8);
        data.extend([1, 2]);
        let e = block_entropy(data.as_slice(), 8).unwrap();
        assert_eq!(e.offsets, vec![0, 8, 16]);
        assert_eq!(e.entropies[0], 0.0);
        assert!((e.entropies[1] - 3.0 / 8.0).abs() < 1e-12);
        assert!((e.entropies[2] - 1.0 / 8.0).abs() < 1e-12);
        assert!(block_entropy(data.as_slice(), 0).is_err());
        assert!(block_entropy(std::io::empty(), 8).unwrap().offsets.is_empty());
    }

    #[test]
    fn filename_decoding() {
        let n = entropy_name_info("dem.sfcc.hbrt.btr.bwt");
        assert_eq!(
            n,
            EntropyName {
                name: "dem".into(),
                curve: "Hilbert",
                bittransposed: true,
                bwt: true,
            }
        );
        assert_eq!(entropy_name_info("dem.sfcc").curve, "Raster");
        assert_eq!(entropy_name_info("dem.sfcc.gry.mrtn").curve, "NULL");
        assert_eq!(entropy_name_info("dem.sfcc.mrtn.lz77").curve, "Morton");
    }

    #[test]
    fn csv_lists_are_space_separated() {
        let rows = vec![(
            entropy_name_info("dem.sfcc.gry"),
            BlockEntropy {
                offsets: vec![0, 16384],
                entropies: vec![0.5, 0.25],
            },
        )];
        let mut out = Vec::new();
        write_entropy_csv(&rows, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,SFC,bittransposed,bwt,entropy_offsets,entropy_encoded\n\
             dem,Gray,False,False,0 16384,0.5 0.25\n"
        );
    }
}
