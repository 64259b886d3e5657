//! Conversion of source datasets into raw SFCC files.
//!
//! Converted files are always row-major and uncompressed; `sfccompress`
//! takes it from there.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;

use crate::header::SfccHeader;
use crate::SfccError;

/// `log2(side)` when `side` is a non-zero power of two.
pub fn power_of_two_exponent(side: usize) -> Option<u8> {
    if side.is_power_of_two() {
        Some(side.trailing_zeros() as u8)
    } else {
        None
    }
}

/// `input` with its extension replaced by `.sfcc`.
pub fn sfcc_output_path(input: &Path) -> PathBuf {
    input.with_extension("sfcc")
}

/// Samples of a decoded image, little-endian.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterData {
    pub dtype: &'static str,
    pub element_size: u8,
    pub bytes: Vec<u8>,
    pub min: f64,
    pub max: f64,
}

macro_rules! raster {
    ($values:expr, $dtype:literal, $ty:ty) => {{
        let values = $values;
        let mut bytes = Vec::with_capacity(values.len() * std::mem::size_of::<$ty>());
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &values {
            bytes.extend_from_slice(&v.to_le_bytes());
            let f = *v as f64;
            min = min.min(f);
            max = max.max(f);
        }
        RasterData {
            dtype: $dtype,
            element_size: std::mem::size_of::<$ty>() as u8,
            bytes,
            min,
            max,
        }
    }};
}

impl RasterData {
    fn from_decoding(result: DecodingResult) -> Result<Self, SfccError> {
        #[allow(unreachable_patterns)]
        let data = match result {
            DecodingResult::U8(v) => raster!(v, "uint8", u8),
            DecodingResult::U16(v) => raster!(v, "uint16", u16),
            DecodingResult::U32(v) => raster!(v, "uint32", u32),
            DecodingResult::U64(v) => raster!(v, "uint64", u64),
            DecodingResult::I8(v) => raster!(v, "int8", i8),
            DecodingResult::I16(v) => raster!(v, "int16", i16),
            DecodingResult::I32(v) => raster!(v, "int32", i32),
            DecodingResult::I64(v) => raster!(v, "int64", i64),
            DecodingResult::F32(v) => raster!(v, "float32", f32),
            DecodingResult::F64(v) => raster!(v, "float64", f64),
            _ => return Err(SfccError::Convert("unsupported sample type".into())),
        };
        Ok(data)
    }
}

/// Result of a GeoTIFF conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffConversion {
    pub output: PathBuf,
    pub header: SfccHeader,
    pub sidelength: u32,
    pub raster: RasterData,
}

/// Decode a square, power-of-two, single-band GeoTIFF.
pub fn read_geotiff(path: &Path) -> Result<(SfccHeader, u32, RasterData), SfccError> {
    let reader = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());
    let (width, height) = decoder.dimensions()?;
    info!("Size: {width}x{height}");
    if width != height {
        return Err(SfccError::Convert(format!(
            "GeoTIFFs must be square, got {width}x{height}"
        )));
    }
    let k = power_of_two_exponent(width as usize).ok_or_else(|| {
        SfccError::Convert(format!("sidelengths must be a power-of-two, got {width}"))
    })?;
    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(SfccError::Convert(format!(
                "expected a single band image, found {other:?}"
            )))
        }
    }
    let raster = RasterData::from_decoding(decoder.read_image()?)?;
    info!("Data Type: {} ({} bytes)", raster.dtype, raster.element_size);
    Ok((SfccHeader::raw(2, k, raster.element_size), width, raster))
}

/// Convert `input` into `<input stem>.sfcc` next to it.
pub fn geotiff_to_sfcc(input: &Path) -> Result<GeoTiffConversion, SfccError> {
    let (header, sidelength, raster) = read_geotiff(input)?;
    let output = sfcc_output_path(input);
    info!("Writing to file {}", output.display());
    let mut out = BufWriter::new(File::create(&output)?);
    header.write_to(&mut out)?;
    out.write_all(&raster.bytes)?;
    out.flush()?;
    Ok(GeoTiffConversion {
        output,
        header,
        sidelength,
        raster,
    })
}

/// A 3-D array read cube by cube.
pub trait CubeSource {
    /// Extents of the three spatial axes.
    fn shape(&self) -> [usize; 3];

    /// Bytes per element.
    fn element_size(&self) -> usize;

    /// Row-major little-endian bytes of the cube of `side` starting at `origin`.
    fn read_cube(&self, origin: [usize; 3], side: usize) -> Result<Vec<u8>, SfccError>;
}

/// In-memory row-major array.
#[derive(Debug, Clone)]
pub struct RawCube {
    shape: [usize; 3],
    element_size: usize,
    data: Vec<u8>,
}

impl RawCube {
    pub fn new(shape: [usize; 3], element_size: usize, data: Vec<u8>) -> Result<Self, SfccError> {
        let expected = shape.iter().product::<usize>() * element_size;
        if data.len() != expected {
            return Err(SfccError::Convert(format!(
                "array of shape {shape:?} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            shape,
            element_size,
            data,
        })
    }
}

impl CubeSource for RawCube {
    fn shape(&self) -> [usize; 3] {
        self.shape
    }

    fn element_size(&self) -> usize {
        self.element_size
    }

    fn read_cube(&self, origin: [usize; 3], side: usize) -> Result<Vec<u8>, SfccError> {
        for axis in 0..3 {
            if origin[axis] + side > self.shape[axis] {
                return Err(SfccError::Convert(format!(
                    "cube at {origin:?} of side {side} exceeds shape {:?}",
                    self.shape
                )));
            }
        }
        let [_, ny, nz] = self.shape;
        let row = side * self.element_size;
        let mut out = Vec::with_capacity(side * side * row);
        for t in origin[0]..origin[0] + side {
            for x in origin[1]..origin[1] + side {
                let start = ((t * ny + x) * nz + origin[2]) * self.element_size;
                out.extend_from_slice(&self.data[start..start + row]);
            }
        }
        Ok(out)
    }
}

/// Origins `0, side, 2*side, ...` strictly below `extent - side` on every axis.
///
/// The last full cube along an axis is never emitted.
pub fn cube_origins(shape: [usize; 3], side: usize) -> Vec<[usize; 3]> {
    let steps = |extent: usize| (0..extent.saturating_sub(side)).step_by(side.max(1));
    let mut origins = Vec::new();
    for t in steps(shape[0]) {
        for x in steps(shape[1]) {
            for y in steps(shape[2]) {
                origins.push([t, x, y]);
            }
        }
    }
    origins
}

/// `<outdir>/<stem>_<t>_<x>_<y>.sfcc`.
pub fn cube_output_path(outdir: &Path, stem: &str, origin: [usize; 3]) -> PathBuf {
    outdir.join(format!("{stem}_{}_{}_{}.sfcc", origin[0], origin[1], origin[2]))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Write every cube of `source` into `outdir`. Existing outputs are kept.
///
/// `on_cube` is called once per origin, after the cube was written or skipped.
pub fn split_cubes<S, F>(
    source: &S,
    stem: &str,
    outdir: &Path,
    side: usize,
    mut on_cube: F,
) -> Result<SplitSummary, SfccError>
where
    S: CubeSource + ?Sized,
    F: FnMut(&Path),
{
    let k = power_of_two_exponent(side)
        .ok_or_else(|| SfccError::Convert(format!("cube side must be a power-of-two, got {side}")))?;
    let element_size = match u8::try_from(source.element_size()) {
        Ok(0) | Err(_) => {
            return Err(SfccError::Convert(format!(
                "unsupported element size {}",
                source.element_size()
            )))
        }
        Ok(n) => n,
    };
    let header = SfccHeader::raw(3, k, element_size);

    let mut summary = SplitSummary::default();
    for origin in cube_origins(source.shape(), side) {
        let path = cube_output_path(outdir, stem, origin);
        if path.exists() {
            debug!("skipping existing {}", path.display());
            summary.skipped += 1;
        } else {
            let payload = source.read_cube(origin, side)?;
            let mut out = BufWriter::new(File::create(&path)?);
            header.write_to(&mut out)?;
            out.write_all(&payload)?;
            out.flush()?;
            debug!(
                "completed: t={}, x={}, y={}, length={}",
                origin[0],
                origin[1],
                origin[2],
                payload.len() / usize::from(element_size)
            );
            summary.written += 1;
        }
        on_cube(&path);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powers_of_two() {
        assert_eq!(power_of_two_exponent(1), Some(0));
        assert_eq!(power_of_two_exponent(128), Some(7));
        assert_eq!(power_of_two_exponent(0), None);
        assert_eq!(power_of_two_exponent(96), None);
    }

    #[test]
    fn origins_exclude_last_stride() {
        assert_eq!(cube_origins([4, 4, 4], 2), vec![[0, 0, 0]]);
        assert_eq!(cube_origins([5, 4, 4], 2).len(), 2);
        assert!(cube_origins([2, 8, 8], 2).is_empty());
        // 1024x4096x544 with side 128
        assert_eq!(cube_origins([1024, 4096, 544], 128).len(), 7 * 31 * 4);
    }

    #[test]
    fn raw_cube_reads_sub_block() {
        let data: Vec<u8> = (0..64).collect();
        let cube = RawCube::new([4, 4, 4], 1, data).unwrap();
        let block = cube.read_cube([1, 2, 2], 2).unwrap();
        assert_eq!(block, vec![26, 27, 30, 31, 42, 43, 46, 47]);
        assert!(cube.read_cube([3, 0, 0], 2).is_err());
        assert!(RawCube::new([2, 2, 2], 2, vec![0; 8]).is_err());
    }

    #[test]
    fn split_writes_headers_and_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..6 * 6 * 6 * 2).map(|i| i as u8).collect();
        let cube = RawCube::new([6, 6, 6], 2, data).unwrap();
        std::fs::write(cube_output_path(dir.path(), "vis", [0, 0, 2]), b"old").unwrap();

        let mut seen = 0;
        let summary = split_cubes(&cube, "vis", dir.path(), 2, |_| seen += 1).unwrap();
        assert_eq!(summary, SplitSummary { written: 7, skipped: 1 });
        assert_eq!(seen, 8);

        let written = std::fs::read(cube_output_path(dir.path(), "vis", [2, 2, 2])).unwrap();
        let header = SfccHeader::decode(&written).unwrap();
        assert_eq!(header, SfccHeader::raw(3, 1, 2));
        assert_eq!(written.len(), 9 + 8 * 2);
        let kept = std::fs::read(cube_output_path(dir.path(), "vis", [0, 0, 2])).unwrap();
        assert_eq!(kept, b"old");
        assert!(split_cubes(&cube, "vis", dir.path(), 3, |_| {}).is_err());
    }
}
