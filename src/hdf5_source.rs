//! HDF5 datasets as [`CubeSource`]s.

use std::path::Path;

use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::H5Type;
use ndarray::s;

use crate::convert::CubeSource;
use crate::SfccError;

pub const DEFAULT_GROUP: &str = "Data";
pub const DEFAULT_DATASET: &str = "correlator_data";

fn hdf5_error(err: hdf5::Error) -> SfccError {
    SfccError::Convert(format!("HDF5: {err}"))
}

/// First channel (index 0 of the last axis) of a 4-D dataset.
pub struct Hdf5Cube {
    dataset: hdf5::Dataset,
    shape: [usize; 3],
    descriptor: TypeDescriptor,
}

impl Hdf5Cube {
    pub fn open(path: &Path, group: &str, dataset: &str) -> Result<Self, SfccError> {
        let file = hdf5::File::open(path).map_err(hdf5_error)?;
        let dataset = file
            .group(group)
            .and_then(|g| g.dataset(dataset))
            .map_err(hdf5_error)?;
        let dims = dataset.shape();
        if dims.len() != 4 {
            return Err(SfccError::Convert(format!(
                "expected a 4-D dataset, found shape {dims:?}"
            )));
        }
        let descriptor = dataset
            .dtype()
            .and_then(|t| t.to_descriptor())
            .map_err(hdf5_error)?;
        Ok(Self {
            shape: [dims[0], dims[1], dims[2]],
            descriptor,
            dataset,
        })
    }

    /// Full shape of the underlying dataset, channel axis included.
    pub fn dataset_shape(&self) -> Vec<usize> {
        self.dataset.shape()
    }

    pub fn chunks(&self) -> Option<Vec<usize>> {
        self.dataset.chunk()
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn read_as<T, F, const N: usize>(
        &self,
        origin: [usize; 3],
        side: usize,
        to_le: F,
    ) -> Result<Vec<u8>, SfccError>
    where
        T: H5Type,
        F: Fn(&T) -> [u8; N],
    {
        let [t, x, y] = origin;
        let cube = self
            .dataset
            .read_slice::<T, _, ndarray::Ix3>(s![t..t + side, x..x + side, y..y + side, 0])
            .map_err(hdf5_error)?;
        let mut out = Vec::with_capacity(cube.len() * N);
        for v in cube.iter() {
            out.extend_from_slice(&to_le(v));
        }
        Ok(out)
    }
}

impl CubeSource for Hdf5Cube {
    fn shape(&self) -> [usize; 3] {
        self.shape
    }

    fn element_size(&self) -> usize {
        self.descriptor.size()
    }

    fn read_cube(&self, origin: [usize; 3], side: usize) -> Result<Vec<u8>, SfccError> {
        use TypeDescriptor::*;
        match self.descriptor {
            Unsigned(IntSize::U1) => self.read_as::<u8, _, 1>(origin, side, |v| v.to_le_bytes()),
            Unsigned(IntSize::U2) => self.read_as::<u16, _, 2>(origin, side, |v| v.to_le_bytes()),
            Unsigned(IntSize::U4) => self.read_as::<u32, _, 4>(origin, side, |v| v.to_le_bytes()),
            Unsigned(IntSize::U8) => self.read_as::<u64, _, 8>(origin, side, |v| v.to_le_bytes()),
            Integer(IntSize::U1) => self.read_as::<i8, _, 1>(origin, side, |v| v.to_le_bytes()),
            Integer(IntSize::U2) => self.read_as::<i16, _, 2>(origin, side, |v| v.to_le_bytes()),
            Integer(IntSize::U4) => self.read_as::<i32, _, 4>(origin, side, |v| v.to_le_bytes()),
            Integer(IntSize::U8) => self.read_as::<i64, _, 8>(origin, side, |v| v.to_le_bytes()),
            Float(FloatSize::U4) => self.read_as::<f32, _, 4>(origin, side, |v| v.to_le_bytes()),
            Float(FloatSize::U8) => self.read_as::<f64, _, 8>(origin, side, |v| v.to_le_bytes()),
            ref other => Err(SfccError::Convert(format!(
                "unsupported HDF5 element type {other:?}"
            ))),
        }
    }
}
