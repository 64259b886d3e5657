//! SFCC container header.
//!
//! Every SFCC file starts with the following byte layout:
//!
//! ```text
//! [S][F][C][C][ndims][k][dtype_nbytes][sfc|btr][compression]([padding bits])
//! ```
//!
//! * **ndims** – number of dimensions of the stored array.
//! * **k** – log2 of the sidelength, every dimension is `2^k` long.
//! * **dtype_nbytes** – width of one element in bytes.
//! * **sfc|btr** – curve code in the low seven bits, the top bit marks a
//!   bit-transposed payload.
//! * **compression** – compression code of the payload.
//! * **padding bits** – only present for bit-oriented codecs, records how
//!   many bits of the final payload byte are padding.
//!
//! The payload follows directly after the header.

use std::fmt;
use std::io::{self, Read, Write};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::SfccError;

/// File magic.
pub const MAGIC: [u8; 4] = *b"SFCC";
/// Size of a header without the optional padding byte.
pub const BASE_HEADER_SIZE: usize = 9;
/// Bit of the curve byte that flags a bit-transposed payload.
pub const BIT_TRANSPOSE_MASK: u8 = 0b1000_0000;

/// Curve codes understood by `sfccompress`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurveType {
    RowMajor = 0,
    SnakeScan = 1,
    Morton = 2,
    GrayCode = 3,
    Hilbert = 4,
}

impl CurveType {
    pub const ALL: [CurveType; 5] = [
        CurveType::RowMajor,
        CurveType::SnakeScan,
        CurveType::Morton,
        CurveType::GrayCode,
        CurveType::Hilbert,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human readable name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            CurveType::RowMajor => "Raster",
            CurveType::SnakeScan => "Snake Scan",
            CurveType::Morton => "Morton",
            CurveType::GrayCode => "Gray Code",
            CurveType::Hilbert => "Hilbert",
        }
    }

    /// Value accepted by `sfccompress compress -s`.
    pub fn arg(self) -> &'static str {
        match self {
            CurveType::RowMajor => "ROW_MAJOR",
            CurveType::SnakeScan => "SNAKE_SCAN",
            CurveType::Morton => "MORTON",
            CurveType::GrayCode => "GRAY_CODE",
            CurveType::Hilbert => "HILBERT",
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression codes understood by `sfccompress`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompressionType {
    None = 0,
    Rle = 1,
    Huffman = 2,
    Lz77 = 3,
    Lz78 = 4,
    Lzw = 5,
    Deflate = 6,
    BwtLz77 = 7,
    BwtLzw = 8,
    Bwt = 9,
}

impl CompressionType {
    pub const ALL: [CompressionType; 10] = [
        CompressionType::None,
        CompressionType::Rle,
        CompressionType::Huffman,
        CompressionType::Lz77,
        CompressionType::Lz78,
        CompressionType::Lzw,
        CompressionType::Deflate,
        CompressionType::BwtLz77,
        CompressionType::BwtLzw,
        CompressionType::Bwt,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bit-oriented codecs store the number of padding bits after the header.
    pub fn requires_padding_bits(self) -> bool {
        matches!(
            self,
            CompressionType::Huffman
                | CompressionType::Lzw
                | CompressionType::Deflate
                | CompressionType::BwtLzw
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionType::None => "None",
            CompressionType::Rle => "RLE",
            CompressionType::Huffman => "Huffman",
            CompressionType::Lz77 => "LZ77",
            CompressionType::Lz78 => "LZ78",
            CompressionType::Lzw => "LZW",
            CompressionType::Deflate => "Deflate",
            CompressionType::BwtLz77 => "BWT77",
            CompressionType::BwtLzw => "BWTW",
            CompressionType::Bwt => "BWT",
        }
    }

    /// Value accepted by `sfccompress compress -c`.
    pub fn arg(self) -> &'static str {
        match self {
            CompressionType::None => "NONE",
            CompressionType::Rle => "RLE",
            CompressionType::Huffman => "HUFFMAN",
            CompressionType::Lz77 => "LZ77",
            CompressionType::Lz78 => "LZ78",
            CompressionType::Lzw => "LZW",
            CompressionType::Deflate => "DEFLATE",
            CompressionType::BwtLz77 => "BZIP_LZ77",
            CompressionType::BwtLzw => "BZIP_LZW",
            CompressionType::Bwt => "BWT",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded SFCC header.
///
/// Equality and encoding only see the padding bits when the compression
/// carries them.
#[derive(Debug, Clone)]
pub struct SfccHeader {
    pub ndims: u8,
    /// log2 of the sidelength.
    pub k: u8,
    pub dtype_nbytes: u8,
    pub curve: CurveType,
    pub bit_transposed: bool,
    pub compression: CompressionType,
    padding: u8,
}

impl PartialEq for SfccHeader {
    fn eq(&self, other: &Self) -> bool {
        self.ndims == other.ndims
            && self.k == other.k
            && self.dtype_nbytes == other.dtype_nbytes
            && self.curve == other.curve
            && self.bit_transposed == other.bit_transposed
            && self.compression == other.compression
            && self.padding_bits() == other.padding_bits()
    }
}

impl Eq for SfccHeader {}

impl Serialize for SfccHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("SfccHeader", 7)?;
        st.serialize_field("ndims", &self.ndims)?;
        st.serialize_field("k", &self.k)?;
        st.serialize_field("dtype_nbytes", &self.dtype_nbytes)?;
        st.serialize_field("curve", &self.curve)?;
        st.serialize_field("bit_transposed", &self.bit_transposed)?;
        st.serialize_field("compression", &self.compression)?;
        st.serialize_field("padding_bits", &self.padding_bits())?;
        st.end()
    }
}

impl SfccHeader {
    /// Header of a freshly converted, row-major and uncompressed array.
    pub fn raw(ndims: u8, k: u8, dtype_nbytes: u8) -> Self {
        Self {
            ndims,
            k,
            dtype_nbytes,
            curve: CurveType::RowMajor,
            bit_transposed: false,
            compression: CompressionType::None,
            padding: 0,
        }
    }

    /// Same header with `compression`, padding bits cleared.
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self.padding = 0;
        self
    }

    /// Padding bits of the final payload byte, `None` for codecs without them.
    pub fn padding_bits(&self) -> Option<u8> {
        self.compression
            .requires_padding_bits()
            .then_some(self.padding)
    }

    /// Ignored by codecs without padding bits.
    pub fn set_padding_bits(&mut self, bits: u8) {
        self.padding = bits;
    }

    /// `2^k`, or `None` when it does not fit in a `u64`.
    pub fn sidelength(&self) -> Option<u64> {
        1u64.checked_shl(u32::from(self.k))
    }

    /// Number of elements of the stored array.
    pub fn element_count(&self) -> Option<u64> {
        self.sidelength()?.checked_pow(u32::from(self.ndims))
    }

    /// Payload length in bytes of an uncompressed file.
    pub fn expected_payload_len(&self) -> Option<u64> {
        self.element_count()?
            .checked_mul(u64::from(self.dtype_nbytes))
    }

    pub fn encoded_len(&self) -> usize {
        if self.compression.requires_padding_bits() {
            BASE_HEADER_SIZE + 1
        } else {
            BASE_HEADER_SIZE
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&MAGIC);
        out.push(self.ndims);
        out.push(self.k);
        out.push(self.dtype_nbytes);
        let mut curve = self.curve.code();
        if self.bit_transposed {
            curve |= BIT_TRANSPOSE_MASK;
        }
        out.push(curve);
        out.push(self.compression.code());
        if self.compression.requires_padding_bits() {
            out.push(self.padding);
        }
        out
    }

    /// Decode a header from the start of `data`.
    pub fn decode(data: &[u8]) -> Result<Self, SfccError> {
        if data.len() < BASE_HEADER_SIZE {
            return Err(SfccError::Header(format!(
                "expected at least {BASE_HEADER_SIZE} bytes, found {}",
                data.len()
            )));
        }
        if data[..4] != MAGIC {
            return Err(SfccError::Header(format!(
                "bad magic {:02X?}, not an SFCC file",
                &data[..4]
            )));
        }
        let curve_byte = data[7];
        let curve = CurveType::from_code(curve_byte & !BIT_TRANSPOSE_MASK).ok_or_else(|| {
            SfccError::Header(format!("unknown curve code {}", curve_byte & !BIT_TRANSPOSE_MASK))
        })?;
        let compression = CompressionType::from_code(data[8])
            .ok_or_else(|| SfccError::Header(format!("unknown compression code {}", data[8])))?;
        let padding = if compression.requires_padding_bits() {
            match data.get(BASE_HEADER_SIZE) {
                Some(&b) => b,
                None => {
                    return Err(SfccError::Header(format!(
                        "missing padding byte for {compression} payload"
                    )))
                }
            }
        } else {
            0
        };
        Ok(Self {
            ndims: data[4],
            k: data[5],
            dtype_nbytes: data[6],
            curve,
            bit_transposed: curve_byte & BIT_TRANSPOSE_MASK != 0,
            compression,
            padding,
        })
    }

    /// Read a header from a stream, leaving it positioned at the payload.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, SfccError> {
        let mut buf = [0u8; BASE_HEADER_SIZE + 1];
        read_exact_or_header(reader, &mut buf[..BASE_HEADER_SIZE])?;
        let compression = CompressionType::from_code(buf[8]);
        if compression.is_some_and(CompressionType::requires_padding_bits) {
            read_exact_or_header(reader, &mut buf[BASE_HEADER_SIZE..])?;
            Self::decode(&buf)
        } else {
            Self::decode(&buf[..BASE_HEADER_SIZE])
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode())
    }
}

fn read_exact_or_header<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), SfccError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => SfccError::Header("file too short for an SFCC header".into()),
        _ => SfccError::Io(e),
    })
}
