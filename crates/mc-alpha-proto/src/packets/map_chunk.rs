//! MapChunk (0x33) — Server → Client.
//!
//! Wire format:
//! ```text
//! int32:  x
//! int16:  y
//! int32:  z
//! uint8:  size_x - 1
//! uint8:  size_y - 1
//! uint8:  size_z - 1
//! int32:  compressed_len
//! bytes:  zlib stream (block ids, then metadata and light nibbles)
//! ```
//! Origin and extents are in wire axes.

use bytes::{Buf, BufMut, Bytes};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

const HEADER_LEN: usize = 4 + 2 + 4 + 3 + 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapChunk {
    pub x: i32,
    pub y: i16,
    pub z: i32,
    pub size_x_minus_one: u8,
    pub size_y_minus_one: u8,
    pub size_z_minus_one: u8,
    pub compressed_data: Bytes,
}

/// Largest zlib stream that can encode `raw_len` bytes (zlib's
/// `compressBound`).
fn compressed_bound(raw_len: usize) -> usize {
    raw_len + (raw_len >> 12) + (raw_len >> 14) + (raw_len >> 25) + 13
}

impl MapChunk {
    /// Longest payload a chunk of these extents can legally carry: block ids
    /// plus metadata and two light nibble arrays, deflated at worst case.
    pub fn max_compressed_len(&self) -> usize {
        let (sx, sy, sz) = self.size();
        let volume = (sx * sy * sz) as usize;
        compressed_bound(volume * 5 / 2)
    }

    /// Extent per wire axis.
    pub fn size(&self) -> (i32, i32, i32) {
        (
            self.size_x_minus_one as i32 + 1,
            self.size_y_minus_one as i32 + 1,
            self.size_z_minus_one as i32 + 1,
        )
    }
}

impl ProtoEncode for MapChunk {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.x);
        buf.put_i16(self.y);
        buf.put_i32(self.z);
        buf.put_u8(self.size_x_minus_one);
        buf.put_u8(self.size_y_minus_one);
        buf.put_u8(self.size_z_minus_one);
        buf.put_i32(self.compressed_data.len() as i32);
        buf.put_slice(&self.compressed_data);
    }
}

impl ProtoDecode for MapChunk {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, HEADER_LEN)?;
        let x = buf.get_i32();
        let y = buf.get_i16();
        let z = buf.get_i32();
        let size_x_minus_one = buf.get_u8();
        let size_y_minus_one = buf.get_u8();
        let size_z_minus_one = buf.get_u8();
        let compressed_len = buf.get_i32();
        if compressed_len < 0 {
            return Err(ProtoError::InvalidData(format!(
                "negative MapChunk payload length: {compressed_len}"
            )));
        }
        let mut chunk = Self {
            x,
            y,
            z,
            size_x_minus_one,
            size_y_minus_one,
            size_z_minus_one,
            compressed_data: Bytes::new(),
        };
        let compressed_len = compressed_len as usize;
        let max = chunk.max_compressed_len();
        if compressed_len > max {
            return Err(ProtoError::InvalidData(format!(
                "MapChunk payload of {compressed_len} bytes exceeds {max} for its extents"
            )));
        }
        ensure_remaining(buf, compressed_len)?;
        chunk.compressed_data = buf.copy_to_bytes(compressed_len);
        Ok(chunk)
    }
}
