//! Zlib compression for map chunk payloads.
//!
//! MapChunk carries a bare zlib stream. It has no uncompressed-size prefix, so
//! the inflater only gets a capacity hint and grows its output as needed.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::ProtoError;

/// Compress `data` into a zlib stream (used to build chunk payloads in tests
/// and fake servers).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, ProtoError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| ProtoError::CompressError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ProtoError::CompressError(e.to_string()))
}

/// Inflate a zlib stream. `size_hint` only pre-sizes the output buffer; a
/// hint of zero is fine.
pub fn decompress(data: &[u8], size_hint: usize) -> Result<Vec<u8>, ProtoError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut output = Vec::with_capacity(size_hint);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| ProtoError::DecompressError(e.to_string()))?;
    Ok(output)
}
