//! Protocol encoding/decoding traits and helpers.
//!
//! All multi-byte values on the wire are big-endian.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Fail with `BufferTooShort` unless `needed` bytes are buffered.
pub fn ensure_remaining(buf: &mut impl Buf, needed: usize) -> Result<(), ProtoError> {
    if buf.remaining() < needed {
        return Err(ProtoError::BufferTooShort {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

/// Longest string a u16 length prefix can carry, in bytes.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Fail with `StringTooLong` unless `s` fits a protocol string.
pub fn check_string(s: &str) -> Result<(), ProtoError> {
    if s.len() > MAX_STRING_LEN {
        return Err(ProtoError::StringTooLong(s.len()));
    }
    Ok(())
}

/// Write a protocol string (u16 byte length + UTF-8).
///
/// Strings over [`MAX_STRING_LEN`] bytes are cut at the last char boundary
/// that fits, so the frame stays well-formed. Use [`check_string`] first to
/// reject them instead.
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    let mut end = s.len().min(MAX_STRING_LEN);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let bytes = &s.as_bytes()[..end];
    buf.put_u16(u16::try_from(bytes.len()).unwrap_or(u16::MAX));
    buf.put_slice(bytes);
}

/// Read a protocol string (u16 byte length + UTF-8).
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    ensure_remaining(buf, 2)?;
    let len = buf.get_u16() as usize;
    ensure_remaining(buf, len)?;
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)
}

/// Advance past `len` bytes, failing if they are not all buffered.
pub fn skip_bytes(buf: &mut impl Buf, len: usize) -> Result<(), ProtoError> {
    ensure_remaining(buf, len)?;
    buf.advance(len);
    Ok(())
}
