//! Protocol-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    /// Not enough buffered bytes to finish the current message. The parser
    /// treats this as "wait for more data", never as a failure.
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("unknown packet id: 0x{0:02X}")]
    UnknownPacketId(u8),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("string of {0} bytes does not fit a u16 length prefix")]
    StringTooLong(usize),

    #[error("decompression error: {0}")]
    DecompressError(String),

    #[error("compression error: {0}")]
    CompressError(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ProtoError {
    /// True when the error only means the message is not fully buffered yet.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProtoError::BufferTooShort { .. })
    }
}
