//! Handshake (0x02) — Bidirectional.
//!
//! The client opens with its username; the server answers with a connection
//! hash that says which kind of login it expects.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Connection hash the server sends when no authentication is required.
pub const AUTHENTICATION_NOT_REQUIRED: &str = "-";

/// Client → Server handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
    pub username: String,
}

/// Server → Client handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    pub connection_hash: String,
}

impl HandshakeResponse {
    pub fn offline() -> Self {
        Self {
            connection_hash: AUTHENTICATION_NOT_REQUIRED.into(),
        }
    }

    pub fn requires_authentication(&self) -> bool {
        self.connection_hash != AUTHENTICATION_NOT_REQUIRED
    }
}

impl ProtoEncode for HandshakeRequest {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.username);
    }
}

impl ProtoDecode for HandshakeRequest {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            username: read_string(buf)?,
        })
    }
}

impl ProtoEncode for HandshakeResponse {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.connection_hash);
    }
}

impl ProtoDecode for HandshakeResponse {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            connection_hash: read_string(buf)?,
        })
    }
}
