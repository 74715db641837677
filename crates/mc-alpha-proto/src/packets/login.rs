//! Login (0x01) — Client → Server.
//!
//! Wire format:
//! ```text
//! int32:  protocol_version
//! string: username
//! string: password
//! int64:  map_seed (unused by the client, always 0)
//! int8:   dimension (unused by the client, always 0)
//! ```
//!
//! The server answers with a packet of the same id whose fields the client
//! does not need; it is skipped by the framing table.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::PROTOCOL_VERSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub protocol_version: i32,
    pub username: String,
    /// Still framed when the server runs without authentication.
    pub password: String,
    pub map_seed: i64,
    pub dimension: i8,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            username: username.into(),
            password: password.into(),
            map_seed: 0,
            dimension: 0,
        }
    }
}

impl ProtoEncode for LoginRequest {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.protocol_version);
        write_string(buf, &self.username);
        write_string(buf, &self.password);
        buf.put_i64(self.map_seed);
        buf.put_i8(self.dimension);
    }
}

impl ProtoDecode for LoginRequest {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 4)?;
        let protocol_version = buf.get_i32();
        let username = read_string(buf)?;
        let password = read_string(buf)?;
        ensure_remaining(buf, 9)?;
        let map_seed = buf.get_i64();
        let dimension = buf.get_i8();
        Ok(Self {
            protocol_version,
            username,
            password,
            map_seed,
            dimension,
        })
    }
}
