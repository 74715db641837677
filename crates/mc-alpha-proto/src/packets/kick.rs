//! Kick / Disconnect (0xFF) — Bidirectional.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Sent by the server right before it drops the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kick {
    pub reason: String,
}

impl Kick {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ProtoEncode for Kick {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.reason);
    }
}

impl ProtoDecode for Kick {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            reason: read_string(buf)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reason() {
        let data = bytes::Bytes::from_static(b"\x00\x0cServer full!");
        let pkt = Kick::proto_decode(&mut data.clone()).unwrap();
        assert_eq!(pkt.reason, "Server full!");
    }

    #[test]
    fn truncated_reason_is_incomplete() {
        let data = bytes::Bytes::from_static(b"\x00\x0cServer");
        assert!(Kick::proto_decode(&mut data.clone())
            .unwrap_err()
            .is_incomplete());
    }
}
