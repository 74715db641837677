//! PlayerPositionAndLook (0x0D) — Bidirectional.
//!
//! Both directions carry the same fields, but the server sends the stance
//! before `y` while the client sends it after:
//! ```text
//! client → server: f64 x, f64 y, f64 stance, f64 z, f32 yaw, f32 pitch, bool on_ground
//! server → client: f64 x, f64 stance, f64 y, f64 z, f32 yaw, f32 pitch, bool on_ground
//! ```
//! Coordinates are in wire axes, angles in degrees.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Encoded size of either direction.
pub const ENCODED_LEN: usize = 8 * 4 + 4 * 2 + 1;

/// Client → Server position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionLookRequest {
    pub x: f64,
    pub y: f64,
    pub stance: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

/// Server → Client position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionLookResponse {
    pub x: f64,
    pub stance: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl ProtoEncode for PositionLookRequest {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.y);
        buf.put_f64(self.stance);
        buf.put_f64(self.z);
        buf.put_f32(self.yaw);
        buf.put_f32(self.pitch);
        buf.put_u8(self.on_ground as u8);
    }
}

impl ProtoDecode for PositionLookRequest {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, ENCODED_LEN)?;
        Ok(Self {
            x: buf.get_f64(),
            y: buf.get_f64(),
            stance: buf.get_f64(),
            z: buf.get_f64(),
            yaw: buf.get_f32(),
            pitch: buf.get_f32(),
            on_ground: buf.get_u8() != 0,
        })
    }
}

impl ProtoEncode for PositionLookResponse {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.stance);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        buf.put_f32(self.yaw);
        buf.put_f32(self.pitch);
        buf.put_u8(self.on_ground as u8);
    }
}

impl ProtoDecode for PositionLookResponse {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, ENCODED_LEN)?;
        Ok(Self {
            x: buf.get_f64(),
            stance: buf.get_f64(),
            y: buf.get_f64(),
            z: buf.get_f64(),
            yaw: buf.get_f32(),
            pitch: buf.get_f32(),
            on_ground: buf.get_u8() != 0,
        })
    }
}
