//! The local player's pose.

use mc_alpha_proto::packets::{PositionLookRequest, PositionLookResponse};

use crate::coords::{angles_from_wire, angles_to_wire, internal_to_wire, wire_to_internal};

/// Last known pose of the local player, in internal axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntityPosition {
    /// East.
    pub x: f64,
    /// North.
    pub y: f64,
    /// Up.
    pub z: f64,
    /// Camera eye offset, passed through untouched.
    pub stance: f64,
    /// Radians in `[0, 2π)`.
    pub yaw: f32,
    /// Radians in `[-2π, 0)`.
    pub pitch: f32,
    pub on_ground: bool,
}

impl EntityPosition {
    /// Pose sent by the server.
    pub fn from_wire(packet: &PositionLookResponse) -> Self {
        let (x, y, z) = wire_to_internal(packet.x, packet.y, packet.z);
        let (yaw, pitch) = angles_from_wire(packet.yaw, packet.pitch);
        Self {
            x,
            y,
            z,
            stance: packet.stance,
            yaw,
            pitch,
            on_ground: packet.on_ground,
        }
    }

    /// Position report for the server.
    pub fn to_wire(&self) -> PositionLookRequest {
        let (x, y, z) = internal_to_wire(self.x, self.y, self.z);
        let (yaw, pitch) = angles_to_wire(self.yaw, self.pitch);
        PositionLookRequest {
            x,
            y,
            stance: self.stance,
            z,
            yaw,
            pitch,
            on_ground: self.on_ground,
        }
    }
}
