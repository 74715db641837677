//! Conversion between wire axes and internal axes.
//!
//! Internal axes are right-handed: x = east, y = north, z = up. The mapping
//! is a signed permutation, so it is exact for floats and integers alike:
//!
//! ```text
//! internal.x =  wire.z        wire.x = -internal.y
//! internal.y = -wire.x        wire.y =  internal.z
//! internal.z =  wire.y        wire.z =  internal.x
//! ```

use std::ops::Neg;

use crate::angle::{degrees_to_radians, euclidean_mod, radians_to_degrees, PI, TWO_PI};

/// Wire `(x, y, z)` to internal `(x, y, z)`.
pub fn wire_to_internal<T: Neg<Output = T>>(x: T, y: T, z: T) -> (T, T, T) {
    (z, -x, y)
}

/// Internal `(x, y, z)` to wire `(x, y, z)`.
pub fn internal_to_wire<T: Neg<Output = T>>(x: T, y: T, z: T) -> (T, T, T) {
    (-y, z, x)
}

/// Wire `(yaw, pitch)` in degrees to internal radians.
///
/// Yaw already turns the right way; only the unit and range change. Pitch
/// gets a half-turn offset and lands in `[-2π, 0)`. That offset has never
/// been checked against a live server.
pub fn angles_from_wire(yaw: f32, pitch: f32) -> (f32, f32) {
    (
        euclidean_mod(degrees_to_radians(yaw), TWO_PI),
        euclidean_mod(degrees_to_radians(pitch) + PI, TWO_PI) - TWO_PI,
    )
}

/// Internal `(yaw, pitch)` in radians to wire degrees.
///
/// No offset is removed from pitch here, so pitch does not survive a round
/// trip through [`angles_from_wire`].
pub fn angles_to_wire(yaw: f32, pitch: f32) -> (f32, f32) {
    (radians_to_degrees(yaw), radians_to_degrees(pitch))
}
