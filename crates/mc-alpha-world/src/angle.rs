//! Angle constants and conversions.
//!
//! The wire uses degrees; internally yaw and pitch are radians.

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = std::f32::consts::TAU;
pub const DEGREES_PER_RADIAN: f32 = 180.0 / PI;
pub const RADIANS_PER_DEGREE: f32 = PI / 180.0;

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * RADIANS_PER_DEGREE
}

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * DEGREES_PER_RADIAN
}

/// Remainder of `numerator / denominator` shifted into `[0, denominator)`.
///
/// `denominator` must be positive.
pub fn euclidean_mod(numerator: f32, denominator: f32) -> f32 {
    let mut result = numerator % denominator;
    if result < 0.0 {
        result += denominator;
        // A tiny negative remainder can round up to exactly `denominator`.
        if result >= denominator {
            result -= denominator;
        }
    }
    result
}
