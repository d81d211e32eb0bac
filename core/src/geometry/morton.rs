//! Morton Codes

use crate::common::*;
use crate::geometry::*;

/// Number of bits used per axis when quantizing a coordinate.
pub const MORTON_BITS: u32 = 10;

/// Scale applied to a coordinate in [0, 1] before it is quantized.
pub const MORTON_SCALE: Float = (1 << MORTON_BITS) as Float;

/// Take a 3D coordinate value where each component lies in [0, 1] and
/// quantize each to `MORTON_BITS` bits, then interleave them so the i^th bit
/// of x, y and z lands at positions `3i`, `3i + 1` and `3i + 2`.
///
/// * `v` - The coordinate value.
pub fn encode_morton_3(v: &Vector3f) -> u32 {
    let q = |c: Float| -> u32 { clamp(c * MORTON_SCALE, 0.0, MORTON_SCALE - 1.0) as u32 };
    (left_shift_3(q(v.z)) << 2) | (left_shift_3(q(v.y)) << 1) | left_shift_3(q(v.x))
}

/// The bit shifts to compute the Morton code for each 3D coordinate are
/// performed in a series of shifts of power-of-two size.
///
/// * `x` - The 10-bit value.
#[rustfmt::skip]
fn left_shift_3(x: u32) -> u32 {
    debug_assert!(x < 1 << MORTON_BITS);

    let mut x1 = x;
    x1 = (x1 | (x1 << 16)) & 0b00000011000000000000000011111111;
    // x1 = ---- --98 ---- ---- ---- ---- 7654 3210
    x1 = (x1 | (x1 << 8))  & 0b00000011000000001111000000001111;
    // x1 = ---- --98 ---- ---- 7654 ---- ---- 3210
    x1 = (x1 | (x1 << 4))  & 0b00000011000011000011000011000011;
    // x1 = ---- --98 ---- 76-- --54 ---- 32-- --10
    x1 = (x1 | (x1 << 2))  & 0b00001001001001001001001001001001;
    // x1 = ---- 9--8 --7- -6-- 5--4 --3- -2-- 1--0

    x1
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
