//! Math

use num_traits::Num;
use std::ops::{Add, Mul};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// Fraction of a shadow ray's length left unexplored near the light so the
/// emitter itself is never reported as an occluder.
pub const SHADOW_EPSILON: Float = 0.0001;

/// Distance spawned rays are pushed off a surface along its normal.
pub const RAY_OFFSET_EPSILON: Float = 0.0005;

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the closed interval [low, high].
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two values for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t`  - Parameter.
/// * `p0` - Value at t=0.
/// * `p1` - Value at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns gamma corrected values for use in 8-bit images.
///
/// * `value` - Value to correct.
#[inline(always)]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Returns inverse of a gamma corrected value.
///
/// * `value` - The value.
#[inline(always)]
pub fn inv_gamma_correct(value: Float) -> Float {
    if value <= 0.04045 {
        value * 1.0 / 12.92
    } else {
        ((value + 0.055) * 1.0 / 1.055).powf(2.4)
    }
}

/// Returns `2^exponent` as a `usize`; used to turn the power-of-two exponents
/// in the settings into buffer capacities.
///
/// * `exponent` - The exponent.
#[inline(always)]
pub fn pow2(exponent: usize) -> usize {
    assert!(exponent < usize::BITS as usize, "exponent {exponent} out of range");
    1_usize << exponent
}

/// Solves the quadratic equation `a t^2 + b t + c = 0` and returns the real
/// roots in ascending order.
///
/// * `a` - Quadratic coefficient.
/// * `b` - Linear coefficient.
/// * `c` - Constant coefficient.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let (a, b, c) = (a as f64, b as f64, c as f64);
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    // Avoid cancellation when b and the root have opposite signs.
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let (t0, t1) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };
    if t0 > t1 {
        Some((t1 as Float, t0 as Float))
    } else {
        Some((t0 as Float, t1 as Float))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn clamp_limits() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn gamma_inverse() {
        for v in [0.0, 0.002, 0.1, 0.5, 1.0] {
            assert!(approx_eq!(Float, inv_gamma_correct(gamma_correct(v)), v, epsilon = 1e-5));
        }
    }

    #[test]
    fn pow2_capacities() {
        assert_eq!(pow2(0), 1);
        assert_eq!(pow2(4), 16);
        assert_eq!(pow2(11), 2048);
    }

    #[test]
    fn quadratic_roots() {
        assert_eq!(quadratic(1.0, -3.0, 2.0), Some((1.0, 2.0)));
        assert_eq!(quadratic(1.0, 0.0, 1.0), None);
        assert_eq!(quadratic(0.0, 1.0, 1.0), None);
        assert_eq!(quadratic(2.0, 0.0, 0.0), Some((0.0, 0.0)));
    }
}
