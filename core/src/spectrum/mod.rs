//! Spectrum

use crate::common::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign};

/// Number of spectral samples to use for `Spectrum`.
pub const SPECTRUM_SAMPLES: usize = 3;

/// Represents radiance and path throughput as a weighted sum of red, green
/// and blue components.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    /// The sampled spectral values.
    c: [Float; SPECTRUM_SAMPLES],
}

impl Spectrum {
    /// Black.
    pub const ZERO: Self = Self { c: [0.0; SPECTRUM_SAMPLES] };

    /// White.
    pub const ONE: Self = Self { c: [1.0; SPECTRUM_SAMPLES] };

    /// Create a new `Spectrum` with a constant value across all wavelengths.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; SPECTRUM_SAMPLES] }
    }

    /// Create a new `Spectrum` from RGB values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the RGB components.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns true if every component is zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the largest component.
    pub fn max_component_value(&self) -> Float {
        max(self.c[0], max(self.c[1], self.c[2]))
    }

    /// Returns the luminance (`y` coefficient of the XYZ colour).
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }
}

impl From<[Float; 3]> for Spectrum {
    fn from(c: [Float; 3]) -> Self {
        Self { c }
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::rgb(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.c.iter_mut().zip(other.c) {
            *a += b;
        }
    }
}

impl Mul for Spectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::rgb(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, other: Self) {
        for (a, b) in self.c.iter_mut().zip(other.c) {
            *a *= b;
        }
    }
}

impl Mul<Float> for Spectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::rgb(self.c[0] * f, self.c[1] * f, self.c[2] * f)
    }
}

impl Mul<Spectrum> for Float {
    type Output = Spectrum;

    fn mul(self, s: Spectrum) -> Self::Output {
        s * self
    }
}

impl Div<Float> for Spectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl Index<usize> for Spectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl fmt::Display for Spectrum {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Spectrum::rgb(1.0, 2.0, 3.0);
        let b = Spectrum::new(2.0);
        assert_eq!(a * b, Spectrum::rgb(2.0, 4.0, 6.0));
        assert_eq!(a + b, Spectrum::rgb(3.0, 4.0, 5.0));
        assert_eq!(a / 2.0, Spectrum::rgb(0.5, 1.0, 1.5));
        assert_eq!(a.max_component_value(), 3.0);
        assert!(Spectrum::ZERO.is_black());
        assert!(!a.is_black());
    }
}
