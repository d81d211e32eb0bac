//! 3-D Vectors

use crate::common::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub};

/// A 3-D vector of `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

/// Points share the vector representation.
pub type Point3f = Vector3f;

impl Vector3f {
    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Creates a vector with the same value in every component.
    ///
    /// * `v` - The value.
    pub const fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's length.
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns a new vector containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn dot(&self, other: &Self) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            (self.y * other.z) - (self.z * other.y),
            (self.z * other.x) - (self.x * other.z),
            (self.x * other.y) - (self.y * other.x),
        )
    }

    /// Returns the largest coordinate value.
    pub fn max_component(&self) -> Float {
        max(self.x, max(self.y, self.z))
    }

    /// Returns the axis with largest coordinate value.
    pub fn max_dimension(&self) -> Axis {
        if self.x > self.y {
            if self.x > self.z {
                Axis::X
            } else {
                Axis::Z
            }
        } else if self.y > self.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Return the component-wise minimum coordinate values with another vector.
    ///
    /// * `other` - The other vector.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(min(self.x, other.x), min(self.y, other.y), min(self.z, other.z))
    }

    /// Return the component-wise maximum coordinate values with another vector.
    ///
    /// * `other` - The other vector.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(max(self.x, other.x), max(self.y, other.y), max(self.z, other.z))
    }

    /// Returns the vector as an array in x, y, z order.
    pub fn to_array(&self) -> [Float; 3] {
        [self.x, self.y, self.z]
    }

    /// Construct a local coordinate system given a normalized vector and
    /// return the two remaining axes.
    pub fn coordinate_system(&self) -> (Self, Self) {
        let v2 = if self.x.abs() > self.y.abs() {
            Self::new(-self.z, 0.0, self.x) / (self.x * self.x + self.z * self.z).sqrt()
        } else {
            Self::new(0.0, self.z, -self.y) / (self.y * self.y + self.z * self.z).sqrt()
        };
        let v3 = self.cross(&v2);
        (v2, v3)
    }
}

impl From<[Float; 3]> for Vector3f {
    fn from(a: [Float; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl Add for Vector3f {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3f {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Float> for Vector3f {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, v: Vector3f) -> Self::Output {
        v * self
    }
}

impl Div<Float> for Vector3f {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl Neg for Vector3f {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<Axis> for Vector3f {
    type Output = Float;

    fn index(&self, axis: Axis) -> &Self::Output {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for Vector3f {
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

impl fmt::Display for Vector3f {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
