//! Direction classes

use crate::common::*;
use crate::geometry::*;
use std::fmt;

/// Number of direction classes.
pub const DIRECTION_CLASSES: usize = 6;

/// One of the six signed principal axes. Rays are binned by the class of
/// their dominant direction component so each flushed batch is roughly
/// directionally coherent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DirectionClass {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl DirectionClass {
    /// All classes in index order.
    pub const ALL: [DirectionClass; DIRECTION_CLASSES] = [
        DirectionClass::PosX,
        DirectionClass::NegX,
        DirectionClass::PosY,
        DirectionClass::NegY,
        DirectionClass::PosZ,
        DirectionClass::NegZ,
    ];

    /// Classify a direction by the sign of its largest magnitude component.
    /// Ties favour X over Y over Z; zero components count as positive.
    ///
    /// * `d` - The direction.
    pub fn classify(d: &Vector3f) -> Self {
        let a = d.abs();
        let axis = if a.x >= a.y && a.x >= a.z {
            Axis::X
        } else if a.y >= a.z {
            Axis::Y
        } else {
            Axis::Z
        };
        let negative = d[axis] < 0.0;
        match (axis, negative) {
            (Axis::X, false) => DirectionClass::PosX,
            (Axis::X, true) => DirectionClass::NegX,
            (Axis::Y, false) => DirectionClass::PosY,
            (Axis::Y, true) => DirectionClass::NegY,
            (Axis::Z, false) => DirectionClass::PosZ,
            (Axis::Z, true) => DirectionClass::NegZ,
        }
    }

    /// Returns the index of the class in [0, 6).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl From<usize> for DirectionClass {
    fn from(i: usize) -> Self {
        assert!(i < DIRECTION_CLASSES, "invalid direction class {i}");
        Self::ALL[i]
    }
}

impl fmt::Display for DirectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DirectionClass::PosX => "px",
            DirectionClass::NegX => "nx",
            DirectionClass::PosY => "py",
            DirectionClass::NegY => "ny",
            DirectionClass::PosZ => "pz",
            DirectionClass::NegZ => "nz",
        };
        write!(f, "{s}")
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
