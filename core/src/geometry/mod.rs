//! Geometry

mod bounds3;
mod morton;
mod point2;
mod vector3;

// Re-export
pub use bounds3::*;
pub use morton::*;
pub use point2::*;
pub use vector3::*;
