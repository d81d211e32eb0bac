//! Shape

use crate::common::*;
use crate::geometry::*;
use crate::ray::*;
use std::sync::Arc;

/// Return value for `Shape::intersect()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapeHit {
    /// Parametric distance along the ray.
    pub t: Float,

    /// Index of the primitive within the shape.
    pub primitive: u32,

    /// First surface parameter.
    pub u: Float,

    /// Second surface parameter.
    pub v: Float,

    /// Unit geometric normal.
    pub n: Vector3f,
}

/// Shape interface.
pub trait Shape: Send + Sync {
    /// Returns the world space bounding box.
    fn bounds(&self) -> Bounds3f;

    /// Returns the nearest intersection within `[ray.t_min, t_max]`.
    ///
    /// * `ray`   - The ray.
    /// * `t_max` - End of the search interval, at most `ray.t_max`.
    fn intersect(&self, ray: &Ray, t_max: Float) -> Option<ShapeHit>;
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape>;
