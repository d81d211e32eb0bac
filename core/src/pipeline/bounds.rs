//! Batch Bounds

use crate::geometry::*;
use crate::ray::*;
use rayon::prelude::*;

/// Extent of a batch's ray origins and directions. Used to normalize the
/// traversal sort key.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayBounds {
    /// Bounds of the origins.
    pub origin: Bounds3f,

    /// Bounds of the directions.
    pub direction: Bounds3f,
}

impl RayBounds {
    /// Returns the bounds grown to contain a ray.
    ///
    /// * `ray` - The ray.
    pub fn union_ray(&self, ray: &Ray) -> Self {
        Self {
            origin: self.origin.union_point(&ray.o),
            direction: self.direction.union_point(&ray.d),
        }
    }

    /// Returns bounds containing both.
    ///
    /// * `other` - The other bounds.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            origin: self.origin.union(&other.origin),
            direction: self.direction.union(&other.direction),
        }
    }
}

/// Parallel reduction over the rays of a batch.
///
/// * `rays` - The batch.
pub fn compute_bounds(rays: &[Ray]) -> RayBounds {
    rays.par_iter()
        .fold(RayBounds::default, |b, r| b.union_ray(r))
        .reduce(RayBounds::default, |a, b| a.union(&b))
}
