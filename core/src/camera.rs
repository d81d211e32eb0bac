//! Camera

use crate::geometry::*;
use std::sync::Arc;

/// Holds all of the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraSample {
    /// Point on the film in raster coordinates; pixel (x, y) covers
    /// [x, x+1) x [y, y+1) with y increasing downwards.
    pub p_film: Point2f,

    /// Point on the lens in [0, 1)^2.
    pub p_lens: Point2f,
}

/// Camera interface.
pub trait Camera: Send + Sync {
    /// Returns the origin and normalized direction of the ray for a sample.
    ///
    /// * `sample` - The film and lens sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Point3f, Vector3f);
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera>;
