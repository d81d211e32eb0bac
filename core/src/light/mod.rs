//! Light

use crate::common::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Return value for `Light::sample_li()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightSample {
    /// Sampled point on the light.
    pub p: Point3f,

    /// Unit direction from the reference point towards `p`.
    pub wi: Vector3f,

    /// Distance from the reference point to `p`.
    pub distance: Float,

    /// Radiance emitted from `p` towards the reference point.
    pub le: Spectrum,

    /// PDF with respect to solid angle at the reference point.
    pub pdf: Float,
}

/// Light interface.
pub trait Light: Send + Sync {
    /// Sample a point on the light as seen from a reference point. Returns
    /// `None` if the light cannot illuminate the point.
    ///
    /// * `p` - Reference point.
    /// * `u` - Uniform sample in [0, 1)^2.
    fn sample_li(&self, p: &Point3f, u: &Point2f) -> Option<LightSample>;

    /// Returns the radiance emitted from a point of the light with surface
    /// normal `n` in direction `w`.
    ///
    /// * `n` - Surface normal at the emitting point.
    /// * `w` - Outgoing direction.
    fn le(&self, n: &Vector3f, w: &Vector3f) -> Spectrum;
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light>;
