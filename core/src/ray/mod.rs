//! Rays
//!
//! The working (uncompressed) ray record consumed by the batch pipeline, the
//! compressed record persisted in batch files and the codec between them.

mod codec;
mod direction;

use crate::common::*;
use crate::geometry::*;
use crate::spectrum::*;
use bitflags::bitflags;
use std::fmt;

// Re-export
pub use codec::*;
pub use direction::*;

bitflags! {
    /// Per-ray flags carried through the codec.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct RayFlags: u8 {
        /// The ray is an occlusion query towards a light. Its throughput is
        /// the full contribution deposited if nothing blocks it.
        const SHADOW = 0b0000_0001;
    }
}

/// Result of intersecting a ray against the committed scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Parametric distance along the ray.
    pub t: Float,

    /// Index of the hit surface in the scene's surface table.
    pub surface: u32,

    /// Index of the hit primitive within the surface.
    pub primitive: u32,

    /// First surface parameter (barycentric or parametric).
    pub u: Float,

    /// Second surface parameter.
    pub v: Float,

    /// Unit geometric normal at the hit point.
    pub n: Vector3f,
}

/// A ray in its working form. The pipeline stage that currently owns a
/// batch is the only writer of its rays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction (normalized).
    pub d: Vector3f,

    /// Start of the parametric interval.
    pub t_min: Float,

    /// End of the parametric interval.
    pub t_max: Float,

    /// Accumulated path weight.
    pub throughput: Spectrum,

    /// Owning pixel x-coordinate.
    pub pixel_x: u32,

    /// Owning pixel y-coordinate.
    pub pixel_y: u32,

    /// Index of the sample within the pixel.
    pub sample: u32,

    /// Bounce depth; camera rays have depth 0.
    pub depth: u32,

    /// Flags.
    pub flags: RayFlags,

    /// Intersection result; `None` until intersected, and `None` afterwards
    /// for a miss.
    pub hit: Option<Hit>,
}

impl Ray {
    /// Returns a camera ray for the given pixel sample.
    ///
    /// * `o`       - Origin.
    /// * `d`       - Direction.
    /// * `pixel_x` - Pixel x-coordinate.
    /// * `pixel_y` - Pixel y-coordinate.
    /// * `sample`  - Sample index within the pixel.
    pub fn camera(o: Point3f, d: Vector3f, pixel_x: u32, pixel_y: u32, sample: u32) -> Self {
        Self {
            o,
            d,
            t_min: 0.0,
            t_max: INFINITY,
            throughput: Spectrum::ONE,
            pixel_x,
            pixel_y,
            sample,
            depth: 0,
            flags: RayFlags::empty(),
            hit: None,
        }
    }

    /// Returns a ray continuing the path of `parent` in a new direction,
    /// one bounce deeper.
    ///
    /// * `parent`     - The ray being continued.
    /// * `o`          - Origin.
    /// * `d`          - Direction.
    /// * `throughput` - Path weight of the new ray.
    pub fn spawn(parent: &Ray, o: Point3f, d: Vector3f, throughput: Spectrum) -> Self {
        Self {
            o,
            d,
            t_min: 0.0,
            t_max: INFINITY,
            throughput,
            pixel_x: parent.pixel_x,
            pixel_y: parent.pixel_y,
            sample: parent.sample,
            depth: parent.depth + 1,
            flags: RayFlags::empty(),
            hit: None,
        }
    }

    /// Returns a shadow ray for `parent` that carries `contribution` and
    /// ends just short of `distance`.
    ///
    /// * `parent`       - The ray whose sample receives the contribution.
    /// * `o`            - Origin.
    /// * `d`            - Direction towards the light.
    /// * `distance`     - Distance to the light sample.
    /// * `contribution` - Radiance deposited if the ray is unoccluded.
    pub fn shadow(parent: &Ray, o: Point3f, d: Vector3f, distance: Float, contribution: Spectrum) -> Self {
        Self {
            t_max: distance * (1.0 - SHADOW_EPSILON),
            flags: RayFlags::SHADOW,
            ..Self::spawn(parent, o, d, contribution)
        }
    }

    /// Returns true for occlusion queries.
    pub fn is_shadow(&self) -> bool {
        self.flags.contains(RayFlags::SHADOW)
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns the direction class the ray is binned under.
    pub fn direction_class(&self) -> DirectionClass {
        DirectionClass::classify(&self.d)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ray o={} d={} pixel=({}, {}) sample={} depth={}",
            self.o, self.d, self.pixel_x, self.pixel_y, self.sample, self.depth
        )
    }
}
