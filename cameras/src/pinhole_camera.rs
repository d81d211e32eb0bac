//! Pinhole Camera

use crate::frame::*;
use core::camera::*;
use core::common::*;
use core::geometry::*;

/// Ideal pinhole camera; every ray starts at the camera origin.
pub struct PinholeCamera {
    /// Camera frame.
    pub frame: CameraFrame,
}

impl PinholeCamera {
    /// Create a new pinhole camera.
    ///
    /// * `origin`       - Camera position.
    /// * `direction`    - Viewing direction.
    /// * `focal_length` - Distance to the film; controls the field of view.
    /// * `resolution`   - Image width and height in pixels.
    pub fn new(
        origin: Point3f,
        direction: Vector3f,
        focal_length: Float,
        resolution: (usize, usize),
    ) -> Result<Self, String> {
        let frame = CameraFrame::new(origin, direction, focal_length, resolution)?;
        debug!("Pinhole camera at {origin} looking along {}", frame.forward);
        Ok(Self { frame })
    }
}

impl Camera for PinholeCamera {
    /// Returns the origin and normalized direction of the ray for a sample.
    ///
    /// * `sample` - The film and lens sample; the lens sample is ignored.
    fn generate_ray(&self, sample: &CameraSample) -> (Point3f, Vector3f) {
        (self.frame.origin, self.frame.film_direction(&sample.p_film).normalize())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
