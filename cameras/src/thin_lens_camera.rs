//! Thin Lens Camera

use crate::frame::*;
use core::camera::*;
use core::common::*;
use core::geometry::*;
use core::sampling::*;

/// Thin lens camera with depth of field. Points at `focal_distance` along the
/// viewing direction are in perfect focus.
pub struct ThinLensCamera {
    /// Camera frame.
    pub frame: CameraFrame,

    /// Distance to the plane of focus.
    pub focal_distance: Float,

    /// Lens radius; 0 degenerates to a pinhole.
    pub lens_radius: Float,
}

impl ThinLensCamera {
    /// Create a new thin lens camera.
    ///
    /// * `origin`         - Camera position.
    /// * `direction`      - Viewing direction.
    /// * `focal_length`   - Distance to the film; controls the field of view.
    /// * `focal_distance` - Distance to the plane of focus.
    /// * `aperture`       - f-number; the lens radius is
    ///                      `focal_length / (2 * aperture)`.
    /// * `resolution`     - Image width and height in pixels.
    pub fn new(
        origin: Point3f,
        direction: Vector3f,
        focal_length: Float,
        focal_distance: Float,
        aperture: Float,
        resolution: (usize, usize),
    ) -> Result<Self, String> {
        if !(focal_distance > 0.0) {
            return Err(format!(
                "ThinLensCamera::new(): invalid focal distance {focal_distance}"
            ));
        }
        if !(aperture > 0.0) {
            return Err(format!("ThinLensCamera::new(): invalid aperture {aperture}"));
        }

        let frame = CameraFrame::new(origin, direction, focal_length, resolution)?;
        let lens_radius = focal_length / (2.0 * aperture);
        debug!(
            "Thin lens camera at {origin}, focus {focal_distance}, lens radius {lens_radius}"
        );

        Ok(Self {
            frame,
            focal_distance,
            lens_radius,
        })
    }
}

impl Camera for ThinLensCamera {
    /// Returns the origin and normalized direction of the ray for a sample.
    ///
    /// * `sample` - The film and lens sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Point3f, Vector3f) {
        let frame = &self.frame;
        let d = frame.film_direction(&sample.p_film).normalize();

        // Point on the plane of focus hit by the pinhole ray.
        let t = self.focal_distance / d.dot(&frame.forward);
        let p_focus = frame.origin + d * t;

        let p_lens = concentric_sample_disk(&sample.p_lens);
        let o = frame.origin
            + frame.right * (self.lens_radius * p_lens.x)
            + frame.up * (self.lens_radius * p_lens.y);

        (o, (p_focus - o).normalize())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
