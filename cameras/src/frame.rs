//! Camera Frame

use core::common::*;
use core::geometry::*;

/// World up direction used to orient cameras.
pub const WORLD_UP: Vector3f = Vector3f::new(0.0, 1.0, 0.0);

/// Position, orientation and film geometry shared by the cameras. The film
/// has height 1 and sits `focal_length` in front of the origin; its width
/// follows the image aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraFrame {
    /// Camera position.
    pub origin: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Unit film x-axis.
    pub right: Vector3f,

    /// Unit film y-axis.
    pub up: Vector3f,

    /// Distance from the origin to the film.
    pub focal_length: Float,

    /// Image width in pixels.
    pub width: Float,

    /// Image height in pixels.
    pub height: Float,
}

impl CameraFrame {
    /// Create a new `CameraFrame`.
    ///
    /// * `origin`       - Camera position.
    /// * `direction`    - Viewing direction.
    /// * `focal_length` - Distance from the origin to the film.
    /// * `resolution`   - Image width and height in pixels.
    pub fn new(
        origin: Point3f,
        direction: Vector3f,
        focal_length: Float,
        resolution: (usize, usize),
    ) -> Result<Self, String> {
        if direction.has_nans() || direction.length_squared() == 0.0 {
            return Err(format!("CameraFrame::new(): invalid direction {direction}"));
        }
        if !(focal_length > 0.0) {
            return Err(format!("CameraFrame::new(): invalid focal length {focal_length}"));
        }
        if resolution.0 == 0 || resolution.1 == 0 {
            return Err(format!(
                "CameraFrame::new(): invalid resolution {}x{}",
                resolution.0, resolution.1
            ));
        }

        let forward = direction.normalize();

        // Looking straight up or down; use the z-axis as reference instead.
        let reference_up = if WORLD_UP.cross(&forward).length_squared() < 1e-8 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            WORLD_UP
        };
        let right = reference_up.cross(&forward).normalize();
        let up = forward.cross(&right);

        Ok(Self {
            origin,
            forward,
            right,
            up,
            focal_length,
            width: resolution.0 as Float,
            height: resolution.1 as Float,
        })
    }

    /// Returns the unnormalized direction from the origin through a film
    /// position.
    ///
    /// * `p_film` - Raster position; y increases downwards.
    pub fn film_direction(&self, p_film: &Point2f) -> Vector3f {
        let aspect = self.width / self.height;
        let sx = (p_film.x / self.width - 0.5) * aspect;
        let sy = 0.5 - p_film.y / self.height;
        self.right * sx + self.up * sy + self.forward * self.focal_length
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn centre_of_film_looks_forward() {
        let frame = CameraFrame::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 2.0), 1.5, (640, 480)).unwrap();
        assert_eq!(frame.right, Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(frame.up, Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(
            frame.film_direction(&Point2f::new(320.0, 240.0)),
            Vector3f::new(0.0, 0.0, 1.5)
        );

        // Top-left corner is left and up.
        let d = frame.film_direction(&Point2f::new(0.0, 0.0));
        assert!(approx_eq!(f32, d.x, -0.5 * 640.0 / 480.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, d.y, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn vertical_view_uses_fallback_up() {
        let frame = CameraFrame::new(Point3f::zero(), Vector3f::new(0.0, -1.0, 0.0), 1.0, (8, 8)).unwrap();
        assert!(approx_eq!(f32, frame.right.length(), 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, frame.up.dot(&frame.forward), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let z = Vector3f::new(0.0, 0.0, 1.0);
        assert!(CameraFrame::new(Point3f::zero(), Vector3f::zero(), 1.0, (8, 8)).is_err());
        assert!(CameraFrame::new(Point3f::zero(), z, 0.0, (8, 8)).is_err());
        assert!(CameraFrame::new(Point3f::zero(), z, 1.0, (0, 8)).is_err());
    }
}
