//! Quad Area Light Source

use core::common::*;
use core::geometry::*;
use core::light::*;
use core::spectrum::*;

/// Implements a parallelogram shaped area light with uniform radiance,
/// spanning `corner + s * e1 + t * e2` for `s, t` in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadLight {
    /// First corner.
    pub corner: Point3f,

    /// First edge.
    pub e1: Vector3f,

    /// Second edge.
    pub e2: Vector3f,

    /// Emitted radiance.
    pub radiance: Spectrum,

    /// Unit normal of the emitting face, `e1 x e2` normalized.
    pub n: Vector3f,

    /// Surface area.
    pub area: Float,

    /// Indicates whether the light emits from both faces.
    pub two_sided: bool,
}

impl QuadLight {
    /// Returns a new `QuadLight`.
    ///
    /// * `corner`    - First corner.
    /// * `e1`        - First edge.
    /// * `e2`        - Second edge.
    /// * `radiance`  - Emitted radiance.
    /// * `two_sided` - Emit from both faces.
    pub fn new(
        corner: Point3f,
        e1: Vector3f,
        e2: Vector3f,
        radiance: Spectrum,
        two_sided: bool,
    ) -> Result<Self, String> {
        let cross = e1.cross(&e2);
        let area = cross.length();
        if !(area > 0.0) {
            return Err(format!("QuadLight::new(): degenerate edges {e1} and {e2}"));
        }
        if radiance.has_nans() {
            return Err(format!("QuadLight::new(): invalid radiance {radiance}"));
        }
        debug!("Quad light at {corner}, area {area}, radiance {radiance}");

        Ok(Self {
            corner,
            e1,
            e2,
            radiance,
            n: cross / area,
            area,
            two_sided,
        })
    }
}

impl Light for QuadLight {
    /// Sample a point uniformly by area and convert the density to solid
    /// angle at the reference point.
    ///
    /// * `p` - Reference point.
    /// * `u` - Uniform sample in [0, 1)^2.
    fn sample_li(&self, p: &Point3f, u: &Point2f) -> Option<LightSample> {
        let p_light = self.corner + self.e1 * u.x + self.e2 * u.y;
        let to_light = p_light - *p;
        let dist_sq = to_light.length_squared();
        if dist_sq == 0.0 {
            return None;
        }

        let distance = dist_sq.sqrt();
        let wi = to_light / distance;
        let mut cos_l = -self.n.dot(&wi);
        if self.two_sided {
            cos_l = cos_l.abs();
        }
        if cos_l <= 0.0 {
            return None;
        }

        Some(LightSample {
            p: p_light,
            wi,
            distance,
            le: self.radiance,
            pdf: dist_sq / (cos_l * self.area),
        })
    }

    /// Returns the radiance emitted from the light towards `w`.
    ///
    /// * `n` - Surface normal at the emitting point.
    /// * `w` - Outgoing direction.
    fn le(&self, n: &Vector3f, w: &Vector3f) -> Spectrum {
        if self.two_sided || n.dot(w) > 0.0 {
            self.radiance
        } else {
            Spectrum::ZERO
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// A 2x2 light at y = 2 facing down.
    fn ceiling(two_sided: bool) -> QuadLight {
        QuadLight::new(
            Point3f::new(-1.0, 2.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Spectrum::new(5.0),
            two_sided,
        )
        .unwrap()
    }

    #[test]
    fn normal_and_area() {
        let light = ceiling(false);
        assert_eq!(light.area, 4.0);
        assert_eq!(light.n, Vector3f::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn degenerate_light() {
        let e = Vector3f::new(1.0, 0.0, 0.0);
        assert!(QuadLight::new(Point3f::zero(), e, e, Spectrum::ONE, false).is_err());
    }

    #[test]
    fn sample_directly_below_centre() {
        let light = ceiling(false);
        let ls = light.sample_li(&Point3f::zero(), &Point2f::new(0.5, 0.5)).unwrap();
        assert_eq!(ls.p, Point3f::new(0.0, 2.0, 0.0));
        assert_eq!(ls.wi, Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(ls.distance, 2.0);
        assert_eq!(ls.le, Spectrum::new(5.0));
        assert!(approx_eq!(f32, ls.pdf, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn back_face() {
        let light = ceiling(false);
        let above = Point3f::new(0.0, 3.0, 0.0);
        assert!(light.sample_li(&above, &Point2f::new(0.5, 0.5)).is_none());
        assert!(light.le(&light.n, &Vector3f::new(0.0, 1.0, 0.0)).is_black());
        assert_eq!(light.le(&light.n, &Vector3f::new(0.0, -1.0, 0.0)), Spectrum::new(5.0));

        let light = ceiling(true);
        assert!(light.sample_li(&above, &Point2f::new(0.5, 0.5)).is_some());
        assert!(!light.le(&light.n, &Vector3f::new(0.0, 1.0, 0.0)).is_black());
    }

    #[test]
    fn samples_lie_on_light() {
        let light = ceiling(false);
        for j in 0..10 {
            for i in 0..10 {
                let u = Point2f::new(i as f32 / 10.0, j as f32 / 10.0);
                let ls = light.sample_li(&Point3f::zero(), &u).unwrap();
                assert!(approx_eq!(f32, ls.p.y, 2.0, epsilon = 1e-6));
                assert!(ls.p.x >= -1.0 && ls.p.x <= 1.0);
                assert!(ls.p.z >= -1.0 && ls.p.z <= 1.0);
                assert!(ls.pdf > 0.0);
                assert!(approx_eq!(f32, ls.wi.length(), 1.0, epsilon = 1e-5));
            }
        }
    }
}
