//! Spheres

use core::common::*;
use core::geometry::*;
use core::ray::*;
use core::shape::*;

/// A sphere given by its centre and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Centre of the sphere.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center` - Centre of the sphere.
    /// * `radius` - Radius of sphere.
    pub fn new(center: Point3f, radius: Float) -> Result<Self, String> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(format!("Sphere::new(): invalid radius {radius}"));
        }
        Ok(Self { center, radius })
    }
}

impl Shape for Sphere {
    /// Returns the world space bounding box.
    fn bounds(&self) -> Bounds3f {
        let r = Vector3f::splat(self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns the nearest intersection within `(ray.t_min, t_max]`.
    ///
    /// * `ray`   - The ray.
    /// * `t_max` - End of the search interval.
    fn intersect(&self, ray: &Ray, t_max: Float) -> Option<ShapeHit> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;

        // Solve quadratic equation for t values.
        let (t0, t1) = quadratic(a, b, c)?;
        if t0 > t_max || t1 <= ray.t_min {
            return None;
        }

        let t = if t0 > ray.t_min { t0 } else { t1 };
        if t > t_max {
            return None;
        }

        let n = ((ray.at(t) - self.center) / self.radius).normalize();

        // Spherical parameterization.
        let mut phi = n.y.atan2(n.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = clamp(n.z, -1.0, 1.0).acos();

        Some(ShapeHit {
            t,
            primitive: 0,
            u: phi / TWO_PI,
            v: theta / PI,
            n,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
