//! Terminal Rays
//!
//! Rays that end without shading: an unoccluded shadow ray deposits the
//! contribution it carries, a camera or bounce ray leaving the scene deposits
//! its throughput times the background, an occluded shadow ray deposits
//! nothing.

use crate::image::*;
use crate::ray::*;
use crate::spectrum::*;
use rayon::prelude::*;

/// Returns the radiance a terminal ray deposits.
///
/// * `ray`        - The intersected ray.
/// * `background` - Radiance of rays leaving the scene.
#[inline]
pub fn terminal_radiance(ray: &Ray, background: &Spectrum) -> Spectrum {
    match (ray.is_shadow(), ray.hit.is_some()) {
        (true, false) => ray.throughput,
        (false, false) => ray.throughput * *background,
        (_, true) => Spectrum::ZERO,
    }
}

/// Deposit the contributions of terminal rays.
///
/// * `image`      - The image accumulator.
/// * `rays`       - The terminal tail of a batch in shading order.
/// * `background` - Radiance of rays leaving the scene.
pub fn resolve_terminal(image: &Image, rays: &[Ray], background: &Spectrum) {
    rays.par_iter().for_each(|ray| {
        let l = terminal_radiance(ray, background);
        if !l.is_black() {
            image.accumulate_sample(ray.pixel_x as usize, ray.pixel_y as usize, ray.sample as usize, &l);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;

    #[test]
    fn terminal_contributions() {
        let bg = Spectrum::rgb(0.5, 0.5, 1.0);
        let camera = Ray::camera(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0, 0, 0);
        let bounce = Ray::spawn(&camera, Point3f::zero(), Vector3f::new(0.0, 1.0, 0.0), Spectrum::new(0.5));
        let mut shadow = Ray::shadow(&camera, Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), 2.0, Spectrum::new(3.0));

        assert_eq!(terminal_radiance(&camera, &bg), bg);
        assert_eq!(terminal_radiance(&bounce, &bg), Spectrum::rgb(0.25, 0.25, 0.5));
        assert_eq!(terminal_radiance(&shadow, &bg), Spectrum::new(3.0));

        shadow.hit = Some(Hit {
            t: 1.0,
            surface: 0,
            primitive: 0,
            u: 0.0,
            v: 0.0,
            n: Vector3f::new(-1.0, 0.0, 0.0),
        });
        assert!(terminal_radiance(&shadow, &bg).is_black());
    }
}
