//! Intersect

use crate::ray::*;
use crate::scene::*;
use rayon::prelude::*;

/// Intersect every ray of a batch, recording the nearest hit or a miss.
///
/// * `intersector` - The intersection capability.
/// * `rays`        - The batch.
pub fn intersect_all(intersector: &dyn Intersector, rays: &mut [Ray]) {
    rays.par_iter_mut().for_each(|ray| {
        ray.hit = intersector.intersect(ray);
    });
}
