//! Grid Sampler

use core::geometry::*;
use core::rng::*;
use core::sampler::*;
use core::sampling::*;

/// Places one sample at the centre of each cell of a `base` x `base` grid.
/// Deterministic; the random number generator is not consumed.
#[derive(Copy, Clone, Debug, Default)]
pub struct GridSampler;

impl GridSampler {
    /// Create a new `GridSampler`.
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for GridSampler {
    fn sample(&self, base: usize, rng: &mut RNG, out: &mut Vec<Point2f>) {
        stratified_sample_2d(rng, base, base, false, out);
    }
}
