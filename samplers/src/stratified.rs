//! Stratified Sampler

use core::geometry::*;
use core::rng::*;
use core::sampler::*;
use core::sampling::*;

/// Subdivides the pixel into a `base` x `base` grid and places one jittered
/// sample in each cell.
#[derive(Copy, Clone, Debug, Default)]
pub struct StratifiedSampler;

impl StratifiedSampler {
    /// Create a new `StratifiedSampler`.
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for StratifiedSampler {
    /// Fill `out` with one jittered offset per grid cell.
    ///
    /// * `base` - Per-axis supersampling factor.
    /// * `rng`  - Random number generator.
    /// * `out`  - Receives the offsets.
    fn sample(&self, base: usize, rng: &mut RNG, out: &mut Vec<Point2f>) {
        stratified_sample_2d(rng, base, base, true, out);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use core::common::*;

    #[test]
    fn one_sample_per_cell() {
        for base in 1..9 {
            for seed in [0, 1, 17, 999] {
                let mut rng = RNG::new(seed);
                let mut out = vec![];
                StratifiedSampler::new().sample(base, &mut rng, &mut out);

                assert_eq!(out.len(), base * base);
                let b = base as Float;
                for (s, p) in out.iter().enumerate() {
                    let (i, j) = ((s % base) as Float, (s / base) as Float);
                    assert!(p.x >= 0.0 && p.x < 1.0 && p.y >= 0.0 && p.y < 1.0);
                    assert!(p.x * b >= i - 1e-4 && p.x * b <= i + 1.0 + 1e-4);
                    assert!(p.y * b >= j - 1e-4 && p.y * b <= j + 1.0 + 1e-4);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let (mut a, mut b) = (vec![], vec![]);
        StratifiedSampler::new().sample(4, &mut RNG::new(3), &mut a);
        StratifiedSampler::new().sample(4, &mut RNG::new(3), &mut b);
        assert_eq!(a, b);
    }
}
