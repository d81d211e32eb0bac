//! Sampler

use crate::geometry::*;
use crate::rng::*;
use std::sync::Arc;

/// Sampler interface. Generates the sub-pixel positions of one pixel's
/// samples.
pub trait Sampler: Send + Sync {
    /// Fill `out` with `base * base` offsets in [0, 1)^2. Offset `s` must lie
    /// in grid cell (`s % base`, `s / base`) so filters can weight by cell.
    ///
    /// * `base` - Per-axis supersampling factor.
    /// * `rng`  - Random number generator of the calling camera bucket.
    /// * `out`  - Receives the offsets.
    fn sample(&self, base: usize, rng: &mut RNG, out: &mut Vec<Point2f>);
}

/// Atomic reference counted `Sampler`.
pub type ArcSampler = Arc<dyn Sampler>;
