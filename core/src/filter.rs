//! Filter

use crate::spectrum::*;
use std::sync::Arc;

/// Pixel reconstruction filter interface.
pub trait Filter: Send + Sync {
    /// Reduce the samples of one pixel to a single value.
    ///
    /// * `base`    - Per-axis supersampling factor.
    /// * `samples` - The `base * base` samples of the pixel; sample `s` was
    ///               taken in grid cell (`s % base`, `s / base`).
    fn convolve(&self, base: usize, samples: &[Spectrum]) -> Spectrum;
}

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter>;
