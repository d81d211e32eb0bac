//! Workers

use crate::batch::*;
use crate::rng::*;
use crate::shader::*;
use crate::texture::*;
use std::sync::Arc;

/// Seed stream offset separating shading generators from camera buckets.
const SHADING_STREAM_BASE: u64 = 1 << 48;

/// State owned by one worker thread for the lifetime of the renderer.
pub struct Worker {
    /// Worker index.
    index: usize,

    /// The worker's directional bins.
    pub bins: DirectionalBins,

    /// Shading random number generator; created on first use.
    rng: Option<RNG>,

    /// Texture handle; created on first use.
    textures: Option<TextureHandle>,

    /// Reused shading output.
    pub result: ShadingResult,
}

impl Worker {
    /// Create a new `Worker`.
    ///
    /// * `index`        - Worker index.
    /// * `bin_exponent` - Bin capacity exponent.
    pub fn new(index: usize, bin_exponent: usize) -> Self {
        Self {
            index,
            bins: DirectionalBins::new(bin_exponent),
            rng: None,
            textures: None,
            result: ShadingResult::default(),
        }
    }

    /// Returns the worker's shading state, creating it on first use.
    ///
    /// * `system` - The texture system handles are created from.
    pub fn shading_state(
        &mut self,
        system: &Arc<TextureSystem>,
    ) -> (&mut DirectionalBins, &mut RNG, &mut TextureHandle, &mut ShadingResult) {
        let index = self.index as u64;
        let rng = self.rng.get_or_insert_with(|| RNG::new(SHADING_STREAM_BASE + index));
        let textures = self.textures.get_or_insert_with(|| system.handle());
        (&mut self.bins, rng, textures, &mut self.result)
    }
}
