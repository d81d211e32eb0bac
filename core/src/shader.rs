//! Shader

use crate::ray::*;
use crate::rng::*;
use crate::scene::*;
use crate::settings::*;
use crate::spectrum::*;
use crate::texture::*;
use std::sync::Arc;

/// What a shader may read while shading one run.
pub struct ShadingContext<'a> {
    /// The committed scene.
    pub scene: &'a Scene,

    /// Renderer settings.
    pub settings: &'a Settings,

    /// Index of the surface every ray of the run hit.
    pub surface: usize,
}

/// What a shader produces for one run. Reused across runs by each worker.
#[derive(Default)]
pub struct ShadingResult {
    /// Radiance deposited into the sample of each ray of the run, in run order.
    pub radiance: Vec<Spectrum>,

    /// Newly spawned secondary and shadow rays.
    pub spawned: Vec<Ray>,
}

impl ShadingResult {
    /// Prepare for a run of `n` rays.
    ///
    /// * `n` - Number of rays in the run.
    pub fn reset(&mut self, n: usize) {
        self.radiance.clear();
        self.radiance.resize(n, Spectrum::ZERO);
        self.spawned.clear();
    }
}

/// Surface shading interface.
pub trait Shader: Send + Sync {
    /// Shade a run of intersected rays that all hit the same surface.
    ///
    /// * `ctx`      - The scene, settings and surface.
    /// * `rays`     - The run; every ray has a hit on `ctx.surface`.
    /// * `textures` - The calling worker's texture handle.
    /// * `rng`      - The calling worker's random number generator.
    /// * `result`   - Receives radiance and spawned rays; already reset for
    ///                `rays.len()` rays.
    fn shade(
        &self,
        ctx: &ShadingContext,
        rays: &[Ray],
        textures: &mut TextureHandle,
        rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String>;
}

/// Atomic reference counted `Shader`.
pub type ArcShader = Arc<dyn Shader>;
