//! Null Shader

use core::ray::*;
use core::rng::*;
use core::shader::*;
use core::texture::*;

/// A shader that contributes nothing and spawns no rays.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullShader;

impl Shader for NullShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        _rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        _result: &mut ShadingResult,
    ) -> Result<(), String> {
        Ok(())
    }
}
