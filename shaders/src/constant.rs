//! Constant Shader

use core::ray::*;
use core::rng::*;
use core::shader::*;
use core::spectrum::*;
use core::texture::*;

/// Deposits a flat colour weighted by the ray throughput; never spawns rays.
#[derive(Copy, Clone, Debug)]
pub struct ConstantShader {
    /// Colour returned for every hit.
    pub color: Spectrum,
}

impl ConstantShader {
    /// Create a new `ConstantShader`.
    ///
    /// * `color` - Colour returned for every hit.
    pub fn new(color: Spectrum) -> Self {
        Self { color }
    }
}

impl Shader for ConstantShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String> {
        for (ray, l) in rays.iter().zip(result.radiance.iter_mut()) {
            *l = ray.throughput * self.color;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scene::*;

    #[test]
    fn colour_times_throughput() {
        let fixture = Fixture::new(None);
        let mut rays = vec![fixture.hit_ray(0); 2];
        rays[1].throughput = Spectrum::new(0.5);

        let shader = ConstantShader::new(Spectrum::rgb(1.0, 0.5, 0.25));
        let result = fixture.shade(&shader, &rays, 0);
        assert_eq!(result.radiance[0], Spectrum::rgb(1.0, 0.5, 0.25));
        assert_eq!(result.radiance[1], Spectrum::rgb(0.5, 0.25, 0.125));
        assert!(result.spawned.is_empty());
    }
}
