//! Lambertian Shader

use core::common::*;
use core::geometry::*;
use core::ray::*;
use core::rng::*;
use core::sampling::*;
use core::shader::*;
use core::texture::*;

/// Ideal diffuse reflector. Emission of the hit surface is added for camera
/// rays; direct lighting is estimated with one shadow ray per hit towards a
/// uniformly chosen light and indirect lighting by one cosine-weighted
/// bounce ray. Paths with low throughput are terminated by Russian roulette.
#[derive(Clone, Debug)]
pub struct LambertShader {
    /// Diffuse reflectance.
    pub albedo: Texture,
}

impl LambertShader {
    /// Create a new `LambertShader`.
    ///
    /// * `albedo` - Diffuse reflectance.
    pub fn new(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Shader for LambertShader {
    /// Shade a run of intersected rays that all hit the same surface.
    ///
    /// * `ctx`      - The scene, settings and surface.
    /// * `rays`     - The run.
    /// * `textures` - The calling worker's texture handle.
    /// * `rng`      - The calling worker's random number generator.
    /// * `result`   - Receives radiance and spawned rays.
    fn shade(
        &self,
        ctx: &ShadingContext,
        rays: &[Ray],
        textures: &mut TextureHandle,
        rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String> {
        let settings = ctx.settings;
        let lights = ctx.scene.lights();
        let emitter = ctx.scene.surface_light(ctx.surface);

        for (i, ray) in rays.iter().enumerate() {
            let hit = ray
                .hit
                .ok_or_else(|| format!("LambertShader::shade(): {ray} has no hit"))?;

            // Camera rays see emitters directly; later bounces pick up
            // emission through shadow rays.
            if ray.depth == 0 {
                if let Some(light) = emitter {
                    result.radiance[i] = ray.throughput * light.le(&hit.n, &-ray.d);
                }
            }

            if ray.depth >= settings.max_depth {
                continue;
            }

            let albedo = self.albedo.evaluate(&Point2f::new(hit.u, hit.v), textures)?;
            if albedo.is_black() {
                continue;
            }

            // Face forward towards the incoming ray.
            let n = if hit.n.dot(&ray.d) > 0.0 { -hit.n } else { hit.n };
            let p = ray.at(hit.t) + n * RAY_OFFSET_EPSILON;
            let weight = ray.throughput * albedo;

            // Direct lighting.
            if !lights.is_empty() {
                let n_lights = lights.len();
                let l = min((rng.uniform_float() * n_lights as Float) as usize, n_lights - 1);
                let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
                if let Some(ls) = lights[l].sample_li(&p, &u) {
                    let cos_theta = n.dot(&ls.wi);
                    if cos_theta > 0.0 && ls.pdf > 0.0 && !ls.le.is_black() {
                        let contribution = weight * ls.le * (INV_PI * cos_theta * n_lights as Float / ls.pdf);
                        result.spawned.push(Ray::shadow(ray, p, ls.wi, ls.distance, contribution));
                    }
                }
            }

            // Indirect lighting; cosine sampling cancels the BRDF's cos / pi.
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let wi = local_to_world(&cosine_sample_hemisphere(&u), &n).normalize();
            if n.dot(&wi) <= 0.0 {
                continue;
            }

            let mut throughput = weight;
            let max_component = throughput.max_component_value();
            if ray.depth >= settings.min_depth && max_component < settings.threshold {
                let q = max_component / settings.threshold;
                if rng.uniform_float() >= q {
                    continue;
                }
                throughput = throughput / q;
            }
            result.spawned.push(Ray::spawn(ray, p, wi, throughput));
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scene::*;
    use core::light::*;
    use core::spectrum::*;
    use float_cmp::approx_eq;
    use std::sync::Arc;

    fn grey() -> LambertShader {
        LambertShader::new(Texture::Constant(Spectrum::new(0.5)))
    }

    fn lit_fixture() -> Fixture {
        let light: ArcLight = Arc::new(OverheadLight {
            le: Spectrum::new(4.0),
            height: 2.0,
        });
        Fixture::new(Some(light))
    }

    #[test]
    fn camera_ray_spawns_shadow_and_bounce() {
        let fixture = lit_fixture();
        let ray = fixture.hit_ray(0);
        let result = fixture.shade(&grey(), &[ray], 0);

        // Floor does not emit.
        assert!(result.radiance[0].is_black());
        assert_eq!(result.spawned.len(), 2);

        let shadow = &result.spawned[0];
        assert!(shadow.is_shadow());
        assert_eq!((shadow.pixel_x, shadow.pixel_y, shadow.sample), (3, 4, 5));
        assert_eq!(shadow.depth, 1);
        assert!(shadow.t_max < 2.0);
        let expected = 0.5 * 4.0 * INV_PI;
        assert!(approx_eq!(f32, shadow.throughput[0], expected, epsilon = 1e-5));

        let bounce = &result.spawned[1];
        assert!(!bounce.is_shadow());
        assert_eq!(bounce.depth, 1);
        assert!(bounce.d.y > 0.0);
        assert!(bounce.o.y > 0.0);
        assert_eq!(bounce.throughput, Spectrum::new(0.5));
    }

    #[test]
    fn emitter_seen_by_camera_ray() {
        let fixture = lit_fixture();
        let ray = fixture.hit_ray(1);
        let result = fixture.shade(&grey(), &[ray], 1);
        assert_eq!(result.radiance[0], Spectrum::new(4.0));

        // Bounce rays do not pick up emission a second time.
        let mut ray = fixture.hit_ray(1);
        ray.depth = 1;
        let result = fixture.shade(&grey(), &[ray], 1);
        assert!(result.radiance[0].is_black());
    }

    #[test]
    fn no_rays_at_max_depth() {
        let fixture = lit_fixture();
        let mut ray = fixture.hit_ray(0);
        ray.depth = fixture.settings.max_depth;
        let result = fixture.shade(&grey(), &[ray], 0);
        assert!(result.spawned.is_empty());
    }

    #[test]
    fn back_face_is_flipped() {
        let fixture = Fixture::new(None);
        let mut ray = fixture.hit_ray(0);
        if let Some(hit) = ray.hit.as_mut() {
            hit.n = Vector3f::new(0.0, -1.0, 0.0);
        }
        let result = fixture.shade(&grey(), &[ray], 0);
        assert_eq!(result.spawned.len(), 1);
        assert!(result.spawned[0].d.y > 0.0);
    }

    #[test]
    fn russian_roulette_rescales_survivors() {
        let fixture = Fixture::new(None);
        let threshold = fixture.settings.threshold;
        let mut ray = fixture.hit_ray(0);
        ray.depth = fixture.settings.min_depth;
        ray.throughput = Spectrum::new(threshold);

        // Weight after the bounce is threshold / 2, so half the paths survive.
        let rays = vec![ray; 64];
        let result = fixture.shade(&grey(), &rays, 0);
        assert!(!result.spawned.is_empty());
        assert!(result.spawned.len() < rays.len());
        for r in result.spawned.iter() {
            assert!(approx_eq!(f32, r.throughput[0], threshold, epsilon = 1e-6));
        }
    }
}
