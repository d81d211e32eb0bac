//! Fixtures for shader tests.

use core::common::*;
use core::geometry::*;
use core::light::*;
use core::ray::*;
use core::rng::*;
use core::scene::*;
use core::settings::*;
use core::shader::*;
use core::shape::*;
use core::spectrum::*;
use core::texture::*;
use std::sync::Arc;

/// Geometry that is never intersected; shaders only read the hit record.
pub struct NoShape;

impl Shape for NoShape {
    fn bounds(&self) -> Bounds3f {
        Bounds3f::EMPTY
    }

    fn intersect(&self, _ray: &Ray, _t_max: Float) -> Option<ShapeHit> {
        None
    }
}

/// A light that always returns the same sample straight above the origin.
pub struct OverheadLight {
    pub le: Spectrum,
    pub height: Float,
}

impl Light for OverheadLight {
    fn sample_li(&self, p: &Point3f, _u: &Point2f) -> Option<LightSample> {
        let target = Point3f::new(p.x, self.height, p.z);
        let distance = self.height - p.y;
        if distance <= 0.0 {
            return None;
        }
        Some(LightSample {
            p: target,
            wi: Vector3f::new(0.0, 1.0, 0.0),
            distance,
            le: self.le,
            pdf: 1.0,
        })
    }

    fn le(&self, n: &Vector3f, w: &Vector3f) -> Spectrum {
        if n.dot(w) > 0.0 {
            self.le
        } else {
            Spectrum::ZERO
        }
    }
}

/// Surface 0 is a floor; surface 1 exists and emits when a light is given.
pub struct Fixture {
    pub scene: Scene,
    pub settings: Settings,
    pub textures: Arc<TextureSystem>,
}

impl Fixture {
    pub fn new(light: Option<ArcLight>) -> Self {
        let surface = |light| Surface {
            shape: Arc::new(NoShape),
            shader: Arc::new(crate::NullShader),
            light,
        };
        let (surfaces, lights) = match light {
            Some(l) => (vec![surface(None), surface(Some(0))], vec![l]),
            None => (vec![surface(None), surface(None)], vec![]),
        };

        Self {
            scene: Scene::new(surfaces, lights).unwrap(),
            settings: Settings::default(),
            textures: Arc::new(TextureSystem::new(".")),
        }
    }

    /// A downward ray from (0, 1, 0) that hit `surface` at the origin.
    pub fn hit_ray(&self, surface: u32) -> Ray {
        let mut ray = Ray::camera(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), 3, 4, 5);
        ray.hit = Some(Hit {
            t: 1.0,
            surface,
            primitive: 0,
            u: 0.5,
            v: 0.5,
            n: Vector3f::new(0.0, 1.0, 0.0),
        });
        ray
    }

    pub fn shade(&self, shader: &dyn Shader, rays: &[Ray], surface: usize) -> ShadingResult {
        let ctx = ShadingContext {
            scene: &self.scene,
            settings: &self.settings,
            surface,
        };
        let mut textures = self.textures.handle();
        let mut rng = RNG::new(0);
        let mut result = ShadingResult::default();
        result.reset(rays.len());
        shader.shade(&ctx, rays, &mut textures, &mut rng, &mut result).unwrap();
        result
    }
}
