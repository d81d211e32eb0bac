//! Scene

use crate::common::*;
use crate::geometry::*;
use crate::light::*;
use crate::ray::*;
use crate::shader::*;
use crate::shape::*;
use std::sync::Arc;

/// One entry of the surface table.
#[derive(Clone)]
pub struct Surface {
    /// Geometry.
    pub shape: ArcShape,

    /// Shader invoked for rays hitting the surface.
    pub shader: ArcShader,

    /// Index into the scene's lights if the surface is an emitter.
    pub light: Option<usize>,
}

/// Nearest-hit intersection capability bound to a committed scene.
pub trait Intersector: Send + Sync {
    /// Returns the nearest hit within the ray's interval.
    ///
    /// * `ray` - The ray.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;
}

/// Atomic reference counted `Intersector`.
pub type ArcIntersector = Arc<dyn Intersector>;

/// The committed scene: surfaces and the lights they reference.
pub struct Scene {
    /// The surface table; hit surface ids index into it.
    surfaces: Vec<Surface>,

    /// Surface bounds, cached for the intersection loop.
    surface_bounds: Vec<Bounds3f>,

    /// Light sources.
    lights: Vec<ArcLight>,

    /// The bounding box of the scene geometry.
    world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `surfaces` - The surface table.
    /// * `lights`   - Light sources referenced by the surfaces.
    pub fn new(surfaces: Vec<Surface>, lights: Vec<ArcLight>) -> Result<Self, String> {
        if surfaces.len() > u32::MAX as usize {
            return Err(format!("Too many surfaces ({})", surfaces.len()));
        }
        for (i, surface) in surfaces.iter().enumerate() {
            if let Some(l) = surface.light {
                if l >= lights.len() {
                    return Err(format!(
                        "Surface {i} references light {l} but the scene has {} lights",
                        lights.len()
                    ));
                }
            }
        }

        let surface_bounds: Vec<Bounds3f> = surfaces.iter().map(|s| s.shape.bounds()).collect();
        let world_bound = surface_bounds.iter().fold(Bounds3f::EMPTY, |b, s| b.union(s));
        info!("Scene has {} surfaces and {} lights", surfaces.len(), lights.len());

        Ok(Self {
            surfaces,
            surface_bounds,
            lights,
            world_bound,
        })
    }

    /// Returns the surface table.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Returns a surface.
    ///
    /// * `i` - Surface id.
    pub fn surface(&self, i: usize) -> &Surface {
        &self.surfaces[i]
    }

    /// Returns the light sources.
    pub fn lights(&self) -> &[ArcLight] {
        &self.lights
    }

    /// Returns the light a surface emits as, if any.
    ///
    /// * `surface` - Surface id.
    pub fn surface_light(&self, surface: usize) -> Option<&ArcLight> {
        self.surfaces[surface].light.map(|l| &self.lights[l])
    }

    /// Returns the bounding box of the scene geometry.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }
}

impl Intersector for Scene {
    /// Tests every surface whose bounds the ray enters.
    ///
    /// * `ray` - The ray.
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut t_max: Float = ray.t_max;
        let mut nearest = None;
        for (i, (surface, bounds)) in self.surfaces.iter().zip(self.surface_bounds.iter()).enumerate() {
            if bounds.intersect_p(&ray.o, &ray.d, ray.t_min, t_max).is_none() {
                continue;
            }
            if let Some(h) = surface.shape.intersect(ray, t_max) {
                t_max = h.t;
                nearest = Some(Hit {
                    t: h.t,
                    surface: i as u32,
                    primitive: h.primitive,
                    u: h.u,
                    v: h.v,
                    n: h.n,
                });
            }
        }
        nearest
    }
}
