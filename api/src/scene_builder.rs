//! Scene Builder

use core::geometry::*;
use core::light::*;
use core::scene::*;
use core::shader::*;
use core::shape::*;
use core::spectrum::*;
use lights::*;
use shapes::*;
use std::sync::Arc;

/// Collects surfaces and lights and commits them to a `Scene`.
#[derive(Default)]
pub struct SceneBuilder {
    /// The surface table being built.
    surfaces: Vec<Surface>,

    /// Light sources.
    lights: Vec<ArcLight>,
}

impl SceneBuilder {
    /// Returns a new empty `SceneBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-emitting surface. Returns its surface id.
    ///
    /// * `shape`  - Geometry.
    /// * `shader` - Shader for rays hitting the surface.
    pub fn add_surface(&mut self, shape: ArcShape, shader: ArcShader) -> usize {
        self.surfaces.push(Surface {
            shape,
            shader,
            light: None,
        });
        self.surfaces.len() - 1
    }

    /// Add a light that is not part of the surface table.
    ///
    /// * `light` - The light.
    pub fn add_light(&mut self, light: ArcLight) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Add a one-sided rectangular emitter. The light and its visible quad
    /// share the geometry; the emitting side faces `e1 x e2`. Returns the
    /// surface id.
    ///
    /// * `corner`   - First corner.
    /// * `e1`       - First edge.
    /// * `e2`       - Second edge.
    /// * `radiance` - Emitted radiance.
    /// * `shader`   - Shader for rays hitting the emitter.
    pub fn add_quad_light(
        &mut self,
        corner: Point3f,
        e1: Vector3f,
        e2: Vector3f,
        radiance: Spectrum,
        shader: ArcShader,
    ) -> Result<usize, String> {
        let light = QuadLight::new(corner, e1, e2, radiance, false)?;
        let shape = TriangleMesh::quad(corner, e1, e2)?;
        let light = self.add_light(Arc::new(light));
        self.surfaces.push(Surface {
            shape: Arc::new(shape),
            shader,
            light: Some(light),
        });
        Ok(self.surfaces.len() - 1)
    }

    /// Returns the number of surfaces added so far.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns true if no surface was added.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Commit the scene.
    pub fn build(self) -> Result<Arc<Scene>, String> {
        if self.surfaces.is_empty() {
            warn!("Building a scene without surfaces");
        }
        Scene::new(self.surfaces, self.lights).map(Arc::new)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use core::ray::*;
    use shaders::*;

    #[test]
    fn emitters_reference_their_light() {
        let mut builder = SceneBuilder::new();
        let floor = builder.add_surface(
            Arc::new(Sphere::new(Point3f::new(0.0, -101.0, 0.0), 100.0).unwrap()),
            Arc::new(NullShader),
        );
        let lamp = builder
            .add_quad_light(
                Point3f::new(-1.0, 2.0, -1.0),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 2.0),
                Spectrum::new(10.0),
                Arc::new(NullShader),
            )
            .unwrap();
        assert_eq!((floor, lamp), (0, 1));

        let scene = builder.build().unwrap();
        assert_eq!(scene.lights().len(), 1);
        assert!(scene.surface_light(floor).is_none());
        assert!(scene.surface_light(lamp).is_some());

        // Looking up hits the emitter from below.
        let o = Point3f::new(0.3, 0.0, -0.2);
        let ray = Ray::camera(o, Vector3f::new(0.0, 1.0, 0.0), 0, 0, 0);
        let hit = scene.intersect(&ray).unwrap();
        assert_eq!(hit.surface, lamp as u32);
        assert_eq!(hit.n, Vector3f::new(0.0, -1.0, 0.0));

        // Looking down hits the floor.
        let ray = Ray::camera(o, Vector3f::new(0.0, -1.0, 0.0), 0, 0, 0);
        assert_eq!(scene.intersect(&ray).unwrap().surface, floor as u32);
    }

    #[test]
    fn degenerate_light_is_rejected() {
        let mut builder = SceneBuilder::new();
        let e = Vector3f::new(1.0, 0.0, 0.0);
        assert!(builder
            .add_quad_light(Point3f::zero(), e, e, Spectrum::ONE, Arc::new(NullShader))
            .is_err());
        assert!(builder.is_empty());
    }
}
