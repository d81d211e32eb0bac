//! Built-in Scenes

use crate::*;
use cameras::*;
use core::geometry::*;
use core::shader::*;
use core::spectrum::*;
use core::texture::*;
use filters::*;
use samplers::*;
use shaders::*;
use shapes::*;
use std::sync::Arc;

/// Names of the built-in scenes.
pub const SCENES: [&str; 3] = ["cornell", "spheres", "plane"];

/// Returns a built-in scene.
///
/// * `name`  - Scene name; see `SCENES`.
/// * `image` - Resolution and supersampling.
pub fn load_scene(name: &str, image: &ImageSettings) -> Result<SceneSetup, String> {
    let resolution = (image.width, image.height);
    match name {
        "cornell" => cornell(resolution),
        "spheres" => spheres(resolution),
        "plane" => plane(resolution),
        _ => Err(format!("Unknown scene '{name}'; expected one of {}", SCENES.join(", "))),
    }
}

fn lambert(albedo: Spectrum) -> ArcShader {
    Arc::new(LambertShader::new(Texture::Constant(albedo)))
}

fn quad(corner: Point3f, e1: Vector3f, e2: Vector3f) -> Result<Arc<TriangleMesh>, String> {
    TriangleMesh::quad(corner, e1, e2).map(Arc::new)
}

/// A closed box lit by a ceiling lamp, open towards the camera, with a
/// diffuse sphere and a checkered sphere.
fn cornell(resolution: (usize, usize)) -> Result<SceneSetup, String> {
    let white = lambert(Spectrum::new(0.73));
    let red = lambert(Spectrum::rgb(0.63, 0.065, 0.05));
    let green = lambert(Spectrum::rgb(0.14, 0.45, 0.091));

    let mut builder = SceneBuilder::new();

    // Floor, ceiling and back wall.
    builder.add_surface(
        quad(Point3f::new(-1.0, -1.0, -1.0), Vector3f::new(0.0, 0.0, 2.0), Vector3f::new(2.0, 0.0, 0.0))?,
        white.clone(),
    );
    builder.add_surface(
        quad(Point3f::new(-1.0, 1.0, -1.0), Vector3f::new(2.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 2.0))?,
        white.clone(),
    );
    builder.add_surface(
        quad(Point3f::new(-1.0, -1.0, 1.0), Vector3f::new(0.0, 2.0, 0.0), Vector3f::new(2.0, 0.0, 0.0))?,
        white.clone(),
    );

    // Left and right walls.
    builder.add_surface(
        quad(Point3f::new(-1.0, -1.0, -1.0), Vector3f::new(0.0, 2.0, 0.0), Vector3f::new(0.0, 0.0, 2.0))?,
        red,
    );
    builder.add_surface(
        quad(Point3f::new(1.0, -1.0, -1.0), Vector3f::new(0.0, 0.0, 2.0), Vector3f::new(0.0, 2.0, 0.0))?,
        green,
    );

    builder.add_quad_light(
        Point3f::new(-0.25, 0.999, -0.25),
        Vector3f::new(0.5, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 0.5),
        Spectrum::new(12.0),
        white.clone(),
    )?;

    builder.add_surface(Arc::new(Sphere::new(Point3f::new(-0.4, -0.6, 0.3), 0.4)?), white);
    builder.add_surface(
        Arc::new(Sphere::new(Point3f::new(0.45, -0.65, -0.2), 0.35)?),
        Arc::new(LambertShader::new(Texture::Checkerboard {
            even: Spectrum::new(0.8),
            odd: Spectrum::rgb(0.1, 0.1, 0.4),
            scale: 8.0,
        })),
    );

    Ok(SceneSetup {
        camera: Arc::new(ThinLensCamera::new(
            Point3f::new(0.0, 0.0, -3.4),
            Vector3f::new(0.0, 0.0, 1.0),
            2.0,
            3.6,
            32.0,
            resolution,
        )?),
        sampler: Arc::new(StratifiedSampler::new()),
        filter: Arc::new(TentFilter::new()),
        scene: builder.build()?,
    })
}

/// Spheres on a checkered ground plane under a large overhead lamp.
fn spheres(resolution: (usize, usize)) -> Result<SceneSetup, String> {
    let mut builder = SceneBuilder::new();

    builder.add_surface(
        quad(Point3f::new(-20.0, 0.0, -20.0), Vector3f::new(0.0, 0.0, 40.0), Vector3f::new(40.0, 0.0, 0.0))?,
        Arc::new(LambertShader::new(Texture::Checkerboard {
            even: Spectrum::new(0.75),
            odd: Spectrum::new(0.2),
            scale: 40.0,
        })),
    );

    let spheres = [
        (Point3f::new(-1.6, 0.7, 1.0), 0.7, Spectrum::rgb(0.8, 0.3, 0.3)),
        (Point3f::new(0.0, 1.0, 2.0), 1.0, Spectrum::rgb(0.3, 0.8, 0.3)),
        (Point3f::new(1.5, 0.5, 0.2), 0.5, Spectrum::rgb(0.3, 0.3, 0.8)),
    ];
    for (center, radius, albedo) in spheres {
        builder.add_surface(Arc::new(Sphere::new(center, radius)?), lambert(albedo));
    }

    builder.add_quad_light(
        Point3f::new(-2.0, 6.0, -1.0),
        Vector3f::new(4.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 4.0),
        Spectrum::new(6.0),
        lambert(Spectrum::new(0.5)),
    )?;

    Ok(SceneSetup {
        camera: Arc::new(ThinLensCamera::new(
            Point3f::new(0.0, 1.5, -5.0),
            Vector3f::new(0.0, -0.15, 1.0),
            1.2,
            6.5,
            16.0,
            resolution,
        )?),
        sampler: Arc::new(StratifiedSampler::new()),
        filter: Arc::new(BoxFilter::new()),
        scene: builder.build()?,
    })
}

/// A single flat-shaded quad filling the whole view. Every camera ray hits
/// it and nothing spawns secondary rays, so passes are deterministic.
fn plane(resolution: (usize, usize)) -> Result<SceneSetup, String> {
    let mut builder = SceneBuilder::new();

    // Offset so the diagonal shared by the two triangles stays out of view.
    builder.add_surface(
        quad(Point3f::new(-100.0, -50.0, 5.0), Vector3f::new(200.0, 0.0, 0.0), Vector3f::new(0.0, 200.0, 0.0))?,
        Arc::new(ConstantShader::new(Spectrum::new(0.5))),
    );

    Ok(SceneSetup {
        camera: Arc::new(PinholeCamera::new(
            Point3f::zero(),
            Vector3f::new(0.0, 0.0, 1.0),
            1.0,
            resolution,
        )?),
        sampler: Arc::new(GridSampler::new()),
        filter: Arc::new(BoxFilter::new()),
        scene: builder.build()?,
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_loads() {
        let image = ImageSettings {
            width: 16,
            height: 8,
            base: 1,
        };
        for name in SCENES {
            let setup = load_scene(name, &image).unwrap();
            assert!(!setup.scene.surfaces().is_empty(), "{name}");
        }
        assert_eq!(load_scene("cornell", &image).unwrap().scene.lights().len(), 1);
        assert!(load_scene("plane", &image).unwrap().scene.lights().is_empty());
    }

    #[test]
    fn unknown_scene() {
        let err = load_scene("teapot", &ImageSettings::default()).err().unwrap();
        assert!(err.contains("teapot"));
    }
}
