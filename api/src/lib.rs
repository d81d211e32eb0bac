//! The API
//!
//! Builds scenes from their parts and hands them to a `Renderer`.

#[macro_use]
extern crate log;

mod scene_builder;
mod scenes;

use core::camera::*;
use core::filter::*;
use core::image::*;
use core::pipeline::*;
use core::sampler::*;
use core::scene::*;
use core::settings::*;
use core::texture::*;
use std::sync::Arc;

// Re-export
pub use scene_builder::*;
pub use scenes::*;

/// Everything needed to render a scene except the renderer settings.
pub struct SceneSetup {
    /// The camera.
    pub camera: ArcCamera,

    /// The pixel sampler.
    pub sampler: ArcSampler,

    /// The reconstruction filter.
    pub filter: ArcFilter,

    /// The committed scene.
    pub scene: Arc<Scene>,
}

/// Create a renderer for a scene. Textures are resolved against
/// `settings.asset_root` and the scene itself is the intersector.
///
/// * `setup`          - The scene.
/// * `settings`       - Renderer settings.
/// * `image_settings` - Resolution and supersampling.
/// * `n_threads`      - Number of worker threads.
pub fn create_renderer(
    setup: SceneSetup,
    settings: Settings,
    image_settings: ImageSettings,
    n_threads: usize,
) -> Result<Renderer, String> {
    let textures = Arc::new(TextureSystem::new(&settings.asset_root));
    let intersector: ArcIntersector = setup.scene.clone();
    let parts = Collaborators {
        camera: setup.camera,
        sampler: setup.sampler,
        filter: setup.filter,
        scene: setup.scene,
        intersector,
        textures,
    };
    Renderer::new(settings, image_settings, n_threads, parts)
}

/// Create a renderer for one of the built-in scenes.
///
/// * `name`           - Scene name; see `SCENES`.
/// * `settings`       - Renderer settings.
/// * `image_settings` - Resolution and supersampling.
/// * `n_threads`      - Number of worker threads.
pub fn build_renderer(
    name: &str,
    settings: Settings,
    image_settings: ImageSettings,
    n_threads: usize,
) -> Result<Renderer, String> {
    image_settings.validate()?;
    let setup = load_scene(name, &image_settings)?;
    info!("Loaded scene '{name}'");
    create_renderer(setup, settings, image_settings, n_threads)
}
