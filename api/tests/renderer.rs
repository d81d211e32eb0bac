//! End-to-end passes through the batch renderer.

use api::*;
use core::image::*;
use core::pipeline::*;
use core::ray::*;
use core::rng::*;
use core::settings::*;
use core::shader::*;
use core::spectrum::*;
use core::texture::*;
use filters::*;
use samplers::*;
use shapes::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

fn settings(dir: &Path, bin_exponent: usize) -> Settings {
    Settings {
        bin_exponent,
        batch_dir: dir.to_path_buf(),
        ..Settings::default()
    }
}

fn image(width: usize, height: usize, base: usize) -> ImageSettings {
    ImageSettings { width, height, base }
}

fn batch_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[test]
fn every_written_ray_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = build_renderer("cornell", settings(dir.path(), 6), image(32, 32, 2), 2).unwrap();

    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(1));
    let stats = renderer.stats();
    assert_eq!(stats.primary_rays, 32 * 32 * 4);
    assert_eq!(stats.rays_written, stats.rays_read);
    assert!(stats.secondary_rays > 0);
    assert!(stats.forced_flushes > 0);
    assert_eq!(batch_files(dir.path()), 0);
    assert!(!renderer.active());

    let (pixels, width, height) = renderer.image();
    assert_eq!((width, height), (32, 32));
    assert!(pixels.iter().any(|p| !p.is_black()));
    assert!(pixels.iter().all(|p| !p.has_nans()));
}

#[test]
fn one_run_per_batch_when_everything_hits_one_surface() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = build_renderer("plane", settings(dir.path(), 11), image(128, 128, 1), 3).unwrap();

    assert_eq!(renderer.process().unwrap().pass_index(), 1);
    let stats = renderer.stats();
    assert_eq!(stats.primary_rays, 128 * 128);
    assert_eq!(stats.rays_read, 128 * 128);
    assert_eq!(stats.secondary_rays, 0);
    assert!(stats.batches >= 8);
    assert_eq!(stats.runs, stats.batches);

    let (pixels, _, _) = renderer.image();
    assert!(pixels.iter().all(|p| *p == Spectrum::new(0.5)));
}

#[test]
fn clear_then_process_reproduces_first_pass() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = build_renderer("plane", settings(dir.path(), 5), image(24, 16, 2), 2).unwrap();

    renderer.process().unwrap();
    let first = renderer.image().0.to_vec();

    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(2));
    assert_ne!(renderer.image().0, &first[..]);

    renderer.clear();
    assert_eq!(renderer.accumulator().iteration(), 0);
    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(1));
    assert_eq!(renderer.image().0, &first[..]);
}

#[test]
fn terminate_before_process_aborts_that_pass() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = build_renderer("plane", settings(dir.path(), 5), image(16, 16, 1), 2).unwrap();

    renderer.terminate();
    let outcome = renderer.process().unwrap();
    assert_eq!(outcome, PassOutcome::Aborted);
    assert_eq!(outcome.pass_index(), 0);
    assert_eq!(renderer.accumulator().iteration(), 0);
    assert_eq!(batch_files(dir.path()), 0);

    // The request was consumed.
    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(1));
}

#[test]
fn unknown_scene_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(build_renderer("teapot", settings(dir.path(), 5), image(8, 8, 1), 1).is_err());
}

/// Requests termination from inside the first shading run.
struct TerminatingShader {
    control: OnceLock<ControlHandle>,
    fired: AtomicBool,
}

impl Shader for TerminatingShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String> {
        if !self.fired.swap(true, Ordering::AcqRel) {
            if let Some(control) = self.control.get() {
                assert!(control.active());
                control.terminate();
            }
        }

        // Keep secondary rays in flight so bins are non-empty at abort.
        spawn_bounces(rays, result);
        Ok(())
    }
}

/// A 64x64 pinhole view filled by one quad shaded by `shader`.
fn quad_setup(shader: ArcShader) -> SceneSetup {
    let mut builder = SceneBuilder::new();
    builder.add_surface(
        Arc::new(
            TriangleMesh::quad(
                core::geometry::Point3f::new(-100.0, -50.0, 5.0),
                core::geometry::Vector3f::new(200.0, 0.0, 0.0),
                core::geometry::Vector3f::new(0.0, 200.0, 0.0),
            )
            .unwrap(),
        ),
        shader,
    );
    SceneSetup {
        camera: Arc::new(
            cameras::PinholeCamera::new(
                core::geometry::Point3f::zero(),
                core::geometry::Vector3f::new(0.0, 0.0, 1.0),
                1.0,
                (64, 64),
            )
            .unwrap(),
        ),
        sampler: Arc::new(GridSampler::new()),
        filter: Arc::new(BoxFilter::new()),
        scene: builder.build().unwrap(),
    }
}

/// Bounce every camera ray straight back so secondary rays stay in flight.
fn spawn_bounces(rays: &[Ray], result: &mut ShadingResult) {
    for ray in rays.iter().filter(|r| r.depth == 0) {
        result.spawned.push(Ray::spawn(ray, ray.at(1.0), -ray.d, Spectrum::ONE));
    }
}

#[test]
fn terminate_during_pass_discards_outstanding_batches() {
    let dir = tempfile::tempdir().unwrap();
    let shader = Arc::new(TerminatingShader {
        control: OnceLock::new(),
        fired: AtomicBool::new(false),
    });

    let setup = quad_setup(shader.clone());
    let mut renderer = create_renderer(setup, settings(dir.path(), 6), image(64, 64, 1), 2).unwrap();
    assert!(shader.control.set(renderer.control()).is_ok());

    assert_eq!(renderer.process().unwrap(), PassOutcome::Aborted);
    assert!(!renderer.active());
    assert_eq!(renderer.accumulator().iteration(), 0);
    assert!(renderer.stats().batches >= 1);
    assert!(renderer.stats().rays_read < renderer.stats().rays_written);
    assert_eq!(batch_files(dir.path()), 0);

    // The next pass runs to completion with the same renderer.
    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(1));
    assert_eq!(batch_files(dir.path()), 0);
}

/// Fails the third shading run it is given.
struct FailingShader {
    calls: AtomicUsize,
}

impl Shader for FailingShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String> {
        if self.calls.fetch_add(1, Ordering::AcqRel) == 2 {
            return Err("shader fault".to_string());
        }
        spawn_bounces(rays, result);
        Ok(())
    }
}

#[test]
fn shader_error_fails_pass_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let shader = Arc::new(FailingShader {
        calls: AtomicUsize::new(0),
    });

    let setup = quad_setup(shader.clone());
    let mut renderer = create_renderer(setup, settings(dir.path(), 6), image(64, 64, 1), 2).unwrap();

    assert_eq!(renderer.process(), Err("shader fault".to_string()));
    assert!(!renderer.active());
    assert_eq!(renderer.accumulator().iteration(), 0);
    assert_eq!(batch_files(dir.path()), 0);

    assert_eq!(renderer.process(), Ok(PassOutcome::Completed(1)));
    assert_eq!(batch_files(dir.path()), 0);
}

/// Deletes every batch file in `dir` during its first shading run.
struct DeletingShader {
    dir: PathBuf,
    fired: AtomicBool,
}

impl Shader for DeletingShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        result: &mut ShadingResult,
    ) -> Result<(), String> {
        if !self.fired.swap(true, Ordering::AcqRel) {
            for entry in std::fs::read_dir(&self.dir).map_err(|e| e.to_string())? {
                let _ = std::fs::remove_file(entry.map_err(|e| e.to_string())?.path());
            }
        }
        spawn_bounces(rays, result);
        Ok(())
    }
}

#[test]
fn lost_batch_file_fails_pass_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let shader = Arc::new(DeletingShader {
        dir: dir.path().to_path_buf(),
        fired: AtomicBool::new(false),
    });

    let setup = quad_setup(shader);
    let mut renderer = create_renderer(setup, settings(dir.path(), 6), image(64, 64, 1), 2).unwrap();

    let outcome = renderer.process();
    assert!(outcome.is_err(), "{outcome:?}");
    assert!(!renderer.active());
    assert_eq!(renderer.accumulator().iteration(), 0);
    assert_eq!(batch_files(dir.path()), 0);

    assert_eq!(renderer.process(), Ok(PassOutcome::Completed(1)));
    assert_eq!(batch_files(dir.path()), 0);
}

/// Records the name of every thread it runs on.
#[derive(Default)]
struct ThreadRecordingShader {
    threads: Mutex<HashSet<String>>,
}

impl Shader for ThreadRecordingShader {
    fn shade(
        &self,
        _ctx: &ShadingContext,
        _rays: &[Ray],
        _textures: &mut TextureHandle,
        _rng: &mut RNG,
        _result: &mut ShadingResult,
    ) -> Result<(), String> {
        let name = std::thread::current().name().unwrap_or("unnamed").to_string();
        self.threads.lock().map_err(|e| e.to_string())?.insert(name);
        Ok(())
    }
}

#[test]
fn shading_runs_on_the_renderer_pool() {
    let dir = tempfile::tempdir().unwrap();
    let shader = Arc::new(ThreadRecordingShader::default());

    let setup = quad_setup(shader.clone());
    let mut renderer = create_renderer(setup, settings(dir.path(), 6), image(64, 64, 1), 3).unwrap();
    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(1));
    assert_eq!(renderer.process().unwrap(), PassOutcome::Completed(2));
    assert!(renderer.stats().runs >= 64);

    let threads = shader.threads.lock().unwrap();
    assert!(!threads.is_empty());
    assert!(threads.len() <= 3);
    assert!(threads.iter().all(|name| name.starts_with("batch-stage-")), "{threads:?}");
}
