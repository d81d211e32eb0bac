//! Shade Stage

use super::sort::*;
use super::worker::*;
use crate::batch::*;
use crate::image::*;
use crate::ray::*;
use crate::scene::*;
use crate::settings::*;
use crate::shader::*;
use crate::texture::*;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Everything the shading workers read.
pub struct ShadeStage<'a> {
    /// The committed scene.
    pub scene: &'a Scene,

    /// Renderer settings.
    pub settings: &'a Settings,

    /// The image accumulator.
    pub image: &'a Image,

    /// Texture system per-worker handles are created from.
    pub textures: &'a Arc<TextureSystem>,
}

impl<'a> ShadeStage<'a> {
    /// Shade every run on the worker pool. Each pool thread claims the
    /// worker with its own index and takes runs in order until none are left.
    /// Radiance goes to the image, spawned rays to the worker's bins. Returns
    /// the number of spawned rays.
    ///
    /// * `pool`    - The renderer's thread pool.
    /// * `rays`    - The shaded prefix of a batch in shading order.
    /// * `runs`    - Runs partitioning `rays`.
    /// * `workers` - One worker per pool thread.
    /// * `queue`   - Destination of full bins.
    pub fn run(
        &self,
        pool: &rayon::ThreadPool,
        rays: &[Ray],
        runs: &[Range<usize>],
        workers: &mut [Worker],
        queue: &BatchQueue,
    ) -> Result<u64, String> {
        if workers.len() != pool.current_num_threads() {
            return Err(format!(
                "ShadeStage::run(): {} workers for {} pool threads",
                workers.len(),
                pool.current_num_threads()
            ));
        }

        let next_run = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let slots: Vec<Mutex<&mut Worker>> = workers.iter_mut().map(Mutex::new).collect();

        let results = pool.broadcast(|ctx| -> Result<u64, String> {
            let mut worker = slots[ctx.index()]
                .lock()
                .map_err(|_| format!("shading worker {} poisoned", ctx.index()))?;

            let mut spawned = 0;
            while !failed.load(Ordering::Relaxed) {
                let i = next_run.fetch_add(1, Ordering::Relaxed);
                let Some(run) = runs.get(i) else {
                    break;
                };
                match self.shade_run(&rays[run.clone()], &mut **worker, queue) {
                    Ok(n) => spawned += n,
                    Err(e) => {
                        failed.store(true, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
            Ok(spawned)
        });

        results.into_iter().sum()
    }

    /// Shade one run on the calling worker. Returns the number of spawned
    /// rays.
    ///
    /// * `run`    - Rays hitting one surface.
    /// * `worker` - The calling worker.
    /// * `queue`  - Destination of full bins.
    fn shade_run(&self, run: &[Ray], worker: &mut Worker, queue: &BatchQueue) -> Result<u64, String> {
        let surface = shading_key(&run[0]).0 as usize;
        let ctx = ShadingContext {
            scene: self.scene,
            settings: self.settings,
            surface,
        };

        let (bins, rng, textures, result) = worker.shading_state(self.textures);
        result.reset(run.len());
        self.scene.surface(surface).shader.shade(&ctx, run, textures, rng, result)?;
        if result.radiance.len() != run.len() {
            return Err(format!(
                "shader for surface {surface} returned {} radiance values for {} rays",
                result.radiance.len(),
                run.len()
            ));
        }

        for (ray, l) in run.iter().zip(result.radiance.iter()) {
            if l.is_black() {
                continue;
            }
            if l.has_nans() || l.y().is_infinite() {
                error!(
                    "Invalid radiance {l} returned for pixel ({}, {}), sample {}. Setting to black.",
                    ray.pixel_x, ray.pixel_y, ray.sample
                );
                continue;
            }
            self.image
                .accumulate_sample(ray.pixel_x as usize, ray.pixel_y as usize, ray.sample as usize, l);
        }

        for ray in result.spawned.iter() {
            bins.append(ray, queue)?;
        }
        Ok(result.spawned.len() as u64)
    }
}

