//! Batch Pipeline
//!
//! The `Renderer` drives one image pass at a time. Camera workers bin primary
//! rays; the single-threaded batch loop then takes batches off the queue and
//! runs each through load, decompress, bound, traversal sort, intersect,
//! shading sort, shade and discard. Shading feeds new rays back into the
//! bins. A pass ends when the queue is empty even after every bin has been
//! flushed. One batch is prefetched in the background while the current
//! batch is processed.

mod bounds;
mod camera_stage;
mod control;
mod decompress;
mod intersect;
mod prefetch;
mod shade;
mod sort;
mod stats;
mod terminal;
mod worker;

use crate::batch::*;
use crate::camera::*;
use crate::filter::*;
use crate::image::*;
use crate::ray::*;
use crate::sampler::*;
use crate::scene::*;
use crate::settings::*;
use crate::spectrum::*;
use crate::texture::*;
use camera_stage::*;
use prefetch::*;
use shade::*;
use std::sync::Arc;
use worker::*;

// Re-export
pub use bounds::*;
pub use control::*;
pub use decompress::*;
pub use intersect::*;
pub use sort::*;
pub use stats::*;
pub use terminal::*;

/// How a call to `Renderer::process()` ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass completed; holds the new iteration count.
    Completed(usize),

    /// Termination was requested before the pass completed. The image was not
    /// finalized.
    Aborted,
}

impl PassOutcome {
    /// Returns the iteration count of a completed pass and 0 for an aborted
    /// one.
    pub fn pass_index(&self) -> usize {
        match self {
            PassOutcome::Completed(iteration) => *iteration,
            PassOutcome::Aborted => 0,
        }
    }
}

/// The scene objects a renderer is built from.
pub struct Collaborators {
    /// The camera.
    pub camera: ArcCamera,

    /// The pixel sampler.
    pub sampler: ArcSampler,

    /// The reconstruction filter.
    pub filter: ArcFilter,

    /// The committed scene.
    pub scene: Arc<Scene>,

    /// The intersection capability bound to `scene`.
    pub intersector: ArcIntersector,

    /// Texture system used by the shaders.
    pub textures: Arc<TextureSystem>,
}

/// The out-of-core batch renderer.
pub struct Renderer {
    /// Renderer settings.
    settings: Settings,

    /// The image accumulator.
    image: Image,

    /// Scene objects.
    parts: Collaborators,

    /// The batch queue.
    queue: BatchQueue,

    /// Per-thread state including the directional bins.
    workers: Vec<Worker>,

    /// Pool running the data-parallel stages.
    pool: rayon::ThreadPool,

    /// Cancellation and status.
    control: ControlHandle,

    /// Counters of the last pass.
    stats: PassStats,

    /// Background batch loader.
    loader: Loader,

    /// Working buffers for the current and the prefetched batch.
    buffers: [Vec<u8>; 2],

    /// Decoded rays of the current batch.
    rays: Vec<Ray>,

    /// Batch dequeued but not yet fully consumed.
    in_flight: Option<BatchItem>,
}

impl Renderer {
    /// Create a new `Renderer`.
    ///
    /// * `settings`       - Renderer settings.
    /// * `image_settings` - Resolution and supersampling.
    /// * `n_threads`      - Number of worker threads.
    /// * `parts`          - Scene objects.
    pub fn new(
        settings: Settings,
        image_settings: ImageSettings,
        n_threads: usize,
        parts: Collaborators,
    ) -> Result<Self, String> {
        settings.validate()?;
        if n_threads == 0 {
            return Err("Renderer::new(): at least one thread is required".to_string());
        }

        let image = Image::new(image_settings)?;
        let queue = BatchQueue::new(&settings.batch_dir)?;
        let workers = (0..n_threads).map(|i| Worker::new(i, settings.bin_exponent)).collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("batch-stage-{i}"))
            .build()
            .map_err(|e| format!("Renderer::new(): unable to build thread pool: {e}"))?;
        let loader = Loader::spawn()?;

        let capacity = settings.bin_capacity() * CompressedRay::SIZE;
        info!(
            "Renderer {}x{} base {} using {n_threads} workers, batch capacity {} rays, batches in '{}'",
            image_settings.width,
            image_settings.height,
            image_settings.base,
            settings.bin_capacity(),
            settings.batch_dir.display()
        );

        Ok(Self {
            settings,
            image,
            parts,
            queue,
            workers,
            pool,
            control: ControlHandle::default(),
            stats: PassStats::default(),
            loader,
            buffers: [Vec::with_capacity(capacity), Vec::with_capacity(capacity)],
            rays: Vec::new(),
            in_flight: None,
        })
    }

    /// Render one pass. Returns `PassOutcome::Completed` with the new
    /// iteration count, or `PassOutcome::Aborted` if termination was requested;
    /// an aborted pass leaves the pixel grid and iteration count untouched.
    /// Errors abort the pass. On every abort path outstanding batch files are
    /// deleted and the bins are emptied.
    pub fn process(&mut self) -> Result<PassOutcome, String> {
        self.control.set_active(true);
        let result = self.run_pass();
        match result {
            Ok(PassOutcome::Completed(iteration)) => {
                info!("Pass {iteration} complete: {}", self.stats);
            }
            Ok(PassOutcome::Aborted) => {
                warn!("Pass aborted: {}", self.stats);
                self.discard_pending();
            }
            Err(ref e) => {
                error!("Pass failed: {e}");
                self.discard_pending();
            }
        }
        self.control.set_active(false);
        result
    }

    /// Zero the pixel grid and the iteration counter.
    pub fn clear(&mut self) {
        self.image.reset();
    }

    /// Request that the running (or next) pass stop.
    pub fn terminate(&self) {
        self.control.terminate();
    }

    /// Returns true while a pass is running.
    pub fn active(&self) -> bool {
        self.control.active()
    }

    /// Returns a handle for cancelling or observing passes from another
    /// thread.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Returns the pixel grid with the image width and height. Pixels hold
    /// the sum over completed passes.
    pub fn image(&self) -> (&[Spectrum], usize, usize) {
        (self.image.pixels(), self.image.width(), self.image.height())
    }

    /// Returns the image accumulator.
    pub fn accumulator(&self) -> &Image {
        &self.image
    }

    /// Returns the counters of the last pass.
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn run_pass(&mut self) -> Result<PassOutcome, String> {
        self.stats = PassStats::default();
        let written_before = self.queue.rays_written();

        if self.control.take_terminate() {
            return Ok(PassOutcome::Aborted);
        }

        self.image.clear_samples();
        self.stats.primary_rays = self.generate_primary_rays()?;

        let mut buffer = take_buffer(&mut self.buffers[0], self.settings.bin_capacity());
        let mut spare = take_buffer(&mut self.buffers[1], self.settings.bin_capacity());

        let mut current = self.acquire()?;
        if let Some(item) = &current {
            self.in_flight = Some(item.clone());
            load_batch(item, &mut buffer)?;
        }

        while let Some(item) = current.take() {
            if self.control.take_terminate() {
                self.stats.rays_written = self.queue.rays_written() - written_before;
                return Ok(PassOutcome::Aborted);
            }

            // Prefetch the next batch into the spare buffer.
            if let Some(next) = self.queue.try_pop() {
                self.loader.request(next, std::mem::take(&mut spare))?;
            }

            self.process_batch(&item, &buffer)?;
            remove_batch(&item.path)?;
            self.in_flight = None;

            current = match self.loader.wait()? {
                Some(Prefetched {
                    item: next,
                    buffer: loaded,
                    result,
                }) => {
                    self.in_flight = Some(next.clone());
                    spare = std::mem::replace(&mut buffer, loaded);
                    result?;
                    Some(next)
                }
                None => {
                    let next = self.acquire()?;
                    if let Some(next) = &next {
                        self.in_flight = Some(next.clone());
                        load_batch(next, &mut buffer)?;
                    }
                    next
                }
            };
        }

        self.buffers = [buffer, spare];
        self.stats.rays_written = self.queue.rays_written() - written_before;
        for worker in self.workers.iter_mut() {
            self.stats.forced_flushes += worker.bins.take_forced_flushes() as u64;
        }

        let iteration = self.image.finalize_pass(self.parts.filter.as_ref());
        Ok(PassOutcome::Completed(iteration))
    }

    /// Run the camera stage.
    fn generate_primary_rays(&mut self) -> Result<u64, String> {
        let stage = CameraStage {
            image: self.image.settings(),
            bucket_size: self.settings.bucket_size,
            iteration: self.image.iteration(),
            camera: self.parts.camera.as_ref(),
            sampler: self.parts.sampler.as_ref(),
        };
        let n = stage.run(&mut self.workers, &self.queue)?;
        debug!("Generated {n} camera rays");
        Ok(n)
    }

    /// Take the next batch off the queue, flushing every bin first if the
    /// queue is empty. `None` means the pass has no work left.
    fn acquire(&mut self) -> Result<Option<BatchItem>, String> {
        if let Some(item) = self.queue.try_pop() {
            return Ok(Some(item));
        }

        let mut flushed = 0;
        for worker in self.workers.iter_mut() {
            flushed += worker.bins.flush_all(&self.queue)?;
        }
        if flushed > 0 {
            debug!("Flushed {flushed} partial bins");
        }
        Ok(self.queue.try_pop())
    }

    /// Run one loaded batch through decompress, bound, sort, intersect, sort
    /// and shade.
    ///
    /// * `item`  - The batch.
    /// * `bytes` - The loaded batch file.
    fn process_batch(&mut self, item: &BatchItem, bytes: &[u8]) -> Result<(), String> {
        let Self {
            settings,
            image,
            parts,
            queue,
            workers,
            pool,
            stats,
            rays,
            ..
        } = self;

        pool.install(|| {
            decompress(bytes, rays);
            let bounds = compute_bounds(rays);
            traversal_sort(&bounds, rays);
            intersect_all(parts.intersector.as_ref(), rays);
        });
        let split = pool.install(|| shading_sort(rays));
        debug!("Batch {} ({} rays): {split} to shade", item.class, rays.len());

        let (shaded, terminal) = rays.split_at(split);
        if !shaded.is_empty() {
            let runs = partition_runs(shaded, settings.shading_size);
            let stage = ShadeStage {
                scene: &parts.scene,
                settings,
                image,
                textures: &parts.textures,
            };
            stats.secondary_rays += stage.run(pool, shaded, &runs, workers, queue)?;
            stats.runs += runs.len() as u64;
        }
        pool.install(|| resolve_terminal(image, terminal, &settings.background));

        stats.batches += 1;
        stats.rays_read += rays.len() as u64;
        Ok(())
    }

    /// Delete every batch file still owned by this pass and empty the bins.
    fn discard_pending(&mut self) {
        let mut discarded = 0;
        if let Some(item) = self.in_flight.take() {
            if item.path.exists() {
                if let Err(e) = remove_batch(&item.path) {
                    error!("{e}");
                }
            }
            discarded += 1;
        }
        match self.loader.wait() {
            Ok(Some(prefetched)) => {
                if let Err(e) = remove_batch(&prefetched.item.path) {
                    error!("{e}");
                }
                self.buffers[1] = prefetched.buffer;
                discarded += 1;
            }
            Ok(None) => {}
            Err(e) => error!("{e}"),
        }
        discarded += self.queue.drain();
        for worker in self.workers.iter_mut() {
            worker.bins.clear();
            worker.bins.take_forced_flushes();
        }
        debug!("Discarded {discarded} outstanding batches");
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.discard_pending();
    }
}

/// Take a working buffer, replacing a lost one.
///
/// * `slot`     - Buffer slot.
/// * `capacity` - Batch capacity in rays.
fn take_buffer(slot: &mut Vec<u8>, capacity: usize) -> Vec<u8> {
    let mut buffer = std::mem::take(slot);
    buffer.reserve(capacity * CompressedRay::SIZE);
    buffer
}
