//! Camera Stage
//!
//! The image is split into square buckets that camera workers take from a
//! shared channel. Each bucket seeds its own generator from the pass and
//! bucket index, so primary rays do not depend on which worker renders the
//! bucket.

use super::worker::*;
use crate::batch::*;
use crate::camera::*;
use crate::common::*;
use crate::geometry::*;
use crate::image::*;
use crate::ray::*;
use crate::rng::*;
use crate::sampler::*;

/// Everything the camera workers read.
pub struct CameraStage<'a> {
    /// Resolution and supersampling.
    pub image: &'a ImageSettings,

    /// Bucket edge length in pixels.
    pub bucket_size: usize,

    /// Completed passes; selects the generator streams.
    pub iteration: usize,

    /// The camera.
    pub camera: &'a dyn Camera,

    /// The sampler.
    pub sampler: &'a dyn Sampler,
}

impl<'a> CameraStage<'a> {
    /// Returns the number of buckets in x and y.
    pub fn bucket_counts(&self) -> (usize, usize) {
        (
            (self.image.width + self.bucket_size - 1) / self.bucket_size,
            (self.image.height + self.bucket_size - 1) / self.bucket_size,
        )
    }

    /// Generate every primary ray of a pass into the workers' bins. Returns
    /// the number of rays generated.
    ///
    /// * `workers` - One worker per thread.
    /// * `queue`   - Destination of full bins.
    pub fn run(&self, workers: &mut [Worker], queue: &BatchQueue) -> Result<u64, String> {
        let (nx, ny) = self.bucket_counts();
        let bucket_count = nx * ny;
        debug!("Generating camera rays for {nx}x{ny} buckets");

        let results = crossbeam::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded(workers.len());

            // Spawn worker threads.
            let handles: Vec<_> = workers
                .iter_mut()
                .map(|worker| {
                    let rxc = rx.clone();
                    scope.spawn(move |_| -> Result<u64, String> {
                        let mut offsets = Vec::with_capacity(self.image.samples_per_pixel());
                        let mut n = 0;
                        for bucket in rxc.iter() {
                            n += self.render_bucket(bucket, nx, &mut worker.bins, queue, &mut offsets)?;
                        }
                        Ok(n)
                    })
                })
                .collect();
            drop(rx); // Drop extra rx since each worker holds a clone.

            // Send work.
            for bucket in 0..bucket_count {
                if tx.send(bucket).is_err() {
                    break;
                }
            }
            drop(tx);

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Err("camera worker panicked".to_string())))
                .collect::<Vec<_>>()
        })
        .map_err(|_| "camera stage panicked".to_string())?;

        results.into_iter().sum()
    }

    /// Generate the primary rays of one bucket. Returns the number of rays.
    ///
    /// * `bucket`  - Bucket index.
    /// * `nx`      - Number of buckets in x.
    /// * `bins`    - The calling worker's bins.
    /// * `queue`   - Destination of full bins.
    /// * `offsets` - Scratch space for sample offsets.
    fn render_bucket(
        &self,
        bucket: usize,
        nx: usize,
        bins: &mut DirectionalBins,
        queue: &BatchQueue,
        offsets: &mut Vec<Point2f>,
    ) -> Result<u64, String> {
        let x0 = (bucket % nx) * self.bucket_size;
        let y0 = (bucket / nx) * self.bucket_size;
        let x1 = min(x0 + self.bucket_size, self.image.width);
        let y1 = min(y0 + self.bucket_size, self.image.height);

        let mut rng = RNG::new(((self.iteration as u64) << 32) | bucket as u64);
        let spp = self.image.samples_per_pixel();
        for y in y0..y1 {
            for x in x0..x1 {
                self.sampler.sample(self.image.base, &mut rng, offsets);
                debug_assert_eq!(offsets.len(), spp);

                for (s, offset) in offsets.iter().enumerate() {
                    let sample = CameraSample {
                        p_film: Point2f::new(x as Float + offset.x, y as Float + offset.y),
                        p_lens: Point2f::new(rng.uniform_float(), rng.uniform_float()),
                    };
                    let (o, d) = self.camera.generate_ray(&sample);
                    bins.append(&Ray::camera(o, d, x as u32, y as u32, s as u32), queue)?;
                }
            }
        }

        Ok(((x1 - x0) * (y1 - y0) * spp) as u64)
    }
}
