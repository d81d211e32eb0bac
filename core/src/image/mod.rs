//! Image Accumulator
//!
//! A pass deposits radiance into a dense sample grid holding `base * base`
//! slots per pixel. Completing the pass reduces each pixel's samples with the
//! reconstruction filter and adds the result to the pixel grid, so the pixel
//! grid holds the sum over every completed pass.

use crate::common::*;
use crate::filter::*;
use crate::parallel::*;
use crate::spectrum::*;
use rayon::prelude::*;
use std::sync::atomic::Ordering;

/// One RGB sample slot. Concurrent shading tasks may add to the same slot.
#[derive(Default)]
struct SampleSlot {
    rgb: [AtomicFloat; SPECTRUM_SAMPLES],
}

impl SampleSlot {
    fn add(&self, v: &Spectrum) {
        for (i, c) in self.rgb.iter().enumerate() {
            let x = v[i];
            if x != 0.0 {
                c.add(x);
            }
        }
    }

    fn get(&self) -> Spectrum {
        Spectrum::rgb(
            self.rgb[0].load(Ordering::Relaxed),
            self.rgb[1].load(Ordering::Relaxed),
            self.rgb[2].load(Ordering::Relaxed),
        )
    }

    fn clear(&self) {
        for c in self.rgb.iter() {
            c.store(0.0, Ordering::Relaxed);
        }
    }
}

/// Image settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSettings {
    /// Width in pixels.
    pub width: usize,

    /// Height in pixels.
    pub height: usize,

    /// Per-axis supersampling factor.
    pub base: usize,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            base: 8,
        }
    }
}

impl ImageSettings {
    /// Returns the number of samples per pixel.
    pub fn samples_per_pixel(&self) -> usize {
        self.base * self.base
    }

    /// Validate against the ranges the ray codec can address.
    pub fn validate(&self) -> Result<(), String> {
        let limit = u16::MAX as usize;
        if self.width == 0 || self.height == 0 {
            Err(format!("Invalid image resolution {}x{}", self.width, self.height))
        } else if self.width > limit || self.height > limit {
            Err(format!(
                "Image resolution {}x{} exceeds {limit} pixels per axis",
                self.width, self.height
            ))
        } else if self.base == 0 || self.samples_per_pixel() > limit {
            Err(format!("Invalid supersampling base {}", self.base))
        } else {
            Ok(())
        }
    }
}

/// Per-sample and per-pixel accumulation buffers.
pub struct Image {
    /// Resolution and supersampling.
    settings: ImageSettings,

    /// Sample grid indexed by `sample_index()`.
    samples: Vec<SampleSlot>,

    /// Pixel grid in row-major order.
    pixels: Vec<Spectrum>,

    /// Number of passes folded into `pixels`.
    iteration: usize,
}

impl Image {
    /// Allocate the buffers for the given image settings.
    ///
    /// * `settings` - Image settings.
    pub fn new(settings: ImageSettings) -> Result<Self, String> {
        settings.validate()?;

        let n_pixels = settings.width * settings.height;
        let n_samples = n_pixels * settings.samples_per_pixel();
        Ok(Self {
            settings,
            samples: (0..n_samples).map(|_| SampleSlot::default()).collect(),
            pixels: vec![Spectrum::ZERO; n_pixels],
            iteration: 0,
        })
    }

    /// Returns the image settings.
    pub fn settings(&self) -> &ImageSettings {
        &self.settings
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.settings.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.settings.height
    }

    /// Returns the per-axis supersampling factor.
    pub fn base(&self) -> usize {
        self.settings.base
    }

    /// Returns the number of completed passes since construction or the last
    /// `reset()`.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns the slot of sample `s` of pixel (`x`, `y`).
    ///
    /// * `x` - Pixel x-coordinate.
    /// * `y` - Pixel y-coordinate.
    /// * `s` - Sample index within the pixel.
    #[inline]
    pub fn sample_index(&self, x: usize, y: usize, s: usize) -> usize {
        debug_assert!(x < self.settings.width && y < self.settings.height);
        debug_assert!(s < self.settings.samples_per_pixel());
        (x * self.settings.height + y) * self.settings.samples_per_pixel() + s
    }

    /// Add radiance to a sample slot. Safe to call concurrently.
    ///
    /// * `x`        - Pixel x-coordinate.
    /// * `y`        - Pixel y-coordinate.
    /// * `s`        - Sample index within the pixel.
    /// * `radiance` - The contribution.
    pub fn accumulate_sample(&self, x: usize, y: usize, s: usize, radiance: &Spectrum) {
        self.samples[self.sample_index(x, y, s)].add(radiance);
    }

    /// Returns the accumulated value of one sample slot in the current pass.
    ///
    /// * `x` - Pixel x-coordinate.
    /// * `y` - Pixel y-coordinate.
    /// * `s` - Sample index within the pixel.
    pub fn sample(&self, x: usize, y: usize, s: usize) -> Spectrum {
        self.samples[self.sample_index(x, y, s)].get()
    }

    /// Zero the sample grid before a pass.
    pub fn clear_samples(&mut self) {
        self.samples.par_iter().for_each(|slot| slot.clear());
    }

    /// Filter every pixel's samples, add the result to the pixel grid and
    /// advance the iteration counter. Returns the new iteration count.
    ///
    /// * `filter` - The reconstruction filter.
    pub fn finalize_pass(&mut self, filter: &dyn Filter) -> usize {
        let width = self.settings.width;
        let height = self.settings.height;
        let base = self.settings.base;
        let spp = self.settings.samples_per_pixel();
        let samples = &self.samples;

        self.pixels
            .par_iter_mut()
            .enumerate()
            .for_each_init(
                || Vec::with_capacity(spp),
                |buffer, (i, pixel)| {
                    let (x, y) = (i % width, i / width);
                    let start = (x * height + y) * spp;
                    buffer.clear();
                    buffer.extend(samples[start..start + spp].iter().map(SampleSlot::get));
                    *pixel += filter.convolve(base, buffer);
                },
            );

        self.iteration += 1;
        self.iteration
    }

    /// Zero the pixel grid and the iteration counter.
    pub fn reset(&mut self) {
        self.pixels.par_iter_mut().for_each(|p| *p = Spectrum::ZERO);
        self.iteration = 0;
    }

    /// Returns the pixel grid: the sum of the filtered values of every
    /// completed pass.
    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// Returns the pixel grid averaged over the completed passes.
    pub fn resolved(&self) -> Vec<Spectrum> {
        let scale = if self.iteration > 0 {
            1.0 / self.iteration as Float
        } else {
            0.0
        };
        self.pixels.par_iter().map(|p| *p * scale).collect()
    }

    /// Returns the averaged pixel grid as interleaved RGB values.
    pub fn resolved_rgb(&self) -> Vec<Float> {
        self.resolved().iter().flat_map(|p| p.to_rgb()).collect()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    struct Mean;

    impl Filter for Mean {
        fn convolve(&self, base: usize, samples: &[Spectrum]) -> Spectrum {
            assert_eq!(samples.len(), base * base);
            samples.iter().fold(Spectrum::ZERO, |a, s| a + *s) / samples.len() as Float
        }
    }

    fn image(width: usize, height: usize, base: usize) -> Image {
        Image::new(ImageSettings { width, height, base }).unwrap()
    }

    #[test]
    fn sample_layout() {
        let img = image(3, 2, 2);
        assert_eq!(img.sample_index(0, 0, 0), 0);
        assert_eq!(img.sample_index(0, 1, 0), 4);
        assert_eq!(img.sample_index(1, 0, 3), 11);
        assert_eq!(img.sample_index(2, 1, 3), 23);
    }

    #[test]
    fn finalize_filters_into_row_major_pixels() {
        let mut img = image(3, 2, 2);
        img.accumulate_sample(2, 1, 0, &Spectrum::new(4.0));
        img.accumulate_sample(2, 1, 3, &Spectrum::new(2.0));
        img.accumulate_sample(2, 1, 3, &Spectrum::new(2.0));
        assert_eq!(img.sample(2, 1, 3), Spectrum::new(4.0));

        assert_eq!(img.finalize_pass(&Mean), 1);
        assert_eq!(img.pixels()[5], Spectrum::new(2.0));
        assert!(img.pixels()[..5].iter().all(|p| p.is_black()));
    }

    #[test]
    fn passes_accumulate_and_resolve_to_average() {
        let mut img = image(1, 1, 1);
        img.accumulate_sample(0, 0, 0, &Spectrum::new(1.0));
        img.finalize_pass(&Mean);

        img.clear_samples();
        assert!(img.sample(0, 0, 0).is_black());
        img.accumulate_sample(0, 0, 0, &Spectrum::new(3.0));
        assert_eq!(img.finalize_pass(&Mean), 2);

        assert_eq!(img.pixels()[0], Spectrum::new(4.0));
        assert!(approx_eq!(f32, img.resolved()[0][1], 2.0, ulps = 2));
        assert_eq!(img.resolved_rgb(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn reset_zeroes_pixels_and_iteration() {
        let mut img = image(2, 2, 1);
        img.accumulate_sample(1, 1, 0, &Spectrum::new(1.0));
        img.finalize_pass(&Mean);
        img.reset();
        assert_eq!(img.iteration(), 0);
        assert!(img.pixels().iter().all(|p| p.is_black()));
        assert!(img.resolved().iter().all(|p| p.is_black()));
    }

    #[test]
    fn settings_limits() {
        assert!(ImageSettings::default().validate().is_ok());
        assert!(ImageSettings { width: 0, ..Default::default() }.validate().is_err());
        assert!(ImageSettings { height: 65536, ..Default::default() }.validate().is_err());
        assert!(ImageSettings { base: 256, ..Default::default() }.validate().is_err());
        assert!(ImageSettings { base: 255, ..Default::default() }.validate().is_ok());
    }
}
