//! Box Filter

use core::common::*;
use core::filter::*;
use core::spectrum::*;

/// Gives equal weight to every sample of a pixel.
#[derive(Copy, Clone, Debug, Default)]
pub struct BoxFilter;

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for BoxFilter {
    /// Returns the mean of the samples.
    ///
    /// * `base`    - Per-axis supersampling factor.
    /// * `samples` - The `base * base` samples of the pixel.
    fn convolve(&self, base: usize, samples: &[Spectrum]) -> Spectrum {
        debug_assert_eq!(samples.len(), base * base);
        if samples.is_empty() {
            return Spectrum::ZERO;
        }
        let sum = samples.iter().fold(Spectrum::ZERO, |acc, s| acc + *s);
        sum / samples.len() as Float
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_samples() {
        let samples = [
            Spectrum::new(1.0),
            Spectrum::new(2.0),
            Spectrum::rgb(3.0, 0.0, 1.0),
            Spectrum::new(2.0),
        ];
        assert_eq!(BoxFilter::new().convolve(2, &samples), Spectrum::rgb(2.0, 1.25, 1.5));
    }

    #[test]
    fn single_sample_passes_through() {
        let s = Spectrum::rgb(0.25, 0.5, 0.75);
        assert_eq!(BoxFilter::new().convolve(1, &[s]), s);
    }
}
