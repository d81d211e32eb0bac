//! Tent Filter

use core::common::*;
use core::filter::*;
use core::spectrum::*;

/// Implements a tent filter over the sample grid of a pixel; the weight falls
/// off linearly from the pixel centre and is normalized over the grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct TentFilter;

impl TentFilter {
    /// Returns a new instance of `TentFilter`.
    pub fn new() -> Self {
        Self
    }

    /// Returns the weight of grid cell (`i`, `j`).
    ///
    /// * `base` - Per-axis supersampling factor.
    /// * `i`    - Cell column.
    /// * `j`    - Cell row.
    pub fn weight(base: usize, i: usize, j: usize) -> Float {
        let b = base as Float;
        let cx = (i as Float + 0.5) / b;
        let cy = (j as Float + 0.5) / b;
        (1.0 - (2.0 * cx - 1.0).abs()) * (1.0 - (2.0 * cy - 1.0).abs())
    }
}

impl Filter for TentFilter {
    fn convolve(&self, base: usize, samples: &[Spectrum]) -> Spectrum {
        debug_assert_eq!(samples.len(), base * base);

        let mut sum = Spectrum::ZERO;
        let mut weight_sum = 0.0;
        for (s, sample) in samples.iter().enumerate() {
            let w = Self::weight(base, s % base, s / base);
            sum += *sample * w;
            weight_sum += w;
        }

        if weight_sum > 0.0 {
            sum / weight_sum
        } else {
            Spectrum::ZERO
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn centre_weighs_most() {
        assert_eq!(TentFilter::weight(1, 0, 0), 1.0);
        assert!(TentFilter::weight(3, 1, 1) > TentFilter::weight(3, 0, 1));
        assert!(TentFilter::weight(3, 0, 1) > TentFilter::weight(3, 0, 0));
    }

    #[test]
    fn centre_sample_dominates() {
        let mut samples = vec![Spectrum::ZERO; 9];
        samples[4] = Spectrum::new(1.0);
        let v = TentFilter::new().convolve(3, &samples);

        // Weights are 1/9 at corners, 1/3 on edges and 1 in the centre.
        assert!(approx_eq!(f32, v[0], 1.0 / (1.0 + 4.0 / 3.0 + 4.0 / 9.0), epsilon = 1e-5));
    }

    #[test]
    fn constant_input_is_preserved() {
        for base in 1..8 {
            for c in [0.0, 0.3, 1.0, 7.25] {
                let samples = vec![Spectrum::new(c); base * base];
                let v = TentFilter::new().convolve(base, &samples);
                assert!(approx_eq!(f32, v[1], c, epsilon = 1e-4 * (1.0 + c)));
            }
        }
    }
}
