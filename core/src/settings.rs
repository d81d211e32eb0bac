//! Settings

use crate::spectrum::*;
use std::path::PathBuf;

/// Largest supported bin capacity exponent.
pub const MAX_BIN_EXPONENT: usize = 24;

/// Renderer knobs. Read only once a `Renderer` is constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Edge length in pixels of the square camera buckets.
    pub bucket_size: usize,

    /// Largest number of rays in one shading task.
    pub shading_size: usize,

    /// Bin and batch capacity is `2^bin_exponent` rays.
    pub bin_exponent: usize,

    /// Depth after which Russian roulette may terminate a path.
    pub min_depth: u32,

    /// Depth at which paths are terminated.
    pub max_depth: u32,

    /// Throughput below which Russian roulette is applied.
    pub threshold: f32,

    /// Directory for transient batch files.
    pub batch_dir: PathBuf,

    /// Base directory for relative asset paths.
    pub asset_root: PathBuf,

    /// Radiance returned by rays leaving the scene.
    pub background: Spectrum,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket_size: 16,
            shading_size: 4096,
            bin_exponent: 11,
            min_depth: 2,
            max_depth: 4,
            threshold: 0.05,
            batch_dir: std::env::temp_dir().join("batch-tracer"),
            asset_root: PathBuf::from("."),
            background: Spectrum::ZERO,
        }
    }
}

impl Settings {
    /// Returns the capacity of bins and batches in rays.
    pub fn bin_capacity(&self) -> usize {
        1 << self.bin_exponent
    }

    /// Check the settings for values the renderer cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket_size == 0 {
            return Err("bucket_size must be positive".to_string());
        }
        if self.shading_size == 0 {
            return Err("shading_size must be positive".to_string());
        }
        if !(1..=MAX_BIN_EXPONENT).contains(&self.bin_exponent) {
            return Err(format!(
                "bin_exponent {} is outside [1, {MAX_BIN_EXPONENT}]",
                self.bin_exponent
            ));
        }
        if self.max_depth > u8::MAX as u32 {
            return Err(format!("max_depth {} exceeds {}", self.max_depth, u8::MAX));
        }
        if self.min_depth > self.max_depth {
            return Err(format!(
                "min_depth {} exceeds max_depth {}",
                self.min_depth, self.max_depth
            ));
        }
        if !(self.threshold >= 0.0) {
            return Err(format!("invalid threshold {}", self.threshold));
        }
        Ok(())
    }
}
