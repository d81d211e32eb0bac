//! Application related stuff

use crate::image::*;
use crate::settings::*;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Command line options.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for rendering."
    )]
    n_threads: usize,

    /// Suppress all text output other than error messages.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[clap(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "render.png",
        help = "Write the final image to the given filename (.png, .tga, .exr or .pfm)."
    )]
    pub image_file: String,

    /// Number of passes.
    #[clap(
        long = "passes",
        short = 'n',
        value_name = "NUM",
        default_value_t = 1,
        help = "Number of progressive passes to render."
    )]
    pub passes: usize,

    /// Built-in scene.
    #[clap(
        long = "scene",
        short = 's',
        value_name = "NAME",
        default_value = "cornell",
        help = "Built-in scene to render (cornell, spheres or plane)."
    )]
    pub scene: String,

    /// Image width.
    #[clap(long, value_name = "NUM", default_value_t = ImageSettings::default().width, help = "Image width in pixels.")]
    pub width: usize,

    /// Image height.
    #[clap(long, value_name = "NUM", default_value_t = ImageSettings::default().height, help = "Image height in pixels.")]
    pub height: usize,

    /// Supersampling factor.
    #[clap(
        long,
        value_name = "NUM",
        default_value_t = ImageSettings::default().base,
        help = "Per-axis supersampling factor; each pixel takes base^2 samples."
    )]
    pub base: usize,

    /// Bin capacity exponent.
    #[clap(
        long = "bin-exponent",
        value_name = "NUM",
        default_value_t = Settings::default().bin_exponent,
        help = "Bins and batches hold 2^NUM rays."
    )]
    pub bin_exponent: usize,

    /// Camera bucket size.
    #[clap(
        long = "bucket-size",
        value_name = "NUM",
        default_value_t = Settings::default().bucket_size,
        help = "Size in pixels of square camera buckets."
    )]
    pub bucket_size: usize,

    /// Shading run cap.
    #[clap(
        long = "shading-size",
        value_name = "NUM",
        default_value_t = Settings::default().shading_size,
        help = "Maximum number of rays in one shading task."
    )]
    pub shading_size: usize,

    /// Russian roulette depth.
    #[clap(
        long = "min-depth",
        value_name = "NUM",
        default_value_t = Settings::default().min_depth,
        help = "Depth after which paths may be terminated by Russian roulette."
    )]
    pub min_depth: u32,

    /// Maximum path depth.
    #[clap(
        long = "max-depth",
        value_name = "NUM",
        default_value_t = Settings::default().max_depth,
        help = "Maximum path depth."
    )]
    pub max_depth: u32,

    /// Russian roulette threshold.
    #[clap(
        long = "threshold",
        value_name = "FLOAT",
        default_value_t = Settings::default().threshold,
        help = "Path throughput below which Russian roulette is applied."
    )]
    pub threshold: f32,

    /// Batch directory.
    #[clap(long = "batch-dir", value_name = "DIR", help = "Directory for transient batch files.")]
    pub batch_dir: Option<PathBuf>,

    /// Asset root.
    #[clap(
        long = "asset-root",
        value_name = "DIR",
        help = "Base directory for relative texture paths."
    )]
    pub asset_root: Option<PathBuf>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the renderer settings selected by the options.
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            bucket_size: self.bucket_size,
            shading_size: self.shading_size,
            bin_exponent: self.bin_exponent,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            threshold: self.threshold,
            batch_dir: self.batch_dir.clone().unwrap_or(defaults.batch_dir),
            asset_root: self.asset_root.clone().unwrap_or(defaults.asset_root),
            background: defaults.background,
        }
    }

    /// Returns the image settings selected by the options.
    pub fn image_settings(&self) -> ImageSettings {
        ImageSettings {
            width: self.width,
            height: self.height,
            base: self.base,
        }
    }
}

/// Returns a progress bar for `count` steps; hidden when `quiet` is set.
///
/// * `count` - Number of steps.
/// * `quiet` - Suppress output.
pub fn create_progress_reporter(count: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(count);
    match ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        Ok(style) => progress.set_style(style.progress_chars("#>-")),
        Err(e) => warn!("Invalid progress template: {e}"),
    }
    progress
}
