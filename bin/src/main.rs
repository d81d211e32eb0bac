#[macro_use]
extern crate log;

use api::*;
use clap::Parser;
use core::app::*;
use core::image_io::*;
use core::pipeline::*;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = render(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn render(options: &Options) -> Result<(), String> {
    let mut renderer = build_renderer(
        &options.scene,
        options.settings(),
        options.image_settings(),
        options.threads(),
    )?;

    let progress = create_progress_reporter(options.passes as u64 + 1, options.quiet); // Passes + image write
    progress.set_message(format!("Rendering '{}'", options.scene));
    for _ in 0..options.passes {
        match renderer.process()? {
            PassOutcome::Completed(iteration) => debug!("Finished pass {iteration}: {}", renderer.stats()),
            PassOutcome::Aborted => {
                warn!("Rendering aborted");
                break;
            }
        }
        progress.inc(1);
    }

    progress.set_message("Writing image");
    let image = renderer.accumulator();
    if image.iteration() == 0 {
        return Err("No pass completed; not writing an image".to_string());
    }
    write_image(&options.image_file, &image.resolved_rgb(), image.width(), image.height())?;
    progress.inc(1);

    progress.finish_with_message(format!("Wrote '{}'", options.image_file));
    Ok(())
}
