//! Cameras

#[macro_use]
extern crate log;

mod frame;
mod pinhole_camera;
mod thin_lens_camera;

// Re-export
pub use frame::*;
pub use pinhole_camera::*;
pub use thin_lens_camera::*;
