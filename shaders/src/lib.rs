//! Shaders

mod constant;
mod lambert;
mod null;

// Re-export
pub use constant::*;
pub use lambert::*;
pub use null::*;

#[cfg(test)]
pub(crate) mod test_scene;
