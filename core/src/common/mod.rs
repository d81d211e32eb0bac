//! Common numeric types and helpers shared by every crate in the workspace.

mod axis;
mod math;

// Re-export
pub use axis::*;
pub use math::*;
