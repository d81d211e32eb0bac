//! Samplers

mod grid;
mod stratified;

// Re-export.
pub use grid::*;
pub use stratified::*;
