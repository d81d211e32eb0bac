//! Lights

#[macro_use]
extern crate log;

mod quad;

// Re-export
pub use quad::*;
