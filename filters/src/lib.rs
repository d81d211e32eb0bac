//! Filters

mod boxf; // box is reserved keyword
mod tent;

// Re-export.
pub use boxf::*;
pub use tent::*;
