//! Batches
//!
//! Rays travel between the producers (camera and shading stages) and the
//! batch loop as persisted batches. A worker appends rays to its directional
//! bins; a full bin, or one flushed on demand, becomes a batch file whose
//! descriptor is pushed onto the shared `BatchQueue`.

mod bin;
mod file;
mod queue;

// Re-export
pub use bin::*;
pub use file::*;
pub use queue::*;
