//! Pass Statistics

use std::fmt;

/// Counters for one pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Batches processed.
    pub batches: u64,

    /// Camera rays generated.
    pub primary_rays: u64,

    /// Rays read back from batch files.
    pub rays_read: u64,

    /// Rays written to batch files.
    pub rays_written: u64,

    /// Shading runs dispatched.
    pub runs: u64,

    /// Rays spawned by shaders.
    pub secondary_rays: u64,

    /// Partially filled bins flushed to keep the pass moving.
    pub forced_flushes: u64,
}

impl fmt::Display for PassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} batches, {} primary rays, {} secondary rays, {} rays read, {} rays written, {} runs, {} forced flushes",
            self.batches,
            self.primary_rays,
            self.secondary_rays,
            self.rays_read,
            self.rays_written,
            self.runs,
            self.forced_flushes
        )
    }
}
