//! Directional Bins

use super::*;
use crate::common::*;
use crate::ray::*;

/// One worker's append buffers, one per direction class. Capacity is fixed at
/// construction and the buffers are never reallocated.
pub struct DirectionalBins {
    /// Capacity of each bin in rays.
    capacity: usize,

    /// Bins indexed by `DirectionClass::index()`.
    bins: Vec<Vec<CompressedRay>>,

    /// Number of partially filled bins flushed on demand.
    forced_flushes: usize,
}

impl DirectionalBins {
    /// Create a new `DirectionalBins` with `2^bin_exponent` slots per bin.
    ///
    /// * `bin_exponent` - Bin capacity exponent.
    pub fn new(bin_exponent: usize) -> Self {
        let capacity = pow2(bin_exponent);
        Self {
            capacity,
            bins: (0..DIRECTION_CLASSES).map(|_| Vec::with_capacity(capacity)).collect(),
            forced_flushes: 0,
        }
    }

    /// Returns the capacity of each bin.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encode a ray into the bin of its direction class, flushing the bin to
    /// `queue` when it becomes full.
    ///
    /// * `ray`   - The ray.
    /// * `queue` - Destination of flushed batches.
    pub fn append(&mut self, ray: &Ray, queue: &BatchQueue) -> Result<(), String> {
        let class = ray.direction_class();
        let bin = &mut self.bins[class.index()];
        assert!(bin.len() < self.capacity, "bin {class} overflow");

        bin.push(encode(ray));
        if bin.len() == self.capacity {
            self.flush_bin(class, queue)?;
        }
        Ok(())
    }

    /// Persist a bin and queue its batch. Empty bins are skipped. Returns the
    /// number of rays flushed.
    ///
    /// * `class` - Direction class of the bin.
    /// * `queue` - Destination of the batch.
    pub fn flush(&mut self, class: DirectionClass, queue: &BatchQueue) -> Result<usize, String> {
        let n = self.bins[class.index()].len();
        if n > 0 && n < self.capacity {
            self.forced_flushes += 1;
        }
        self.flush_bin(class, queue)
    }

    /// Flush every non-empty bin. Returns the number of batches queued.
    ///
    /// * `queue` - Destination of the batches.
    pub fn flush_all(&mut self, queue: &BatchQueue) -> Result<usize, String> {
        let mut batches = 0;
        for class in DirectionClass::ALL {
            if self.flush(class, queue)? > 0 {
                batches += 1;
            }
        }
        Ok(batches)
    }

    /// Empty every bin without persisting it.
    pub fn clear(&mut self) {
        for bin in self.bins.iter_mut() {
            bin.clear();
        }
    }

    /// Returns the number of rays waiting in all bins.
    pub fn len(&self) -> usize {
        self.bins.iter().map(|b| b.len()).sum()
    }

    /// Returns true if every bin is empty.
    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(|b| b.is_empty())
    }

    /// Returns and resets the number of partial bins flushed on demand.
    pub fn take_forced_flushes(&mut self) -> usize {
        std::mem::take(&mut self.forced_flushes)
    }

    fn flush_bin(&mut self, class: DirectionClass, queue: &BatchQueue) -> Result<usize, String> {
        let bin = &mut self.bins[class.index()];
        if bin.is_empty() {
            return Ok(0);
        }

        let item = queue.persist(class, bin)?;
        let n = bin.len();
        bin.clear();
        queue.push(item);
        Ok(n)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
