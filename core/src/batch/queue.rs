//! Batch Queue

use super::*;
use crate::ray::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes the batch files of queues sharing a directory.
static NEXT_QUEUE_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// Descriptor of one persisted batch. Whoever dequeues it owns the file and
/// deletes it once the rays are consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    /// Path of the batch file.
    pub path: PathBuf,

    /// Number of compressed rays in the file.
    pub count: usize,

    /// Direction class shared by every ray in the batch.
    pub class: DirectionClass,
}

/// Unordered multi-producer/multi-consumer queue of persisted batches.
pub struct BatchQueue {
    /// Directory holding the batch files.
    dir: PathBuf,

    /// Instance number used in file names.
    instance: u64,

    /// Next batch number used in file names.
    next_id: AtomicU64,

    /// Producer side.
    sender: Sender<BatchItem>,

    /// Consumer side.
    receiver: Receiver<BatchItem>,

    /// Total rays persisted through this queue.
    rays_written: AtomicU64,
}

impl BatchQueue {
    /// Create a new `BatchQueue` writing into `dir`, creating it if needed.
    ///
    /// * `dir` - Directory for batch files.
    pub fn new(dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("BatchQueue::new(): error creating '{}': {e}", dir.display()))?;

        let (sender, receiver) = unbounded();
        Ok(Self {
            dir: dir.to_path_buf(),
            instance: NEXT_QUEUE_INSTANCE.fetch_add(1, Ordering::Relaxed),
            next_id: AtomicU64::new(0),
            sender,
            receiver,
            rays_written: AtomicU64::new(0),
        })
    }

    /// Returns the batch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `records` to a newly named batch file and return its descriptor.
    /// The item is not queued.
    ///
    /// * `class`   - Direction class of the records.
    /// * `records` - The records.
    pub fn persist(&self, class: DirectionClass, records: &[CompressedRay]) -> Result<BatchItem, String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("q{}_b{id}_{class}.rays", self.instance));
        write_batch(&path, records)?;

        self.rays_written.fetch_add(records.len() as u64, Ordering::Relaxed);
        Ok(BatchItem {
            path,
            count: records.len(),
            class,
        })
    }

    /// Queue a batch.
    ///
    /// * `item` - The batch descriptor.
    pub fn push(&self, item: BatchItem) {
        // Both channel ends live in `self` so the send cannot fail.
        let _ = self.sender.send(item);
    }

    /// Dequeue a batch without blocking.
    pub fn try_pop(&self) -> Option<BatchItem> {
        self.receiver.try_recv().ok()
    }

    /// Dequeue every queued batch, deleting its file. Returns the number of
    /// batches discarded.
    pub fn drain(&self) -> usize {
        let mut n = 0;
        while let Some(item) = self.try_pop() {
            if let Err(e) = remove_batch(&item.path) {
                error!("{e}");
            }
            n += 1;
        }
        n
    }

    /// Returns the number of queued batches.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if no batches are queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Returns the total number of rays persisted so far.
    pub fn rays_written(&self) -> u64 {
        self.rays_written.load(Ordering::Relaxed)
    }
}

impl Drop for BatchQueue {
    fn drop(&mut self) {
        let n = self.drain();
        if n > 0 {
            warn!("Discarded {n} unprocessed batches in '{}'", self.dir.display());
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;

    fn records(n: usize) -> Vec<CompressedRay> {
        (0..n)
            .map(|i| encode(&Ray::camera(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), i as u32, 0, 0)))
            .collect()
    }

    #[test]
    fn persisted_names_are_unique_across_queues() {
        let dir = tempfile::tempdir().unwrap();
        let q1 = BatchQueue::new(dir.path()).unwrap();
        let q2 = BatchQueue::new(dir.path()).unwrap();

        let a = q1.persist(DirectionClass::PosX, &records(2)).unwrap();
        let b = q2.persist(DirectionClass::PosX, &records(3)).unwrap();
        let c = q1.persist(DirectionClass::PosX, &records(1)).unwrap();
        assert_ne!(a.path, b.path);
        assert_ne!(a.path, c.path);
        assert_eq!(q1.rays_written(), 3);
        assert_eq!(q2.rays_written(), 3);

        q1.push(a);
        q1.push(c);
        q2.push(b);
        assert_eq!(q1.len(), 2);
    }

    #[test]
    fn drain_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let q = BatchQueue::new(dir.path()).unwrap();
        let mut paths = vec![];
        for n in 1..=3 {
            let item = q.persist(DirectionClass::NegY, &records(n)).unwrap();
            paths.push(item.path.clone());
            q.push(item);
        }

        assert_eq!(q.drain(), 3);
        assert!(q.is_empty());
        assert!(q.try_pop().is_none());
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn concurrent_push_and_pop() {
        let dir = tempfile::tempdir().unwrap();
        let q = BatchQueue::new(dir.path()).unwrap();

        crossbeam::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|_| {
                    for _ in 0..8 {
                        let item = q.persist(DirectionClass::PosZ, &records(1)).unwrap();
                        q.push(item);
                    }
                });
            }
        })
        .unwrap();

        let mut popped = 0;
        while let Some(item) = q.try_pop() {
            remove_batch(&item.path).unwrap();
            popped += 1;
        }
        assert_eq!(popped, 32);
    }
}
