//! Prefetch
//!
//! A single background thread loads the next batch while the current one is
//! processed. At most one load is outstanding; its buffer belongs to the
//! loader until `wait()` hands it back.

use crate::batch::*;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// A finished background load.
pub struct Prefetched {
    /// The batch.
    pub item: BatchItem,

    /// The buffer the batch was read into.
    pub buffer: Vec<u8>,

    /// Outcome of the read.
    pub result: Result<(), String>,
}

/// The background batch loader.
pub struct Loader {
    /// Load requests; `None` once shutting down.
    requests: Option<Sender<(BatchItem, Vec<u8>)>>,

    /// Finished loads.
    results: Receiver<Prefetched>,

    /// The loader thread.
    handle: Option<JoinHandle<()>>,

    /// A request is outstanding.
    pending: bool,
}

impl Loader {
    /// Start the loader thread.
    pub fn spawn() -> Result<Self, String> {
        let (request_tx, request_rx) = bounded::<(BatchItem, Vec<u8>)>(1);
        let (result_tx, result_rx) = bounded::<Prefetched>(1);

        let handle = thread::Builder::new()
            .name("batch-loader".to_string())
            .spawn(move || {
                for (item, mut buffer) in request_rx.iter() {
                    let result = load_batch(&item, &mut buffer);
                    if result_tx.send(Prefetched { item, buffer, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| format!("Loader::spawn(): unable to start loader thread: {e}"))?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
            pending: false,
        })
    }

    /// Returns true if a load is outstanding.
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start loading `item` into `buffer`.
    ///
    /// * `item`   - The batch.
    /// * `buffer` - Buffer to read into; returned by `wait()`.
    pub fn request(&mut self, item: BatchItem, buffer: Vec<u8>) -> Result<(), String> {
        assert!(!self.pending, "a batch is already being prefetched");

        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| "Loader::request(): loader is shut down".to_string())?;
        requests
            .send((item, buffer))
            .map_err(|_| "Loader::request(): loader thread has exited".to_string())?;
        self.pending = true;
        Ok(())
    }

    /// Block until the outstanding load completes. Returns `None` if nothing
    /// is outstanding.
    pub fn wait(&mut self) -> Result<Option<Prefetched>, String> {
        if !self.pending {
            return Ok(None);
        }
        self.pending = false;
        self.results
            .recv()
            .map(Some)
            .map_err(|_| "Loader::wait(): loader thread has exited".to_string())
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        // Closing the request channel ends the thread's loop.
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Batch loader thread panicked");
            }
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
    use crate::ray::*;

    #[test]
    fn loads_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let queue = BatchQueue::new(dir.path()).unwrap();
        let ray = Ray::camera(Point3f::zero(), Vector3f::new(0.0, 1.0, 0.0), 3, 4, 5);
        let item = queue.persist(DirectionClass::PosY, &[encode(&ray)]).unwrap();

        let mut loader = Loader::spawn().unwrap();
        assert!(loader.wait().unwrap().is_none());

        loader.request(item.clone(), Vec::new()).unwrap();
        assert!(loader.is_pending());
        let done = loader.wait().unwrap().unwrap();
        assert!(!loader.is_pending());
        assert!(done.result.is_ok());
        assert_eq!(done.item, item);
        assert_eq!(decode(&CompressedRay::read(&done.buffer)), ray);
        remove_batch(&item.path).unwrap();
    }

    #[test]
    fn reports_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let item = BatchItem {
            path: dir.path().join("gone.rays"),
            count: 1,
            class: DirectionClass::NegZ,
        };

        let mut loader = Loader::spawn().unwrap();
        loader.request(item, Vec::new()).unwrap();
        assert!(loader.wait().unwrap().unwrap().result.is_err());
    }

    #[test]
    #[should_panic]
    fn prefetch_depth_is_one() {
        let dir = tempfile::tempdir().unwrap();
        let item = BatchItem {
            path: dir.path().join("a.rays"),
            count: 0,
            class: DirectionClass::PosX,
        };
        let mut loader = Loader::spawn().unwrap();
        loader.request(item.clone(), Vec::new()).unwrap();
        let _ = loader.request(item, Vec::new());
    }
}
