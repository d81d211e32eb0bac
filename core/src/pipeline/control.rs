//! Control

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct ControlState {
    terminate: AtomicBool,
    active: AtomicBool,
}

/// Cloneable handle used to observe and cancel a running pass from another
/// thread.
#[derive(Clone, Default)]
pub struct ControlHandle {
    state: Arc<ControlState>,
}

impl ControlHandle {
    /// Request that the current (or next) pass stop. The request is consumed
    /// by the `process()` call that observes it.
    pub fn terminate(&self) {
        self.state.terminate.store(true, Ordering::Release);
    }

    /// Returns true while a pass is running.
    pub fn active(&self) -> bool {
        self.state.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.state.active.store(active, Ordering::Release);
    }

    /// Returns true, clearing the request, if termination was requested.
    pub(crate) fn take_terminate(&self) -> bool {
        self.state.terminate.swap(false, Ordering::AcqRel)
    }
}
