//! Cooperative cancellation for long-running searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::DiffError;

/// Lets a caller request that a running diff stop.
///
/// The search stays single-threaded; the handle only flips a flag that the
/// search polls between expansion steps.
#[derive(Clone, Debug)]
pub struct CancellationHandle {
    stop: Arc<AtomicBool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        CancellationHandle {
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        CancellationHandle::new()
    }
}

/// Polled by the search once per loop iteration and inside long inner
/// computations. Raises [`DiffError::Cancelled`] when the stop flag is set
/// or the deadline has passed; the search is then abandoned without a
/// partial result.
#[derive(Debug)]
pub struct RunningCheck {
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RunningCheck {
    pub fn new(timeout: Option<Duration>) -> Self {
        RunningCheck::with_handle(timeout, &CancellationHandle::new())
    }

    /// Starts the deadline clock now, observing an externally held handle.
    pub fn with_handle(timeout: Option<Duration>, handle: &CancellationHandle) -> Self {
        RunningCheck {
            stop: Arc::clone(&handle.stop),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    pub fn handle(&self) -> CancellationHandle {
        CancellationHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    pub fn check(&self) -> Result<(), DiffError> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(DiffError::stop_requested());
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return Err(DiffError::deadline_exceeded());
            }
        }
        Ok(())
    }
}
