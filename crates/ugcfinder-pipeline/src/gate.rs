//! Counting gate in front of the stats jobs.
//!
//! Every job except the one for profile 0 needs a permit before it may start
//! fetching. The permit is an RAII guard, so it is returned on every exit
//! path of the job. Profile 0 is exempt unless `gate_first_profile` is set.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    held: Arc<AtomicUsize>,
    capacity: usize,
    gate_first_profile: bool,
}

/// Proof of admission. Dropping it frees the slot.
#[derive(Debug)]
pub struct GatePermit {
    inner: Option<(OwnedSemaphorePermit, Arc<AtomicUsize>)>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        if let Some((_, held)) = &self.inner {
            held.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl ConcurrencyGate {
    #[must_use]
    pub fn new(capacity: usize, gate_first_profile: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            held: Arc::new(AtomicUsize::new(0)),
            capacity,
            gate_first_profile,
        }
    }

    /// Waits for admission of the job for profile `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] only if the semaphore was closed, which this
    /// type never does.
    pub async fn enter(&self, index: usize) -> Result<GatePermit, AcquireError> {
        if index == 0 && !self.gate_first_profile {
            return Ok(GatePermit { inner: None });
        }
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        self.held.fetch_add(1, Ordering::SeqCst);
        Ok(GatePermit {
            inner: Some((permit, Arc::clone(&self.held))),
        })
    }

    /// Permits currently handed out.
    #[must_use]
    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
