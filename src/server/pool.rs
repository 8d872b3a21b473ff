//! Bounded worker pool for local connection handling.
//!
//! # Responsibilities
//! - Bound the number of concurrently handled local connections
//! - Track current occupancy for the admission decision
//!
//! Occupancy counts only locally-dispatched connections; proxied
//! connections never touch the pool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded set of execution slots.
///
/// Invariant: occupancy never exceeds capacity; the semaphore enforces
/// it even if callers race past the admission check.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            active: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Configured slot count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Connections currently being handled locally.
    pub fn occupancy(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Acquire a slot, waiting if the pool is full.
    ///
    /// The returned guard releases the slot when dropped, so a panicking
    /// handler task still frees its slot.
    pub async fn acquire(&self) -> WorkerSlot {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("Semaphore closed unexpectedly");

        self.active.fetch_add(1, Ordering::SeqCst);

        WorkerSlot {
            _permit: permit,
            active: Arc::clone(&self.active),
        }
    }
}

/// Guard for one occupied pool slot; releases on drop.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
    active: Arc<AtomicUsize>,
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
