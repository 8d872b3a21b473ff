//! Admission control: local dispatch vs. overflow escalation.
//!
//! # Responsibilities
//! - Decide, per accepted connection, whether it is handled locally or
//!   relayed to the overflow instance
//! - Own the one-time secondary-spawn decision
//!
//! # Design Decisions
//! - The escalation threshold is half the pool capacity (integer
//!   division), matching occupancy at the moment of accept
//! - Escalation is a latch: once crossed, every later connection on
//!   this instance proxies, regardless of current occupancy
//! - The latch transition is a compare-and-swap; exactly one caller
//!   observes it and triggers the spawn, even under concurrent
//!   triggering

use std::sync::atomic::{AtomicBool, Ordering};

/// Where an accepted connection goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Dispatch into the worker pool.
    Local,
    /// Relay to the overflow port. `spawn_secondary` is true for exactly
    /// one decision in the controller's lifetime: the caller that must
    /// boot the secondary instance.
    Proxy {
        target_port: u16,
        spawn_secondary: bool,
    },
}

/// Per-instance admission state.
#[derive(Debug)]
pub struct AdmissionController {
    threshold: usize,
    overflow_port: Option<u16>,
    escalated: AtomicBool,
}

impl AdmissionController {
    /// Create a controller for a pool of `capacity` slots.
    ///
    /// `overflow_port` is `Some` only on a primary instance; a secondary
    /// has no escalation target and always routes locally.
    pub fn new(capacity: usize, overflow_port: Option<u16>) -> Self {
        Self {
            threshold: capacity / 2,
            overflow_port,
            escalated: AtomicBool::new(false),
        }
    }

    /// The occupancy at which escalation begins.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether this instance has started proxying overflow connections.
    pub fn has_escalated(&self) -> bool {
        self.escalated.load(Ordering::Acquire)
    }

    /// Route one accepted connection given the pool occupancy observed
    /// at accept time.
    pub fn decide(&self, occupancy: usize) -> RouteDecision {
        let Some(target_port) = self.overflow_port else {
            return RouteDecision::Local;
        };

        if self.escalated.load(Ordering::Acquire) {
            return RouteDecision::Proxy {
                target_port,
                spawn_secondary: false,
            };
        }

        if occupancy >= self.threshold {
            // Only the caller that flips the latch spawns the secondary.
            let first = self
                .escalated
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok();
            return RouteDecision::Proxy {
                target_port,
                spawn_secondary: first,
            };
        }

        RouteDecision::Local
    }
}
