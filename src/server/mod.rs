//! Server subsystem: admission control and instance lifecycle.
//!
//! # Data Flow
//! ```text
//! Listener accepts a connection
//!     → admission.rs consults pool occupancy
//!     → Local: pool.rs slot acquired, http::handler task spawned
//!     → Proxy: (first crossing) secondary instance spawned in the
//!       background, then proxy::relay task spawned — unbounded,
//!       outside the pool
//! ```
//!
//! # Design Decisions
//! - Escalation is one-way: after the first threshold crossing every
//!   later connection on the instance is proxied, even if load drops
//! - The escalated transition is a single atomic compare-and-swap, so
//!   the secondary is spawned exactly once under any interleaving
//! - Roles are explicit: a secondary is constructed with no overflow
//!   target and can never spawn a tertiary

pub mod admission;
pub mod instance;
pub mod pool;

pub use admission::{AdmissionController, RouteDecision};
pub use instance::{ServeError, ServerInstance, ServerRole};
pub use pool::{WorkerPool, WorkerSlot};
