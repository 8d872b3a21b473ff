//! Overflow proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Escalated client connection
//!     → relay.rs opens an upstream connection to the overflow port
//!     → two concurrent copy loops (client→upstream, upstream→client)
//!     → session ends only when BOTH directions have drained
//!     → both connections close
//! ```
//!
//! # Design Decisions
//! - Byte-transparent: nothing is parsed or rewritten on this path
//! - An error in one direction ends that loop only; teardown still
//!   waits for the other direction (a join, not a race)
//! - No timeouts; a hung peer holds its session open indefinitely

pub mod relay;

pub use relay::{relay, RelayError, RelayStats};
