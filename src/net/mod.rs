//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, bind/accept errors)
//!     → admission decision (server::admission)
//!     → local: framing.rs wraps the stream for boundary-exact reads
//!     → overflow: handed to proxy::relay untouched
//! ```
//!
//! # Design Decisions
//! - The listener itself is unbounded; admission control decides what a
//!   connection costs (a pool slot or a relay task)
//! - Framing never reads past a line terminator, so body reads observe
//!   the exact stream position after the header block

pub mod framing;
pub mod listener;

pub use framing::LineReader;
pub use listener::{Listener, ListenerError};
