//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable via RUST_LOG
//! - Metrics are cheap (atomic increments) and always recorded; the
//!   exporter endpoint is opt-in via config

pub mod logging;
pub mod metrics;
