//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fileserver_connections_total` (counter, `route` label): accepted
//!   connections by admission outcome (local / proxy)
//! - `fileserver_requests_total` (counter, `method` label): parsed
//!   requests, plus `invalid` for malformed ones
//! - `fileserver_pool_occupancy` (gauge): worker-pool occupancy sampled
//!   at each accept
//! - `fileserver_secondary_spawns_total` (counter): secondary boots
//!   (at most 1 per primary lifetime)
//! - `fileserver_proxy_errors_total` (counter): relay sessions that
//!   failed to reach the upstream
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - The exporter binds its own address and never touches the data path

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
///
/// Failure to install is logged and otherwise ignored; the server runs
/// fine without an exporter, metrics just have nowhere to go.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}
