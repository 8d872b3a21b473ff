//! Server instance: one listener, one pool, one admission state.
//!
//! # Responsibilities
//! - Bind the listener and run the accept loop
//! - Route each accepted connection per the admission decision
//! - Boot the secondary instance on the first threshold crossing
//!
//! # Design Decisions
//! - The secondary is the same type with `ServerRole::Secondary`: no
//!   overflow target, so it can never spawn a tertiary
//! - Secondary startup runs in the background; a bind failure there is
//!   logged and otherwise surfaces only as per-connection relay errors
//! - Proxied connections spawn unbounded tasks, outside the pool's
//!   backpressure

use std::net::SocketAddr;
use std::sync::Arc;

use metrics::{counter, gauge};
use thiserror::Error;
use tokio::net::TcpStream;

use crate::http::handler::handle_connection;
use crate::net::listener::{Listener, ListenerError};
use crate::proxy::relay::relay;
use crate::server::admission::{AdmissionController, RouteDecision};
use crate::server::pool::WorkerPool;
use crate::storage::FileStore;

/// Error type for running an instance.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Whether an instance may escalate overflow connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerRole {
    /// Accepts client traffic directly and may spawn one secondary.
    Primary { overflow_port: u16 },
    /// Spawned to absorb overflow; always handles locally.
    Secondary,
}

/// One listening server: a bound port, a worker pool, and admission state.
pub struct ServerInstance {
    bind_addr: SocketAddr,
    role: ServerRole,
    pool: WorkerPool,
    admission: Arc<AdmissionController>,
    store: Arc<FileStore>,
}

impl ServerInstance {
    /// Construct an instance. The secondary spawned by a primary shares
    /// the same pool capacity and the same storage backend.
    pub fn new(
        bind_addr: SocketAddr,
        role: ServerRole,
        pool_capacity: usize,
        store: Arc<FileStore>,
    ) -> Self {
        let overflow_port = match role {
            ServerRole::Primary { overflow_port } => Some(overflow_port),
            ServerRole::Secondary => None,
        };

        Self {
            bind_addr,
            role,
            pool: WorkerPool::new(pool_capacity),
            admission: Arc::new(AdmissionController::new(pool_capacity, overflow_port)),
            store,
        }
    }

    /// Bind and serve forever. Returns only if the bind fails; accept
    /// errors are logged and the loop continues.
    pub async fn run(self) -> Result<(), ServeError> {
        let listener = Listener::bind(self.bind_addr).await?;

        tracing::info!(
            address = %self.bind_addr,
            role = ?self.role,
            pool_capacity = self.pool.capacity(),
            escalation_threshold = self.admission.threshold(),
            "Server instance running"
        );

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                    continue;
                }
            };

            let occupancy = self.pool.occupancy();
            gauge!("fileserver_pool_occupancy").set(occupancy as f64);

            match self.admission.decide(occupancy) {
                RouteDecision::Local => {
                    counter!("fileserver_connections_total", "route" => "local").increment(1);
                    let slot = self.pool.acquire().await;
                    let store = Arc::clone(&self.store);

                    tokio::spawn(async move {
                        handle_connection(stream, store).await;
                        drop(slot);
                    });
                }

                RouteDecision::Proxy {
                    target_port,
                    spawn_secondary,
                } => {
                    if spawn_secondary {
                        self.spawn_secondary(target_port);
                    }

                    counter!("fileserver_connections_total", "route" => "proxy").increment(1);
                    self.spawn_relay(stream, peer_addr, target_port);
                }
            }
        }
    }

    /// Boot the secondary instance in the background. Failure is logged,
    /// never retried, and never reported back to this accept loop.
    fn spawn_secondary(&self, port: u16) {
        let mut addr = self.bind_addr;
        addr.set_port(port);
        let capacity = self.pool.capacity();
        let store = Arc::clone(&self.store);

        counter!("fileserver_secondary_spawns_total").increment(1);
        tracing::info!(
            address = %addr,
            "Escalation threshold reached; starting secondary instance"
        );

        tokio::spawn(async move {
            let secondary = ServerInstance::new(addr, ServerRole::Secondary, capacity, store);
            if let Err(e) = secondary.run().await {
                tracing::error!(error = %e, "Failed to start secondary instance");
            }
        });
    }

    fn spawn_relay(&self, stream: TcpStream, peer_addr: SocketAddr, target_port: u16) {
        // The secondary listens on the same host; the relay reaches it
        // over loopback.
        let upstream_addr = SocketAddr::from(([127, 0, 0, 1], target_port));
        tracing::debug!(peer_addr = %peer_addr, upstream = %upstream_addr, "Proxying connection");

        tokio::spawn(async move {
            match relay(stream, upstream_addr).await {
                Ok(stats) => {
                    tracing::debug!(
                        peer_addr = %peer_addr,
                        client_to_upstream = stats.client_to_upstream,
                        upstream_to_client = stats.upstream_to_client,
                        "Relay session complete"
                    );
                }
                Err(e) => {
                    counter!("fileserver_proxy_errors_total").increment(1);
                    tracing::warn!(peer_addr = %peer_addr, error = %e, "Relay session failed");
                }
            }
        });
    }
}
