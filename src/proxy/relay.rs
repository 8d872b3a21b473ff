//! Bidirectional byte relay for escalated connections.
//!
//! # Responsibilities
//! - Open the upstream connection to the overflow instance
//! - Shuttle bytes both ways, flushing after every chunk
//! - Tear the session down only after both directions finish
//!
//! Upstream connect failure is the one error surfaced to the caller;
//! the client observes it only as a closed connection. Mid-session
//! errors simply end the affected direction.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Copy buffer size, matching the handler's body streaming granularity.
const CHUNK_SIZE: usize = 8 * 1024;

/// Error type for relay sessions.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Could not reach the overflow instance.
    #[error("failed to connect upstream {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Bytes moved by a completed relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes copied client → upstream.
    pub client_to_upstream: u64,
    /// Bytes copied upstream → client.
    pub upstream_to_client: u64,
}

/// Relay a client connection to `upstream_addr` until both directions
/// reach end-of-stream or fail.
pub async fn relay(client: TcpStream, upstream_addr: SocketAddr) -> Result<RelayStats, RelayError> {
    let upstream = TcpStream::connect(upstream_addr)
        .await
        .map_err(|source| RelayError::Connect {
            addr: upstream_addr,
            source,
        })?;

    let (client_read, client_write) = client.into_split();
    let (upstream_read, upstream_write) = upstream.into_split();

    // Both directions run to completion before the session ends; the
    // connections close when the halves drop.
    let (client_to_upstream, upstream_to_client) = tokio::join!(
        pipe(client_read, upstream_write),
        pipe(upstream_read, client_write),
    );

    Ok(RelayStats {
        client_to_upstream,
        upstream_to_client,
    })
}

/// Copy one direction to end-of-stream or error, flushing every chunk.
/// Forwards the end-of-stream to the write side so the peer observes it.
async fn pipe<R, W>(mut reader: R, mut writer: W) -> u64
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => break,
        };
        if writer.write_all(&buffer[..n]).await.is_err() {
            break;
        }
        if writer.flush().await.is_err() {
            break;
        }
        total += n as u64;
    }

    let _ = writer.shutdown().await;
    total
}
