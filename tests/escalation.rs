//! Admission-control and overflow-escalation behavior.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use scaling_fileserver::{FileStore, ServerRole};

mod common;

/// Open a connection that occupies a worker slot indefinitely: a POST
/// whose declared body never arrives until `finish` is called.
struct HeldConnection {
    stream: TcpStream,
}

impl HeldConnection {
    async fn open(addr: SocketAddr, path: &str) -> Self {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let head = format!("POST /{path} HTTP/1.1\r\nContent-Length: 10\r\n\r\n");
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        Self { stream }
    }

    /// Send the outstanding body bytes and return the response head.
    async fn finish(mut self) -> String {
        self.stream.write_all(b"0123456789").await.unwrap();
        self.stream.flush().await.unwrap();

        let mut response = Vec::new();
        self.stream.read_to_end(&mut response).await.unwrap();
        let (head, _) = common::split_response(&response);
        head
    }
}

#[tokio::test]
async fn test_connections_below_threshold_dispatch_locally() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());

    let primary_addr = common::free_addr().await;
    let overflow_addr = common::free_addr().await;

    // Overflow port has no listener; a proxied connection would fail.
    common::start_instance(
        primary_addr,
        ServerRole::Primary {
            overflow_port: overflow_addr.port(),
        },
        8,
        store.clone(),
    )
    .await;

    store.write("seed.txt", &mut &b"seeded"[..], 6).await.unwrap();

    // Sequential requests never push occupancy near the threshold of 4,
    // so every one of them is served locally.
    for _ in 0..3 {
        let response = common::send_raw(
            primary_addr,
            b"GET /seed.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
        )
        .await;
        let (head, body) = common::split_response(&response);
        assert!(head.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(body, b"seeded");
    }

    // And nothing was spawned on the overflow port.
    assert!(TcpStream::connect(overflow_addr).await.is_err());
}

#[tokio::test]
async fn test_threshold_crossing_spawns_secondary_and_proxies() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());

    let primary_addr = common::free_addr().await;
    let overflow_addr = common::free_addr().await;

    // Capacity 4 → escalation threshold 2.
    common::start_instance(
        primary_addr,
        ServerRole::Primary {
            overflow_port: overflow_addr.port(),
        },
        4,
        store.clone(),
    )
    .await;

    store.write("hello.txt", &mut &b"hi"[..], 2).await.unwrap();

    // Two connections occupy slots below the threshold; no secondary yet.
    let held1 = HeldConnection::open(primary_addr, "slow1").await;
    let held2 = HeldConnection::open(primary_addr, "slow2").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        TcpStream::connect(overflow_addr).await.is_err(),
        "secondary must not exist before the threshold is crossed"
    );

    // The connection that observes occupancy 2 crosses the threshold.
    // The secondary is still booting, so this particular request may see
    // a closed connection; tolerate either outcome.
    {
        let mut stream = TcpStream::connect(primary_addr).await.unwrap();
        let _ = stream
            .write_all(b"GET /hello.txt HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut sink = Vec::new();
        let _ = stream.read_to_end(&mut sink).await;
    }

    // Exactly one secondary comes up on the overflow port.
    common::wait_for_listener(overflow_addr).await;

    // Later connections through the primary are relayed to it and see
    // the same storage root.
    let response = common::send_raw(
        primary_addr,
        b"GET /hello.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
    )
    .await;
    let (head, body) = common::split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"), "head: {head}");
    assert_eq!(body, b"hi");

    // A write through the proxied path lands in the shared store.
    let request = b"POST /via-proxy.txt HTTP/1.1\r\nContent-Length: 7\r\n\r\nproxied";
    let response = common::send_raw(primary_addr, request).await;
    let (head, _) = common::split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(
        store.read("via-proxy.txt").await.unwrap().unwrap(),
        b"proxied"
    );

    // The held connections were being handled locally all along.
    assert!(held1.finish().await.starts_with("HTTP/1.1 200 OK"));
    assert!(held2.finish().await.starts_with("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn test_escalation_is_one_way_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());

    let primary_addr = common::free_addr().await;
    let overflow_addr = common::free_addr().await;

    // Occupy the overflow port ourselves with a distinctive mock. The
    // instance's own spawn attempt will fail to bind (logged, ignored),
    // and every proxied connection observably lands here.
    common::start_mock_upstream(overflow_addr, "from-upstream").await;

    // Capacity 2 → threshold 1.
    common::start_instance(
        primary_addr,
        ServerRole::Primary {
            overflow_port: overflow_addr.port(),
        },
        2,
        store.clone(),
    )
    .await;

    store.write("f.txt", &mut &b"local-data"[..], 10).await.unwrap();

    // Below threshold: answered by the primary itself.
    let response = common::send_raw(
        primary_addr,
        b"GET /f.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
    )
    .await;
    let (_, body) = common::split_response(&response);
    assert_eq!(body, b"local-data");

    // Hold a slot so the next accept observes occupancy 1 ≥ threshold.
    let held = HeldConnection::open(primary_addr, "slow").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = common::send_raw(
        primary_addr,
        b"GET /f.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
    )
    .await;
    let (_, body) = common::split_response(&response);
    assert_eq!(body, b"from-upstream", "threshold crossing must proxy");

    // Load drops back to zero...
    assert!(held.finish().await.starts_with("HTTP/1.1 200 OK"));
    tokio::time::sleep(Duration::from_millis(100)).await;

    // ...but the latch holds: connections keep going to the upstream.
    for _ in 0..3 {
        let response = common::send_raw(
            primary_addr,
            b"GET /f.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
        )
        .await;
        let (_, body) = common::split_response(&response);
        assert_eq!(body, b"from-upstream", "escalation must be one-way");
    }
}
