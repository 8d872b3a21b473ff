//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use scaling_fileserver::{FileStore, ServerInstance, ServerRole};

/// Reserve a free loopback port by binding and immediately dropping a listener.
#[allow(dead_code)]
pub async fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a server instance in the background and wait until it accepts.
#[allow(dead_code)]
pub async fn start_instance(
    addr: SocketAddr,
    role: ServerRole,
    pool_capacity: usize,
    store: Arc<FileStore>,
) {
    let instance = ServerInstance::new(addr, role, pool_capacity, store);
    tokio::spawn(async move {
        let _ = instance.run().await;
    });
    wait_for_listener(addr).await;
    // Let the probe connection's handler finish so it no longer occupies
    // a pool slot when the test starts counting.
    tokio::time::sleep(Duration::from_millis(100)).await;
}

/// Poll until something is listening at `addr`.
#[allow(dead_code)]
pub async fn wait_for_listener(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening at {addr}");
}

/// Send raw bytes and collect the full response until the server closes.
#[allow(dead_code)]
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.flush().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

/// Split a raw response into (head, body) at the blank line.
#[allow(dead_code)]
pub fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    (
        String::from_utf8_lossy(&response[..pos]).into_owned(),
        response[pos + 4..].to_vec(),
    )
}

/// Start a simple mock upstream that returns a fixed response.
#[allow(dead_code)]
pub async fn start_mock_upstream(addr: SocketAddr, response: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start an upstream that echoes every byte back until the client closes.
#[allow(dead_code)]
pub async fn start_echo_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buffer = [0u8; 4096];
                        loop {
                            match socket.read(&mut buffer).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    if socket.write_all(&buffer[..n]).await.is_err() {
                                        break;
                                    }
                                    let _ = socket.flush().await;
                                }
                            }
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
