//! Local request handling.
//!
//! # Responsibilities
//! - Frame one request off the connection
//! - Dispatch by method against the storage backend
//! - Write the response and let the connection close
//!
//! Every fault here is local to the connection: parse failures answer
//! 400, storage failures answer 500, I/O failures are logged and the
//! connection is dropped. Nothing propagates to the accept loop.

use std::sync::Arc;

use metrics::counter;
use tokio::net::TcpStream;

use crate::http::mime::content_type_for;
use crate::http::request::{Method, ParseError, Request};
use crate::http::response::{write_response, Status};
use crate::net::framing::LineReader;
use crate::storage::{FileStore, StorageError};

/// Serve one connection to completion, logging any failure.
pub async fn handle_connection(stream: TcpStream, store: Arc<FileStore>) {
    let peer = stream.peer_addr().ok();

    if let Err(e) = serve(stream, store).await {
        tracing::warn!(peer_addr = ?peer, error = %e, "Connection error");
    }
}

async fn serve(mut stream: TcpStream, store: Arc<FileStore>) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = LineReader::new(read_half);

    let request = match Request::read_from(&mut reader).await {
        Ok(Some(request)) => request,
        // Closed before a request line arrived; drop without a response.
        Ok(None) => return Ok(()),
        Err(ParseError::Io(e)) => return Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting malformed request");
            counter!("fileserver_requests_total", "method" => "invalid").increment(1);
            return write_response(&mut write_half, Status::BadRequest, "text/plain", b"Bad Request")
                .await;
        }
    };

    counter!("fileserver_requests_total", "method" => request.method.as_str().to_string())
        .increment(1);
    tracing::debug!(
        method = request.method.as_str(),
        path = %request.path,
        content_length = request.content_length,
        "Handling request"
    );

    match request.method {
        Method::Get => match store.read(&request.path).await {
            Ok(Some(content)) => {
                let content_type = content_type_for(&request.path);
                write_response(&mut write_half, Status::Ok, content_type, &content).await
            }
            Ok(None) => {
                write_response(&mut write_half, Status::NotFound, "text/plain", b"File not found")
                    .await
            }
            Err(e) => storage_failure(&mut write_half, &request.path, e).await,
        },

        Method::Post | Method::Put => {
            let length = request.content_length as u64;
            match store.write(&request.path, reader.get_mut(), length).await {
                Ok(written) => {
                    if written < length {
                        tracing::warn!(
                            path = %request.path,
                            declared = length,
                            written,
                            "Body ended early; stored what arrived"
                        );
                    }
                    write_response(&mut write_half, Status::Ok, "text/plain", b"File saved").await
                }
                Err(e) => storage_failure(&mut write_half, &request.path, e).await,
            }
        }

        Method::Delete => match store.delete(&request.path).await {
            Ok(true) => write_response(&mut write_half, Status::Ok, "text/plain", b"Deleted").await,
            Ok(false) => {
                write_response(&mut write_half, Status::NotFound, "text/plain", b"Not Found").await
            }
            Err(e) => storage_failure(&mut write_half, &request.path, e).await,
        },

        Method::Other(_) => {
            write_response(&mut write_half, Status::MethodNotAllowed, "text/plain", b"Error").await
        }
    }
}

async fn storage_failure<W: tokio::io::AsyncWrite + Unpin>(
    writer: &mut W,
    path: &str,
    error: StorageError,
) -> std::io::Result<()> {
    match error {
        StorageError::InvalidPath(_) => {
            tracing::debug!(path = %path, "Rejecting path outside storage root");
            write_response(writer, Status::BadRequest, "text/plain", b"Bad Request").await
        }
        StorageError::Io(e) => {
            tracing::error!(path = %path, error = %e, "Storage operation failed");
            write_response(
                writer,
                Status::InternalServerError,
                "text/plain",
                b"Internal Server Error",
            )
            .await
        }
    }
}
