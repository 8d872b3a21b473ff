//! Response writing.
//!
//! Every response is the same minimal shape: a status line, a content
//! type, an exact content length, `Connection: close`, a blank line, then
//! the raw body. The writer flushes before returning so the bytes are on
//! the wire before the connection is torn down.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl Status {
    /// Status line fragment, code and reason phrase.
    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "200 OK",
            Status::BadRequest => "400 Bad Request",
            Status::NotFound => "404 Not Found",
            Status::MethodNotAllowed => "405 Method Not Allowed",
            Status::InternalServerError => "500 Internal Server Error",
        }
    }

    /// Numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::InternalServerError => 500,
        }
    }
}

/// Write a complete response and flush it.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: Status,
    content_type: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status.reason(),
        content_type,
        body.len()
    );

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await
}
