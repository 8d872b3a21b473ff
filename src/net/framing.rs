//! Boundary-exact line framing over a byte stream.
//!
//! # Responsibilities
//! - Expose a "read one line" primitive over any [`AsyncRead`]
//! - Stop exactly at the line-feed terminator, never buffering past it
//! - Distinguish "stream closed before any byte" from an empty line
//!
//! # Design Decisions
//! - One byte per read: unbuffered on purpose. A buffered reader would
//!   consume body bytes along with the header block and break the
//!   "next read sees the first body byte" contract.
//! - A carriage return immediately before the line feed is discarded;
//!   a carriage return anywhere else is kept as line content.

use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads a byte stream one line at a time without overshooting.
///
/// After [`read_line`](LineReader::read_line) returns, the underlying
/// stream is positioned at the first byte after the terminator. Callers
/// that need the remaining bytes (e.g. a request body) take them through
/// [`get_mut`](LineReader::get_mut) or [`into_inner`](LineReader::into_inner).
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wrap a stream for line-at-a-time reading.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one line, stopping exactly at the line-feed terminator.
    ///
    /// Returns `Ok(None)` when the stream ends before any byte is read
    /// (a connection closed without sending a request line). End-of-stream
    /// after at least one byte yields the accumulated partial line.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            let n = self.inner.read(&mut byte).await?;
            if n == 0 {
                if line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if byte[0] == b'\n' {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            line.push(byte[0]);
        }
    }

    /// Access the underlying stream, positioned after the last terminator.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
