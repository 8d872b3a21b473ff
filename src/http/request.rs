//! Streaming request parser.
//!
//! # Responsibilities
//! - Read exactly one request line through the line framer
//! - Collect the header block, stopping at the empty line
//! - Extract the declared body length (absent or invalid → 0)
//!
//! # Design Decisions
//! - The path is decoded only by stripping a single leading `/`;
//!   no percent-decoding
//! - Header keys are lowercased once at parse time, giving
//!   case-insensitive lookup without a custom map type
//! - A missing method or path token is a client error, never a panic

use std::collections::HashMap;

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::net::framing::LineReader;

/// HTTP parsing error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The request line did not contain both a method and a path token.
    #[error("malformed request line {0:?}")]
    MalformedRequestLine(String),

    /// The stream ended inside the header block.
    #[error("connection closed mid-request")]
    UnexpectedEof,

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    /// Anything else; answered with 405 by the handler.
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }

    /// The method token as sent by the client.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Other(token) => token,
        }
    }
}

/// A parsed request: created per connection, consumed by the handler.
#[derive(Debug)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Path with the single leading separator stripped.
    pub path: String,
    /// Header mapping, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Declared body length; 0 when absent or unparsable.
    pub content_length: usize,
}

impl Request {
    /// Read one request from the framer.
    ///
    /// Returns `Ok(None)` when the stream closed before a request line
    /// arrived; the caller drops the connection without a response.
    /// After this returns, the framer's underlying stream is positioned
    /// exactly at the first body byte.
    pub async fn read_from<R: AsyncRead + Unpin>(
        reader: &mut LineReader<R>,
    ) -> Result<Option<Self>, ParseError> {
        let Some(request_line) = reader.read_line().await? else {
            return Ok(None);
        };

        let mut tokens = request_line.split_whitespace();
        let method = match tokens.next() {
            Some(token) => Method::from_token(token),
            None => return Err(ParseError::MalformedRequestLine(request_line)),
        };
        let raw_path = match tokens.next() {
            Some(token) => token,
            None => return Err(ParseError::MalformedRequestLine(request_line)),
        };
        let path = raw_path.strip_prefix('/').unwrap_or(raw_path).to_string();

        let mut headers = HashMap::new();
        loop {
            let line = reader
                .read_line()
                .await?
                .ok_or(ParseError::UnexpectedEof)?;
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let content_length = headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Ok(Some(Self {
            method,
            path,
            headers,
            content_length,
        }))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
