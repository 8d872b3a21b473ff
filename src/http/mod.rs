//! Minimal HTTP/1.x text framing and local request handling.
//!
//! # Data Flow
//! ```text
//! TcpStream
//!     → net::framing::LineReader (boundary-exact line reads)
//!     → request.rs (request line, headers, declared body length)
//!     → handler.rs (method dispatch against the storage backend)
//!     → response.rs (status / type / length / close, then raw body)
//! ```
//!
//! # Design Decisions
//! - Parsing is manual and streaming; after the header block the stream
//!   is positioned exactly at the first body byte
//! - Every response closes the connection; no keep-alive, no chunking
//! - Malformed requests answer 400 instead of tearing the task down

pub mod handler;
pub mod mime;
pub mod request;
pub mod response;

pub use request::{Method, ParseError, Request};
pub use response::{write_response, Status};
