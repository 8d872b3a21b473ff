//! Storage backend subsystem.
//!
//! A path-addressable byte store over a root directory, with the four
//! operations the request handler needs: exists, read, write, delete.
//! The store serializes nothing beyond what the filesystem serializes;
//! concurrent writers to the same path may interleave.

pub mod file_store;

pub use file_store::{FileStore, StorageError};
