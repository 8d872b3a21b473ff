//! Self-Scaling Network File Server
//!
//! A minimal HTTP file server with self-scaling admission control.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │              PRIMARY INSTANCE                 │
//!                      │                                               │
//!   Client ───────────▶│  net::listener ──▶ server::admission          │
//!                      │            │               │                  │
//!                      │     occupancy < N/2   occupancy ≥ N/2         │
//!                      │            │               │ (one-way latch)  │
//!                      │            ▼               ▼                  │
//!                      │  server::pool slot    proxy::relay ───────────┼──┐
//!                      │            │               │                  │  │
//!                      │            ▼          first crossing:         │  │
//!                      │  http::{request,      spawn secondary ────────┼─┐│
//!                      │   handler,response}                           │ ││
//!                      │            │                                  │ ││
//!                      │            ▼                                  │ ││
//!                      │     storage::FileStore ◀──── shared root ─────┼─┼┼──┐
//!                      └──────────────────────────────────────────────┘ ││  │
//!                                                                       ││  │
//!                      ┌──────────────────────────────────────────────┐ ││  │
//!                      │             SECONDARY INSTANCE                │◀┘│  │
//!                      │  same pool capacity, escalation disabled      │◀─┘  │
//!                      │  net → pool → http → storage ─────────────────┼─────┘
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod storage;

// Traffic management
pub mod proxy;
pub mod server;

// Cross-cutting concerns
pub mod observability;

pub use config::ServerConfig;
pub use server::{ServerInstance, ServerRole};
pub use storage::FileStore;
