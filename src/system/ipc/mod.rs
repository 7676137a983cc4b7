//! IPC (Inter-Process Communication) module
//!
//! Local control channel between an already-running instance (server)
//! and a second invocation of the same binary (client).
//!
//! # Architecture
//!
//! - **endpoint.rs**: Well-known socket path lifecycle (claim, release, stale cleanup)
//! - **protocol.rs**: Frame encoding/decoding (delimiter-joined text fields)
//! - **types.rs**: Command vocabulary and errors
//! - **server.rs**: Event loop servicing one command per connection
//! - **client.rs**: Fire-and-forget argument forwarding
//! - **handler.rs**: Command dispatch to the logging collaborator / shutdown queue

pub mod client;
pub mod endpoint;
pub mod handler;
pub mod protocol;
pub mod server;
pub mod types;

pub use client::{forward_args, ForwardOutcome};
pub use endpoint::{ClaimError, Endpoint};
pub use handler::ServerContext;
pub use server::ControlServer;
pub use types::{ControlCommand, IpcError};
