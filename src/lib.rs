//! Dynalog - a single-instance daemon with runtime-adjustable logging
//!
//! The first invocation becomes the server: it owns a local control
//! socket, runs a periodic tick, and reacts to termination signals.
//! Any further invocation forwards its command-line arguments over the
//! socket (`-f <pattern>`, `-r <rules>`, `-q`) and exits, so the running
//! instance's log format and filter rules can be changed without a
//! restart.
//!
//! # Architecture
//! - `config`: Configuration management (TOML + environment overrides)
//! - `errors`: Crate error type
//! - `structs`: Shared value types
//! - `system`: Role arbitration, control channel, logging, shutdown

pub mod config;
pub mod errors;
pub mod structs;
pub mod system;
