//! System-level modules
//!
//! This module contains system-level functionality:
//! - Role arbitration (server vs. client vs. terminate)
//! - Local control channel (IPC)
//! - Logging initialization and runtime control
//! - Queued shutdown and signal handling

pub mod arbitrator;
pub mod ipc;
pub mod logging;
pub mod shutdown;
pub mod signal;
