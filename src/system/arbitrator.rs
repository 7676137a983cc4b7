//! Startup role arbitration
//!
//! Exactly one bind attempt decides what this invocation becomes: the
//! long-lived server, a short-lived client that forwards its arguments,
//! or a process that terminates immediately (nothing to forward, or a
//! stale endpoint that only needed cleaning).

use std::time::Duration;
use tokio::net::UnixListener;
use tracing::{debug, info};

use crate::errors::{DynalogError, Result};
use crate::system::ipc::client::{forward_args, ForwardOutcome};
use crate::system::ipc::endpoint::{ClaimError, Endpoint};

/// The states of the role decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Undetermined,
    Server,
    Client,
    Terminating,
}

/// Outcome of the role decision
#[derive(Debug)]
pub enum Arbitration {
    /// This process owns the endpoint and runs the event loop
    Server(UnixListener),
    /// The arguments were handed to the running instance
    Forwarded(ForwardOutcome),
    /// An instance is already running and there was nothing to forward
    AlreadyRunning,
    /// The endpoint was registered but dead; the registration was
    /// removed so a future invocation can bind it
    CleanedStale,
}

/// Decide this process's role.
///
/// `args` are the invocation arguments with the program name already
/// stripped; an empty slice means there is nothing to forward.
pub async fn arbitrate(
    endpoint: &Endpoint,
    args: &[String],
    io_timeout: Duration,
) -> Result<Arbitration> {
    debug!("role {:?}: attempting to claim endpoint", Role::Undetermined);

    match endpoint.claim() {
        Ok(listener) => {
            debug!("role {:?}: endpoint claimed", Role::Server);
            Ok(Arbitration::Server(listener))
        }
        Err(ClaimError::AlreadyClaimed) => {
            if args.is_empty() {
                info!(
                    "role {:?}: already running and nothing to forward",
                    Role::Terminating
                );
                return Ok(Arbitration::AlreadyRunning);
            }

            debug!(
                "role {:?}: endpoint already claimed, forwarding arguments",
                Role::Client
            );
            match forward_args(endpoint, args, io_timeout).await {
                Ok(ForwardOutcome::Unreachable) => {
                    endpoint.remove_stale();
                    Ok(Arbitration::CleanedStale)
                }
                Ok(outcome) => Ok(Arbitration::Forwarded(outcome)),
                Err(e) => Err(DynalogError::connection(e.to_string())),
            }
        }
        Err(ClaimError::Io(e)) => Err(DynalogError::endpoint_claim(format!(
            "cannot bind {}: {}",
            endpoint.path().display(),
            e
        ))),
    }
}
