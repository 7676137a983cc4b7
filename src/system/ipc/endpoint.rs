//! Control endpoint registry
//!
//! Manages the lifecycle of the well-known socket path: claimed by the
//! one process that becomes the server, released when that process shuts
//! down, and forcibly removed by a client that finds the registration
//! stale (socket file present but nothing accepting).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::net::UnixListener;
use tracing::{debug, info, warn};

/// The well-known local control endpoint
#[derive(Debug, Clone)]
pub struct Endpoint {
    path: PathBuf,
}

/// Why a claim attempt did not produce a listener
#[derive(Debug)]
pub enum ClaimError {
    /// The socket path is already registered. Routes to the client role;
    /// this covers both a live server and a stale registration.
    AlreadyClaimed,
    /// Any other bind failure (permissions, missing directory, ...)
    Io(io::Error),
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimError::AlreadyClaimed => write!(f, "endpoint is already claimed"),
            ClaimError::Io(e) => write!(f, "endpoint bind failed: {}", e),
        }
    }
}

impl std::error::Error for ClaimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClaimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Endpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to claim the endpoint by binding a listener.
    ///
    /// A pre-existing socket file is never removed here: a successful
    /// bind is what makes this process the server, so removing the file
    /// first would defeat the mutual exclusion.
    pub fn claim(&self) -> Result<UnixListener, ClaimError> {
        match UnixListener::bind(&self.path) {
            Ok(listener) => {
                info!("control endpoint bound at {}", self.path.display());
                Ok(listener)
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => Err(ClaimError::AlreadyClaimed),
            Err(e) => Err(ClaimError::Io(e)),
        }
    }

    /// Remove the socket file on server shutdown
    pub fn release(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("control endpoint {} released", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("control endpoint {} was already gone", self.path.display())
            }
            Err(e) => warn!(
                "failed to remove control endpoint {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    /// Remove a registered-but-unreachable socket file so that a future
    /// invocation can bind it again
    pub fn remove_stale(&self) {
        warn!(
            "removing stale control endpoint {}",
            self.path.display()
        );
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "failed to remove stale control endpoint {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }

    /// Probe whether a server is actually accepting on this endpoint.
    ///
    /// A quick synchronous connect; a socket file without a live server
    /// behind it fails with ECONNREFUSED.
    pub fn is_live(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        std::os::unix::net::UnixStream::connect(&self.path).is_ok()
    }
}
