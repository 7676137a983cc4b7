//! Control channel client
//!
//! Forwards this invocation's arguments to the already-running instance.
//! The protocol is fire-and-forget: the client writes one frame and
//! never waits for a reply.

use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::endpoint::Endpoint;
use super::protocol;
use super::types::IpcError;

/// What happened to the forwarded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The frame was written in full
    Sent { bytes: usize },
    /// The write did not complete within the bound; the message may or
    /// may not have arrived. Not retried.
    SendTimedOut,
    /// The endpoint is registered but nothing answered. The caller is
    /// expected to clean up the stale registration.
    Unreachable,
}

/// Send the given fields to the server behind `endpoint`.
///
/// `io_timeout` bounds both the connect attempt and the write.
pub async fn forward_args(
    endpoint: &Endpoint,
    args: &[String],
    io_timeout: Duration,
) -> Result<ForwardOutcome, IpcError> {
    let mut stream = match timeout(io_timeout, UnixStream::connect(endpoint.path())).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e))
            if matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
            ) =>
        {
            warn!("cannot connect to running instance: {}", e);
            return Ok(ForwardOutcome::Unreachable);
        }
        Ok(Err(e)) => return Err(IpcError::IoError(e)),
        Err(_) => {
            warn!(
                "timed out connecting to {} after {:?}",
                endpoint.path().display(),
                io_timeout
            );
            return Ok(ForwardOutcome::Unreachable);
        }
    };
    debug!("connected to control endpoint");

    let payload = protocol::encode(args)?;
    let write = async {
        stream.write_all(&payload).await?;
        stream.flush().await?;
        // Half-close so the server sees EOF as soon as the frame is out
        stream.shutdown().await
    };
    match timeout(io_timeout, write).await {
        Ok(Ok(())) => {
            info!("sent {} byte(s) to running instance", payload.len());
            Ok(ForwardOutcome::Sent {
                bytes: payload.len(),
            })
        }
        Ok(Err(e)) => Err(IpcError::IoError(e)),
        Err(_) => {
            warn!("cannot send data: write timed out after {:?}", io_timeout);
            Ok(ForwardOutcome::SendTimedOut)
        }
    }
}
