//! Queued process termination
//!
//! Termination is always requested through a channel and observed by the
//! server's event loop, never performed inline. The in-flight dispatch
//! finishes and the endpoint is released before the process exits.

use tokio::sync::mpsc;

/// Why termination was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitReason {
    /// A termination signal (SIGINT, SIGTERM) was received
    Signal(&'static str),
    /// A quit command arrived over the control channel
    ControlQuit,
}

/// Clonable sender half, handed to the dispatcher and the signal listener
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::UnboundedSender<QuitReason>,
}

impl ShutdownHandle {
    /// Queue a termination request. Never blocks.
    pub fn request(&self, reason: QuitReason) {
        let _ = self.tx.send(reason);
    }
}

/// Receiver half, owned by the event loop
#[derive(Debug)]
pub struct ShutdownController {
    rx: mpsc::UnboundedReceiver<QuitReason>,
}

impl ShutdownController {
    /// Wait for the next termination request.
    ///
    /// Returns `None` only when every handle has been dropped.
    pub async fn requested(&mut self) -> Option<QuitReason> {
        self.rx.recv().await
    }
}

pub fn shutdown_channel() -> (ShutdownHandle, ShutdownController) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ShutdownHandle { tx }, ShutdownController { rx })
}
