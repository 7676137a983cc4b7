//! OS termination signal handling

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use super::shutdown::{QuitReason, ShutdownHandle};

/// Listen for SIGINT/SIGTERM and translate the first one received into a
/// queued shutdown request.
pub fn spawn_signal_listener(shutdown: ShutdownHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interrupt = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to install SIGINT handler: {}", e);
                return;
            }
        };
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                return;
            }
        };

        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        info!("Received {}, requesting shutdown", name);
        shutdown.request(QuitReason::Signal(name));
    })
}
