use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

use dynalog::config::AppConfig;
use dynalog::system::arbitrator::{arbitrate, Arbitration};
use dynalog::system::ipc::{ControlServer, Endpoint, ServerContext};
use dynalog::system::logging::init_logging;
use dynalog::system::shutdown::shutdown_channel;
use dynalog::system::signal::spawn_signal_listener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = AppConfig::load();
    let (log_controller, _guard) =
        init_logging(&config.logging).context("Failed to initialize logging")?;

    // Argument 0 is the program path; everything after it is forwarded
    // verbatim when another instance is already running
    let args: Vec<String> = env::args().skip(1).collect();
    let endpoint = Endpoint::new(&config.endpoint.socket_path);

    match arbitrate(&endpoint, &args, config.endpoint.io_timeout()).await? {
        Arbitration::Server(listener) => {
            let (shutdown_handle, shutdown) = shutdown_channel();
            spawn_signal_listener(shutdown_handle.clone());

            let ctx = ServerContext {
                log: Arc::new(log_controller),
                shutdown: shutdown_handle,
            };
            let server = ControlServer::new(listener, ctx, config.endpoint.io_timeout());
            let reason = server.run(shutdown, config.tick.interval()).await;
            endpoint.release();
            info!("exiting ({:?})", reason);
        }
        Arbitration::Forwarded(outcome) => {
            info!("forwarded arguments to running instance: {:?}", outcome);
        }
        Arbitration::AlreadyRunning => {
            info!("dynalog is already running");
        }
        Arbitration::CleanedStale => {
            warn!("removed stale control endpoint; run again to start the server");
        }
    }

    Ok(())
}
