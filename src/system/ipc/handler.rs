//! Control command dispatcher
//!
//! Applies one decoded command to the server's collaborators. Failures
//! never travel back to the client; the protocol has no reply channel.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::ControlCommand;
use crate::system::logging::LogControl;
use crate::system::shutdown::{QuitReason, ShutdownHandle};

/// Collaborators the dispatcher mutates on behalf of a client
pub struct ServerContext {
    pub log: Arc<dyn LogControl>,
    pub shutdown: ShutdownHandle,
}

/// Dispatch one decoded field sequence.
///
/// Messages outside the command vocabulary are ignored after a debug log.
pub fn dispatch(ctx: &ServerContext, fields: &[String]) {
    let Some(command) = ControlCommand::from_fields(fields) else {
        debug!("ignoring unrecognized control message: {:?}", fields);
        return;
    };

    match command {
        ControlCommand::SetFormat(pattern) => {
            ctx.log.set_message_format(&pattern);
            info!("set log message format: {}", pattern);
        }
        ControlCommand::SetFilterRules(raw) => {
            // The wire separates rules with ';', the logging collaborator
            // expects newlines
            let rules = raw.replace(';', "\n");
            match ctx.log.set_filter_rules(&rules) {
                Ok(()) => info!("set log filter rules: {}", raw),
                Err(e) => warn!("rejected log filter rules {:?}: {}", raw, e),
            }
        }
        ControlCommand::Quit => {
            info!("quit requested over control channel");
            ctx.shutdown.request(QuitReason::ControlQuit);
        }
    }
}
