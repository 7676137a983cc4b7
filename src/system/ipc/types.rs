//! Control protocol type definitions
//!
//! Defines the command vocabulary exchanged over the control socket and
//! the errors surfaced by the client/server paths.

use std::fmt;
use std::io;

use super::protocol::ProtocolError;

/// Command token: replace the log message format
pub const CMD_SET_FORMAT: &str = "-f";
/// Command token: replace the log filter rules
pub const CMD_SET_FILTER_RULES: &str = "-r";
/// Command token: ask the running instance to quit
pub const CMD_QUIT: &str = "-q";

/// One decoded control instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Replace the message pattern with the given argument, verbatim
    SetFormat(String),
    /// Replace the filter rules; on the wire the rules use `;` between
    /// entries, the dispatcher translates that to newlines
    SetFilterRules(String),
    /// Request asynchronous process termination
    Quit,
}

impl ControlCommand {
    /// Parse a decoded field sequence into a command
    ///
    /// Returns `None` for anything outside the fixed vocabulary: unknown
    /// first field, missing argument, or an empty message. Extra trailing
    /// fields are ignored.
    pub fn from_fields(fields: &[String]) -> Option<ControlCommand> {
        let command = fields.first()?;
        match command.as_str() {
            CMD_QUIT => Some(ControlCommand::Quit),
            CMD_SET_FORMAT => fields.get(1).cloned().map(ControlCommand::SetFormat),
            CMD_SET_FILTER_RULES => fields.get(1).cloned().map(ControlCommand::SetFilterRules),
            _ => None,
        }
    }

    /// The field sequence this command serializes to
    pub fn to_fields(&self) -> Vec<String> {
        match self {
            ControlCommand::SetFormat(pattern) => {
                vec![CMD_SET_FORMAT.to_string(), pattern.clone()]
            }
            ControlCommand::SetFilterRules(rules) => {
                vec![CMD_SET_FILTER_RULES.to_string(), rules.clone()]
            }
            ControlCommand::Quit => vec![CMD_QUIT.to_string()],
        }
    }
}

/// Control connection errors
#[derive(Debug)]
pub enum IpcError {
    /// Server is not running (socket doesn't exist or cannot connect)
    ServerNotRunning,
    /// Connection timeout
    Timeout,
    /// Protocol error (invalid message)
    ProtocolError(String),
    /// IO error during communication
    IoError(io::Error),
}

impl fmt::Display for IpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpcError::ServerNotRunning => write!(f, "Server is not running"),
            IpcError::Timeout => write!(f, "Connection timeout"),
            IpcError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
            IpcError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for IpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IpcError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IpcError {
    fn from(err: io::Error) -> Self {
        // Map specific error kinds to more specific IPC errors
        match err.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => {
                IpcError::ServerNotRunning
            }
            _ => IpcError::IoError(err),
        }
    }
}

impl From<ProtocolError> for IpcError {
    fn from(err: ProtocolError) -> Self {
        IpcError::ProtocolError(err.to_string())
    }
}
