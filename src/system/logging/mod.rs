//! Logging system initialization and runtime control
//!
//! This sets up the tracing subscriber once at startup and hands back a
//! [`LogController`] through which the message pattern and the filter
//! rules can be changed while the process is running. The control
//! channel dispatcher only depends on the [`LogControl`] trait.

pub mod format;

use arc_swap::ArcSwap;
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter};

use crate::config::LoggingConfig;
use crate::errors::{DynalogError, Result};
use format::PatternFormatter;

/// Mutating operations the control channel performs on the logging system
pub trait LogControl: Send + Sync {
    /// Replace the message pattern, applied to all subsequent events
    fn set_message_format(&self, pattern: &str);

    /// Replace the filter rules. Rules are newline-separated `EnvFilter`
    /// directives, e.g. `dynalog=debug\ndynalog::system::ipc=trace`.
    fn set_filter_rules(&self, rules: &str) -> Result<()>;
}

/// Handle to the installed subscriber's mutable configuration
pub struct LogController {
    pattern: Arc<ArcSwap<String>>,
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LogControl for LogController {
    fn set_message_format(&self, pattern: &str) {
        self.pattern.store(Arc::new(pattern.to_string()));
    }

    fn set_filter_rules(&self, rules: &str) -> Result<()> {
        let directives = rules
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        let filter = EnvFilter::try_new(&directives).map_err(|e| {
            DynalogError::log_config(format!("invalid filter rules {:?}: {}", directives, e))
        })?;
        self.filter
            .reload(filter)
            .map_err(|e| DynalogError::log_config(format!("failed to apply filter rules: {}", e)))?;
        info!("applied filter rules: {}", directives);
        Ok(())
    }
}

/// Initialize the logging system based on configuration
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `LogController` - runtime handle for format/filter changes
/// * `WorkerGuard` - must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> Result<(LogController, WorkerGuard)> {
    let pattern = Arc::new(ArcSwap::from_pointee(config.pattern.clone()));

    let env_filter = EnvFilter::try_new(&config.level).map_err(|e| {
        DynalogError::log_config(format!("invalid log level {:?}: {}", config.level, e))
    })?;
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);

    let (writer, guard) = tracing_appender::non_blocking(build_writer(config));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(PatternFormatter::new(pattern.clone()))
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| DynalogError::log_config(format!("failed to install subscriber: {}", e)))?;

    Ok((
        LogController {
            pattern,
            filter: filter_handle,
        },
        guard,
    ))
}

/// Build the log sink: stderr, teed with the configured file when one is set.
///
/// A file that cannot be opened is reported on stderr and skipped; the
/// process keeps logging to stderr alone.
fn build_writer(config: &LoggingConfig) -> Box<dyn Write + Send> {
    if let Some(ref path) = config.file {
        if !path.is_empty() {
            match std::fs::OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => return Box::new(TeeWriter { file }),
                Err(e) => {
                    eprintln!("Cannot open log file {}: {}", path, e);
                }
            }
        }
    }
    Box::new(std::io::stderr())
}

/// Writes every chunk to stderr and to the log file
struct TeeWriter {
    file: std::fs::File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()?;
        self.file.flush()
    }
}
