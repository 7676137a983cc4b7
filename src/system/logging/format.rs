//! Pattern-based event formatting
//!
//! The message pattern is a plain string with `%{token}` placeholders:
//! `%{time}`, `%{level}`, `%{target}`, `%{message}`, `%{pid}`. Unknown
//! tokens are emitted verbatim. The active pattern is held in an
//! `ArcSwap` so it can be replaced at runtime without re-installing the
//! subscriber.

use arc_swap::ArcSwap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Default message pattern
pub const DEFAULT_PATTERN: &str = "%{time} %{level} %{target}: %{message}";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Event formatter that renders the currently active pattern
pub struct PatternFormatter {
    pattern: Arc<ArcSwap<String>>,
}

impl PatternFormatter {
    pub fn new(pattern: Arc<ArcSwap<String>>) -> Self {
        Self { pattern }
    }
}

impl<S, N> FormatEvent<S, N> for PatternFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        event.record(&mut MessageVisitor { out: &mut message });

        let metadata = event.metadata();
        let time = chrono::Local::now().format(TIME_FORMAT).to_string();
        let pattern = self.pattern.load();
        let line = render(
            &pattern,
            &RenderInput {
                time: &time,
                level: metadata.level().as_str(),
                target: metadata.target(),
                message: &message,
                pid: std::process::id(),
            },
        );
        writeln!(writer, "{}", line)
    }
}

/// Values substituted for the pattern tokens of one event
pub struct RenderInput<'a> {
    pub time: &'a str,
    pub level: &'a str,
    pub target: &'a str,
    pub message: &'a str,
    pub pid: u32,
}

/// Substitute `%{token}` placeholders in `pattern`
pub fn render(pattern: &str, input: &RenderInput<'_>) -> String {
    let mut out = String::with_capacity(pattern.len() + input.message.len() + 32);
    let mut rest = pattern;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                match &after[..end] {
                    "time" => out.push_str(input.time),
                    "level" => out.push_str(input.level),
                    "target" => out.push_str(input.target),
                    "message" => out.push_str(input.message),
                    "pid" => {
                        let _ = write!(out, "{}", input.pid);
                    }
                    unknown => {
                        out.push_str("%{");
                        out.push_str(unknown);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder, keep it as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collects the `message` field; any other fields are appended as `key=value`
struct MessageVisitor<'a> {
    out: &'a mut String,
}

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.out, "{:?}", value);
        } else {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            let _ = write!(self.out, "{}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.out.push_str(value);
        } else {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            let _ = write!(self.out, "{}={}", field.name(), value);
        }
    }
}
