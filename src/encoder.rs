//! # Console Record Encoder
//!
//! Turns `tracing` events into single text lines of the form
//!
//! ```text
//! <ts>\t<LEVEL>[\t<logger>]\t<caller>\t<message>[\t<fields>]
//! ```
//!
//! - `<ts>` is the event time in UTC, e.g. `2021-04-08T18:26:05Z`
//! - `<LEVEL>` is the uppercase level name, wrapped in ANSI colors when enabled
//! - `<logger>` is the dot-joined chain of enclosing span names, if any
//! - `<caller>` is the call site trimmed to `dir/file.rs:line`
//! - `<fields>` holds every structured field except `message` as one JSON object
//!
//! Elements whose key is empty in the [`EncoderConfig`] are left out.

use crate::config::EncoderConfig;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde_json::{Map, Number, Value};
use std::backtrace::Backtrace;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Timestamp renderer that always converts to UTC before formatting
#[derive(Clone, Debug)]
pub struct UtcTimestamp {
    format: String,
}

impl UtcTimestamp {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn render(&self, time: DateTime<Utc>) -> String {
        time.format(&self.format).to_string()
    }
}

impl Default for UtcTimestamp {
    fn default() -> Self {
        Self::new(crate::defaults::TIMESTAMP_FORMAT)
    }
}

impl FormatTime for UtcTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        // Writing the delayed format directly reports a bad pattern as
        // fmt::Error instead of panicking.
        write!(w, "{}", Utc::now().format(&self.format))
    }
}

/// Color used for each level label
pub fn level_color(level: &Level) -> Color {
    match *level {
        Level::TRACE => Color::Cyan,
        Level::DEBUG => Color::Magenta,
        Level::INFO => Color::Blue,
        Level::WARN => Color::Yellow,
        Level::ERROR => Color::Red,
    }
}

/// Uppercase level name, optionally colored
///
/// Colors follow the `colored` global switch; [`ConsoleEncoder::new`] forces
/// it on when color is requested.
pub fn level_label(level: &Level, ansi: bool) -> String {
    if ansi {
        level.as_str().color(level_color(level)).to_string()
    } else {
        level.as_str().to_string()
    }
}

/// Keep only the last directory and the file name of a source path
///
/// `/home/me/project/src/server/mod.rs` becomes `server/mod.rs`.
pub fn trim_caller_path(file: &str) -> &str {
    let bytes = file.as_bytes();
    let mut separators = bytes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, b)| **b == b'/' || **b == b'\\')
        .map(|(i, _)| i);

    match (separators.next(), separators.next()) {
        (Some(_), Some(second)) => &file[second + 1..],
        _ => file,
    }
}

/// The `file:line` annotation of an event's call site
pub fn caller(meta: &Metadata<'_>) -> String {
    match (meta.file(), meta.line()) {
        (Some(file), Some(line)) => format!("{}:{}", trim_caller_path(file), line),
        (Some(file), None) => trim_caller_path(file).to_string(),
        _ => "undefined".to_string(),
    }
}

/// Splits an event's fields into the message and the remaining context
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}

/// Writes separator-joined elements of one line
struct Line<'a, 'w> {
    writer: &'a mut Writer<'w>,
    separator: &'a str,
    started: bool,
}

impl<'a, 'w> Line<'a, 'w> {
    fn next(&mut self) -> fmt::Result {
        if self.started {
            self.writer.write_str(self.separator)?;
        }
        self.started = true;
        Ok(())
    }

    fn element(&mut self, value: impl fmt::Display) -> fmt::Result {
        self.next()?;
        write!(self.writer, "{}", value)
    }
}

/// Console-style event formatter for the file sink
///
/// Unlike the default `tracing-subscriber` format, the level label carries
/// its own color codes, so the decision to colorize is made once when the
/// encoder is built rather than per writer.
#[derive(Clone, Debug)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
    timestamp: UtcTimestamp,
    ansi: bool,
    with_caller: bool,
    stacktrace_level: Option<Level>,
}

impl ConsoleEncoder {
    /// Build an encoder; `ansi` colors level labels
    ///
    /// Requesting color overrides `colored`'s terminal and `NO_COLOR`
    /// detection, since the sink is usually a regular file.
    pub fn new(config: EncoderConfig, ansi: bool) -> Self {
        if ansi {
            colored::control::set_override(true);
        }
        let timestamp = UtcTimestamp::new(config.timestamp_format.clone());
        Self {
            config,
            timestamp,
            ansi,
            with_caller: true,
            stacktrace_level: None,
        }
    }

    /// Toggle the `file:line` annotation
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.with_caller = enabled;
        self
    }

    /// Attach a stack trace to records at `level` or more severe
    pub fn with_stacktrace(mut self, level: Option<Level>) -> Self {
        self.stacktrace_level = level;
        self
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleEncoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let config = &self.config;

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let mut line = Line {
            writer: &mut writer,
            separator: &config.separator,
            started: false,
        };

        if !config.time_key.is_empty() {
            line.next()?;
            self.timestamp.format_time(line.writer)?;
        }
        if !config.level_key.is_empty() {
            line.element(level_label(meta.level(), self.ansi))?;
        }
        if !config.name_key.is_empty() {
            if let Some(scope) = ctx.event_scope() {
                let names: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
                if !names.is_empty() {
                    line.element(names.join("."))?;
                }
            }
        }
        if self.with_caller && !config.caller_key.is_empty() {
            line.element(caller(meta))?;
        }
        if !config.message_key.is_empty() {
            line.element(collector.message.as_deref().unwrap_or(""))?;
        }
        if !collector.fields.is_empty() {
            line.element(Value::Object(collector.fields))?;
        }
        if let Some(threshold) = self.stacktrace_level {
            if !config.stacktrace_key.is_empty() && *meta.level() <= threshold {
                write!(writer, "\n{}", Backtrace::force_capture())?;
            }
        }

        writer.write_str(&config.line_ending)
    }
}
