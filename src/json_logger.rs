//! JSON-lines logger backend.
//!
//! Every emitted record is one JSON object on its own line:
//!
//! ```text
//! {"timestamp":"2026-03-01T09:30:00.125Z","level":"ERROR","name":"orders","caller":"src/main.rs:42",
//!  "message":"could not find order","stacktrace":"...","error":"order was not found with id: order-99"}
//! ```
//!
//! # Record Shape
//!
//! Fixed keys come first in this order: `timestamp` (UTC, millisecond
//! precision), `level`, `name` (only when set), `caller`, `message`, and
//! `stacktrace` (Error records only). Attached fields follow in insertion
//! order. A field whose key collides with a fixed key is written as
//! `field.<key>` so it can never overwrite the record shape.
//!
//! # Failure Reporting
//!
//! Emitting never panics and never returns an error. The first sink or hook
//! failure after the last flush is kept and handed back by
//! [`Logger::flush`]. Nothing is retried.

use crate::errors::BoxError;
use crate::fields::Fields;
use crate::logging::{Logger, LoggingError};
use crate::sink::{Sink, WriterSink};
use crate::Level;
use backtrace::Backtrace;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard};

/// Keys owned by the record itself.
pub const RECORD_KEYS: [&str; 6] = ["timestamp", "level", "name", "caller", "message", "stacktrace"];

/// Prefix applied to attached fields that collide with [`RECORD_KEYS`].
pub const COLLISION_PREFIX: &str = "field.";

/// Suffix appended to string values cut by `max_value_len`.
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Callback run after each record is written.
pub type Hook = Arc<dyn Fn(&LogEntry<'_>) -> Result<(), BoxError> + Send + Sync>;

/// What a hook gets to see of an emitted record.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    /// Same instant as the record's `timestamp`.
    pub timestamp: DateTime<Utc>,
    /// Record level.
    pub level: Level,
    /// Logger name, if any.
    pub name: Option<&'a str>,
    /// Call site of the logging method.
    pub caller: &'static Location<'static>,
    /// Record message.
    pub message: &'a str,
}

/// Construction-time options for [`JsonLogger`].
///
/// ```rust
/// use workshop_gadgets::{JsonLogger, LoggerOptions, RingBufferSink};
///
/// let options = LoggerOptions::default()
///     .name("orders")
///     .max_value_len(256)
///     .sink(RingBufferSink::new(64));
/// let logger = JsonLogger::new("debug", options)?;
/// # Ok::<(), workshop_gadgets::LoggingError>(())
/// ```
#[derive(Clone, Default)]
pub struct LoggerOptions {
    name: Option<String>,
    hooks: Vec<Hook>,
    max_value_len: Option<usize>,
    sink: Option<Arc<dyn Sink>>,
}

impl LoggerOptions {
    /// Value of the `name` record key.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run `hook` after every written record. Hooks run in registration order.
    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEntry<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Cut string field values longer than `max` bytes, indicator included.
    pub fn max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = Some(max);
        self
    }

    /// Write records to `sink` instead of standard output.
    pub fn sink<S: Sink>(self, sink: S) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    /// Write records to an already shared sink.
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("name", &self.name)
            .field("hooks", &self.hooks.len())
            .field("max_value_len", &self.max_value_len)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

/// State shared by a logger and everything derived from it.
struct Core {
    level: Level,
    sink: Arc<dyn Sink>,
    hooks: Vec<Hook>,
    max_value_len: Option<usize>,
    pending: Mutex<Option<LoggingError>>,
}

impl Core {
    #[inline]
    fn pending(&self) -> MutexGuard<'_, Option<LoggingError>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Keep the first failure since the last flush.
    fn stash(&self, err: LoggingError) {
        let mut slot = self.pending();
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}

/// Structured logger writing one JSON object per record.
///
/// Cloning and deriving are cheap: the sink, level and hooks are shared
/// through an `Arc`, and each derived logger owns its own field set.
#[derive(Clone)]
pub struct JsonLogger {
    core: Arc<Core>,
    fields: Arc<Fields>,
    name: Option<Arc<str>>,
}

impl JsonLogger {
    /// Build a logger from a minimum-level string.
    ///
    /// # Errors
    ///
    /// [`LoggingError::InvalidLevel`] when `level` is not one of
    /// `debug`, `info`, `warn`, `error`.
    pub fn new(level: &str, options: LoggerOptions) -> Result<Self, LoggingError> {
        Ok(Self::with_level(level.parse()?, options))
    }

    /// Build a logger from an already parsed level.
    pub fn with_level(level: Level, options: LoggerOptions) -> Self {
        let LoggerOptions {
            name,
            hooks,
            max_value_len,
            sink,
        } = options;

        let sink = sink.unwrap_or_else(|| Arc::new(WriterSink::stdout()));

        Self {
            core: Arc::new(Core {
                level,
                sink,
                hooks,
                max_value_len,
                pending: Mutex::new(None),
            }),
            fields: Arc::new(Fields::new()),
            name: name.map(Arc::from),
        }
    }

    /// Derived logger whose name gains a `.`-separated segment.
    ///
    /// ```rust
    /// # use workshop_gadgets::{JsonLogger, LoggerOptions, RingBufferSink};
    /// let base = JsonLogger::new("info", LoggerOptions::default().name("api").sink(RingBufferSink::new(1)))?;
    /// assert_eq!(base.named("orders").name(), Some("api.orders"));
    /// # Ok::<(), workshop_gadgets::LoggingError>(())
    /// ```
    pub fn named(&self, name: &str) -> Self {
        let name: Arc<str> = match &self.name {
            Some(parent) => Arc::from(format!("{parent}.{name}")),
            None => Arc::from(name),
        };
        Self {
            core: Arc::clone(&self.core),
            fields: Arc::clone(&self.fields),
            name: Some(name),
        }
    }

    /// Value of the `name` record key.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Minimum emitted level.
    #[inline]
    pub fn level(&self) -> Level {
        self.core.level
    }

    /// Fields attached to this logger.
    #[inline]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    fn emit(&self, level: Level, msg: &str, caller: &'static Location<'static>) {
        let timestamp = Utc::now();
        let stacktrace = (level == Level::Error).then(|| format!("{:?}", Backtrace::new()));

        let record = Record {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            name: self.name(),
            caller,
            message: msg,
            stacktrace: stacktrace.as_deref(),
            fields: &self.fields,
            max_value_len: self.core.max_value_len,
        };

        let written = serde_json::to_string(&record)
            .map_err(io::Error::from)
            .and_then(|line| self.core.sink.write_record(&line));
        if let Err(err) = written {
            self.core.stash(LoggingError::Write(err));
            return;
        }

        if self.core.hooks.is_empty() {
            return;
        }
        let entry = LogEntry {
            timestamp,
            level,
            name: self.name(),
            caller,
            message: msg,
        };
        for hook in &self.core.hooks {
            if let Err(err) = hook(&entry) {
                self.core.stash(LoggingError::Hook(err.to_string()));
            }
        }
    }
}

impl Logger for JsonLogger {
    fn log(&self, level: Level, msg: &str, caller: &'static Location<'static>) {
        if self.enabled(level) {
            self.emit(level, msg, caller);
        }
    }

    fn with_fields(&self, fields: Fields) -> Self {
        if fields.is_empty() {
            return self.clone();
        }
        Self {
            core: Arc::clone(&self.core),
            fields: Arc::new(self.fields.merged(&fields)),
            name: self.name.clone(),
        }
    }

    fn flush(&self) -> Result<(), LoggingError> {
        let pending = self.core.pending().take();
        let flushed = self.core.sink.flush();
        match (pending, flushed) {
            (Some(err), Ok(())) => Err(err),
            (Some(err), Err(flush_err)) => {
                self.core.stash(LoggingError::Write(flush_err));
                Err(err)
            }
            (None, Err(err)) => Err(LoggingError::Write(err)),
            (None, Ok(())) => Ok(()),
        }
    }

    #[inline]
    fn enabled(&self, level: Level) -> bool {
        level.enabled_at(self.core.level)
    }
}

impl fmt::Debug for JsonLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLogger")
            .field("level", &self.core.level)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// One record, serialized in fixed key order.
struct Record<'a> {
    timestamp: String,
    level: Level,
    name: Option<&'a str>,
    caller: &'static Location<'static>,
    message: &'a str,
    stacktrace: Option<&'a str>,
    fields: &'a Fields,
    max_value_len: Option<usize>,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("level", self.level.as_str())?;
        if let Some(name) = self.name {
            map.serialize_entry("name", name)?;
        }
        map.serialize_entry(
            "caller",
            &format_args!("{}:{}", self.caller.file(), self.caller.line()),
        )?;
        map.serialize_entry("message", self.message)?;
        if let Some(stacktrace) = self.stacktrace {
            map.serialize_entry("stacktrace", stacktrace)?;
        }

        for (key, value) in self.fields.iter() {
            let key = field_key(key, self.fields);
            match (value, self.max_value_len) {
                (Value::String(s), Some(max)) => {
                    map.serialize_entry(&*key, &*truncate_with_indicator(s, max))?
                }
                _ => map.serialize_entry(&*key, value)?,
            }
        }
        map.end()
    }
}

/// Record key for an attached field.
///
/// A key taken by the record itself gets [`COLLISION_PREFIX`] prepended until
/// it clashes with neither a record key nor another attached field.
fn field_key<'a>(key: &'a str, attached: &Fields) -> Cow<'a, str> {
    if !RECORD_KEYS.contains(&key) {
        return Cow::Borrowed(key);
    }

    let mut prefixed = format!("{COLLISION_PREFIX}{key}");
    while RECORD_KEYS.contains(&prefixed.as_str()) || attached.contains_key(&prefixed) {
        prefixed.insert_str(0, COLLISION_PREFIX);
    }
    Cow::Owned(prefixed)
}

/// Cut `s` to at most `max` bytes at a char boundary, ending in
/// [`TRUNCATION_INDICATOR`].
fn truncate_with_indicator(s: &str, max: usize) -> Cow<'_, str> {
    if s.len() <= max {
        return Cow::Borrowed(s);
    }

    let max_content_len = max.saturating_sub(TRUNCATION_INDICATOR.len());
    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut out = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    out.push_str(&s[..idx]);
    out.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(out)
}
