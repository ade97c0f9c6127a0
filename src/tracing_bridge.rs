//! [`Logger`] backed by `tracing` events.
//!
//! For services that already install a `tracing-subscriber` stack: every
//! record becomes one event at the matching `tracing` level, so the
//! subscriber decides formatting, filtering and output. Attached fields are
//! rendered as a single JSON string in the `fields` event field.

use crate::fields::Fields;
use crate::logging::{Logger, LoggingError};
use crate::Level;
use std::panic::Location;
use std::sync::Arc;

/// Event target used for every forwarded record.
pub const TRACING_TARGET: &str = "workshop_gadgets";

/// Logger that forwards records to the current `tracing` dispatcher.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    fields: Arc<Fields>,
    name: Option<Arc<str>>,
}

impl TracingLogger {
    /// Unnamed logger without fields.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived logger whose name gains a `.`-separated segment.
    pub fn named(&self, name: &str) -> Self {
        let name: Arc<str> = match &self.name {
            Some(parent) => Arc::from(format!("{parent}.{name}")),
            None => Arc::from(name),
        };
        Self {
            fields: Arc::clone(&self.fields),
            name: Some(name),
        }
    }

    /// Fields attached to this logger.
    #[inline]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, msg: &str, caller: &'static Location<'static>) {
        let name = self.name.as_deref().unwrap_or("");
        let caller = format!("{}:{}", caller.file(), caller.line());
        let fields = if self.fields.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&*self.fields).unwrap_or_default()
        };

        macro_rules! forward {
            ($lvl:expr) => {
                tracing::event!(
                    target: TRACING_TARGET,
                    $lvl,
                    name,
                    caller = %caller,
                    fields = %fields,
                    "{}",
                    msg
                )
            };
        }

        match level {
            Level::Error => forward!(tracing::Level::ERROR),
            Level::Warn => forward!(tracing::Level::WARN),
            Level::Info => forward!(tracing::Level::INFO),
            Level::Debug => forward!(tracing::Level::DEBUG),
        }
    }

    fn with_fields(&self, fields: Fields) -> Self {
        Self {
            fields: Arc::new(self.fields.merged(&fields)),
            name: self.name.clone(),
        }
    }

    /// Output belongs to the subscriber; nothing is buffered here.
    fn flush(&self) -> Result<(), LoggingError> {
        Ok(())
    }

    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Error => tracing::enabled!(target: TRACING_TARGET, tracing::Level::ERROR),
            Level::Warn => tracing::enabled!(target: TRACING_TARGET, tracing::Level::WARN),
            Level::Info => tracing::enabled!(target: TRACING_TARGET, tracing::Level::INFO),
            Level::Debug => tracing::enabled!(target: TRACING_TARGET, tracing::Level::DEBUG),
        }
    }
}
