//! Structured logger capability set.
//!
//! # Usage
//!
//! Values belong in fields, not in the message. Instead of formatting an ID
//! into the text, attach it:
//!
//! ```rust
//! use workshop_gadgets::{Logger, NoopLogger, TypedError};
//!
//! let logger = NoopLogger::new();
//! let err = TypedError::not_found("order", "id", "order-99");
//!
//! // don't: logger.error(&format!("could not find order {}: {}", "order-99", err));
//! logger.with_error(&err).with_field("id", "order-99").error("could not find order");
//! ```
//!
//! Key/value fields can be filtered on directly by log tooling, which a value
//! buried in free text cannot.
//!
//! # Immutability
//!
//! `with_field`, `with_fields` and `with_error` never touch the receiver. Each
//! returns a new logger carrying the receiver's fields plus the new ones (new
//! keys win collisions). A base logger can be shared across threads and
//! derived from concurrently without locking.
//!
//! # Levels
//!
//! - **Debug**: detail for non-production debugging. Keep volume low.
//! - **Info**: happy-path events whose volume tells you the service behaves.
//! - **Warn**: possibly an error, but the service can continue.
//! - **Error**: off the happy path. A failure propagating up through several
//!   layers will typically be logged at each layer that handles it.

use crate::combiner::{error_chain_message, MAX_UNWRAP_DEPTH};
use crate::fields::{FieldKey, Fields, ERR_KEY};
use crate::Level;
use serde::Serialize;
use std::error::Error;
use std::io;
use std::panic::Location;
use thiserror::Error;

/// Depth bound used by [`Logger::with_error`] when flattening a cause chain.
pub const MAX_ERROR_UNWRAP_DEPTH: usize = MAX_UNWRAP_DEPTH;

/// Failures of the logging layer itself.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Minimum level string was not one of `debug`, `info`, `warn`, `error`.
    #[error("unrecognized log level: {0:?}")]
    InvalidLevel(String),

    /// The output sink rejected a write or flush.
    #[error("failed to write log output: {0}")]
    Write(#[from] io::Error),

    /// A post-write hook reported a failure.
    #[error("log hook failed: {0}")]
    Hook(String),

    /// A configuration value other than the level could not be used.
    #[error("invalid logger configuration: {0}")]
    Config(String),
}

/// Leveled, field-carrying structured logger.
///
/// Implementors are cheap handles (`Clone`) whose derivation methods return
/// fresh values. Only [`log`](Self::log), [`with_fields`](Self::with_fields)
/// and [`flush`](Self::flush) are required.
pub trait Logger: Clone + Send + Sync + 'static {
    /// Emit one record at `level` attributed to `caller`.
    ///
    /// Records below the logger's minimum level are dropped.
    fn log(&self, level: Level, msg: &str, caller: &'static Location<'static>);

    /// New logger with `fields` merged over this logger's fields.
    fn with_fields(&self, fields: Fields) -> Self;

    /// Drain buffered output. Reports any write failure since the last flush.
    fn flush(&self) -> Result<(), LoggingError>;

    /// Whether a record at `level` would be emitted.
    fn enabled(&self, level: Level) -> bool {
        let _ = level;
        true
    }

    /// Log a failure. Records at this level include a stacktrace.
    #[track_caller]
    fn error(&self, msg: &str) {
        self.log(Level::Error, msg, Location::caller());
    }

    /// Log a recoverable anomaly.
    #[track_caller]
    fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg, Location::caller());
    }

    /// Log a notable event.
    #[track_caller]
    fn info(&self, msg: &str) {
        self.log(Level::Info, msg, Location::caller());
    }

    /// Log development detail.
    #[track_caller]
    fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg, Location::caller());
    }

    /// New logger with one extra field.
    fn with_field(&self, key: impl Into<FieldKey>, value: impl Serialize) -> Self {
        self.with_fields(Fields::new().with(key, value))
    }

    /// New logger whose [`ERR_KEY`] field holds `err`'s flattened chain.
    ///
    /// Causes are followed up to [`MAX_ERROR_UNWRAP_DEPTH`] links.
    fn with_error<E>(&self, err: &E) -> Self
    where
        E: Error + ?Sized,
    {
        self.with_error_depth(err, MAX_ERROR_UNWRAP_DEPTH)
    }

    /// Like [`with_error`](Self::with_error) with an explicit depth bound.
    fn with_error_depth<E>(&self, err: &E, max_depth: usize) -> Self
    where
        E: Error + ?Sized,
    {
        self.with_field(ERR_KEY, error_chain_message(err, max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_message_quotes_input() {
        let err = LoggingError::InvalidLevel("bogus".into());
        assert_eq!(err.to_string(), "unrecognized log level: \"bogus\"");
    }

    #[test]
    fn io_errors_convert_to_write() {
        let err: LoggingError = io::Error::other("pipe closed").into();
        assert!(matches!(err, LoggingError::Write(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
