//! Logger that discards everything.

use crate::fields::{FieldKey, Fields};
use crate::logging::{Logger, LoggingError};
use crate::Level;
use serde::Serialize;
use std::panic::Location;

/// Logger whose every operation is a no-op.
///
/// Derivations return an equal logger and `flush` always succeeds. Handy as
/// a default in tests and libraries that log optionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopLogger;

impl NoopLogger {
    /// The no-op logger.
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Logger for NoopLogger {
    #[inline]
    fn log(&self, _level: Level, _msg: &str, _caller: &'static Location<'static>) {}

    #[inline]
    fn with_fields(&self, _fields: Fields) -> Self {
        *self
    }

    #[inline]
    fn flush(&self) -> Result<(), LoggingError> {
        Ok(())
    }

    #[inline]
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    // Skip serializing a value nobody will read.
    #[inline]
    fn with_field(&self, _key: impl Into<FieldKey>, _value: impl Serialize) -> Self {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypedError;

    #[test]
    fn everything_is_inert() {
        let logger = NoopLogger::new();
        let derived = logger
            .with_field("k", "v")
            .with_error(&TypedError::base("ignored"))
            .with_fields(Fields::new().with("a", 1));

        derived.error("nothing");
        derived.debug("nothing");
        assert_eq!(derived, logger);
        assert!(derived.flush().is_ok());
        assert!(!derived.enabled(Level::Error));
    }
}
