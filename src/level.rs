//! Log severity levels.

use crate::LoggingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record, ordered from least to most severe.
///
/// - `Debug`: code-path detail only wanted on non-production workloads.
/// - `Info`: happy-path events worth counting in production.
/// - `Warn`: possibly an error, but the service can carry on.
/// - `Error`: anything off the happy path. Records carry a stacktrace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Development diagnostics.
    Debug,
    /// Notable happy-path events.
    Info,
    /// Recoverable anomalies.
    Warn,
    /// Failures.
    Error,
}

impl Level {
    /// Upper-case name as written to the `level` record key.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// True when a record at `self` passes a `minimum` threshold.
    #[inline]
    pub fn enabled_at(self, minimum: Level) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggingError;

    /// Parse `"debug" | "info" | "warn" | "error"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LoggingError::InvalidLevel(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!("debug".parse::<Level>().ok(), Some(Level::Debug));
        assert_eq!("INFO".parse::<Level>().ok(), Some(Level::Info));
        assert_eq!("Warn".parse::<Level>().ok(), Some(Level::Warn));
        assert_eq!("error".parse::<Level>().ok(), Some(Level::Error));
    }

    #[test]
    fn rejects_bogus_level() {
        match "bogus".parse::<Level>() {
            Err(LoggingError::InvalidLevel(raw)) => assert_eq!(raw, "bogus"),
            other => panic!("expected InvalidLevel, got {other:?}"),
        }
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn threshold_ordering() {
        assert!(Level::Info.enabled_at(Level::Info));
        assert!(Level::Error.enabled_at(Level::Info));
        assert!(!Level::Debug.enabled_at(Level::Info));
    }
}
