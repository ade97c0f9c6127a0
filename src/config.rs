//! Logger configuration.
//!
//! A [`LoggerConfig`] can be deserialized from any serde format or read
//! from the process environment:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `LOG_LEVEL` | `level` | `info` |
//! | `LOG_NAME` | `name` | unset |
//! | `LOG_OUTPUT` | `output` (`stdout` or `stderr`) | `stdout` |
//! | `LOG_MAX_VALUE_LEN` | `max_value_len` | unset |
//!
//! The level string is only parsed by [`LoggerConfig::build`], so a bogus
//! level surfaces as [`LoggingError::InvalidLevel`] at logger construction.

use crate::json_logger::{JsonLogger, LoggerOptions};
use crate::logging::LoggingError;
use crate::sink::WriterSink;
use serde::Deserialize;
use std::str::FromStr;

/// Variable holding the minimum level.
pub const LEVEL_ENV: &str = "LOG_LEVEL";
/// Variable holding the logger name.
pub const NAME_ENV: &str = "LOG_NAME";
/// Variable selecting the output stream.
pub const OUTPUT_ENV: &str = "LOG_OUTPUT";
/// Variable holding the string value byte cap.
pub const MAX_VALUE_LEN_ENV: &str = "LOG_MAX_VALUE_LEN";

/// Minimum level used when none is configured.
pub const DEFAULT_LEVEL: &str = "info";

/// Process stream records are written to.
///
/// Names are matched ignoring ASCII case, both from the environment and when
/// deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Output {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

impl FromStr for Output {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => Err(LoggingError::Config(format!(
                "unknown output {s:?}, expected stdout or stderr"
            ))),
        }
    }
}

impl TryFrom<String> for Output {
    type Error = LoggingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Settings for a [`JsonLogger`].
///
/// ```rust
/// use workshop_gadgets::{LoggerConfig, Output};
///
/// let config: LoggerConfig = serde_json::from_str(r#"{"level":"debug","output":"stderr"}"#)?;
/// assert_eq!(config.level, "debug");
/// assert_eq!(config.output, Output::Stderr);
/// assert_eq!(config.name, None);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum level string: `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Value of the `name` record key.
    pub name: Option<String>,
    /// Stream records are written to.
    pub output: Output,
    /// Byte cap for string field values.
    pub max_value_len: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            name: None,
            output: Output::default(),
            max_value_len: None,
        }
    }
}

impl LoggerConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// [`LoggingError::Config`] for an unknown `LOG_OUTPUT` or a
    /// non-numeric `LOG_MAX_VALUE_LEN`.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_ENV) {
            config.level = level;
        }
        config.name = lookup(NAME_ENV).filter(|name| !name.is_empty());
        if let Some(output) = lookup(OUTPUT_ENV) {
            config.output = output.parse()?;
        }
        if let Some(raw) = lookup(MAX_VALUE_LEN_ENV) {
            let max = raw.trim().parse::<usize>().map_err(|err| {
                LoggingError::Config(format!("{MAX_VALUE_LEN_ENV}={raw:?}: {err}"))
            })?;
            config.max_value_len = Some(max);
        }

        Ok(config)
    }

    /// Options matching this configuration, ready for hooks to be added.
    pub fn options(&self) -> LoggerOptions {
        let mut options = match self.output {
            Output::Stdout => LoggerOptions::default().sink(WriterSink::stdout()),
            Output::Stderr => LoggerOptions::default().sink(WriterSink::stderr()),
        };
        if let Some(name) = &self.name {
            options = options.name(name.clone());
        }
        if let Some(max) = self.max_value_len {
            options = options.max_value_len(max);
        }
        options
    }

    /// Construct the configured logger.
    ///
    /// # Errors
    ///
    /// [`LoggingError::InvalidLevel`] when `level` does not parse.
    pub fn build(&self) -> Result<JsonLogger, LoggingError> {
        JsonLogger::new(&self.level, self.options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = LoggerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level, "info");
        assert_eq!(config.output, Output::Stdout);
    }

    #[test]
    fn reads_every_variable() {
        let config = LoggerConfig::from_lookup(lookup_from(&[
            (LEVEL_ENV, "warn"),
            (NAME_ENV, "orders"),
            (OUTPUT_ENV, "STDERR"),
            (MAX_VALUE_LEN_ENV, "512"),
        ]))
        .unwrap();

        assert_eq!(config.level, "warn");
        assert_eq!(config.name.as_deref(), Some("orders"));
        assert_eq!(config.output, Output::Stderr);
        assert_eq!(config.max_value_len, Some(512));

        let logger = config.build().unwrap();
        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.name(), Some("orders"));
    }

    #[test]
    fn bad_output_and_length_are_config_errors() {
        let err = LoggerConfig::from_lookup(lookup_from(&[(OUTPUT_ENV, "file")])).unwrap_err();
        assert!(matches!(err, LoggingError::Config(_)));

        let err = LoggerConfig::from_lookup(lookup_from(&[(MAX_VALUE_LEN_ENV, "lots")])).unwrap_err();
        assert!(err.to_string().contains(MAX_VALUE_LEN_ENV));
    }

    #[test]
    fn bogus_level_fails_at_build() {
        let config = LoggerConfig::from_lookup(lookup_from(&[(LEVEL_ENV, "bogus")])).unwrap();
        assert!(matches!(config.build(), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"name":"api"}"#).unwrap();
        assert_eq!(config.level, DEFAULT_LEVEL);
        assert_eq!(config.name.as_deref(), Some("api"));

        assert!(serde_json::from_str::<LoggerConfig>(r#"{"colour":true}"#).is_err());
    }

    #[test]
    fn output_case_agrees_across_sources() {
        let from_env = LoggerConfig::from_lookup(lookup_from(&[(OUTPUT_ENV, "STDERR")])).unwrap();
        let from_json: LoggerConfig = serde_json::from_str(r#"{"output":"STDERR"}"#).unwrap();
        assert_eq!(from_env.output, Output::Stderr);
        assert_eq!(from_json.output, Output::Stderr);

        let err = serde_json::from_str::<LoggerConfig>(r#"{"output":"syslog"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown output"));
    }
}
