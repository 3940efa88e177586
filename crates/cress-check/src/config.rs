//! Checker configuration parsed from environment variables.
//!
//! Settings can be overridden via environment variables prefixed with
//! `CRESS_`; command line flags take precedence over both.

use std::env;
use std::str::FromStr;

use cress_gherkin::ParseOptions;

use crate::error::CheckError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "CRESS_LOG_LEVEL";
/// Environment variable holding the default document language.
pub const LANGUAGE_VAR: &str = "CRESS_LANGUAGE";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so that only parser warnings and failures reach
/// stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes all trace spans.
    Trace,
    /// Debug-level information for development.
    Debug,
    /// Standard informational messages.
    Info,
    /// Warning messages, including recoverable parser oddities.
    #[default]
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CheckError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for a check run.
///
/// # Environment Variables
///
/// - `CRESS_LOG_LEVEL`: Sets the log level (trace, debug, info, warn, error)
/// - `CRESS_LANGUAGE`: Language code used for documents without a
///   `# language:` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Default document language; English when unset.
    pub language: Option<String>,
}

impl CheckConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::InvalidConfig` if an environment variable
    /// contains an invalid value.
    pub fn from_env() -> Result<Self, CheckError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::InvalidConfig` if a value is invalid.
    ///
    /// # Examples
    /// ```
    /// use cress_check::config::{CheckConfig, LogLevel};
    ///
    /// let config = CheckConfig::from_lookup(|name| match name {
    ///     "CRESS_LOG_LEVEL" => Some("debug".to_owned()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.log_level, LogLevel::Debug);
    /// assert_eq!(config.language, None);
    /// # Ok::<(), cress_check::error::CheckError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name| lookup(name).filter(|value: &String| !value.trim().is_empty());
        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => value.trim().parse()?,
            None => LogLevel::default(),
        };
        let language = read(LANGUAGE_VAR).map(|value| value.trim().to_owned());
        Ok(Self {
            log_level,
            language,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, language: Option<String>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(language) = language {
            self.language = Some(language);
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Parser options derived from this configuration.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        match &self.language {
            Some(language) => ParseOptions::new().with_language(language.clone()),
            None => ParseOptions::new(),
        }
    }
}
