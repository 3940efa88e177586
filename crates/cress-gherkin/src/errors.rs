//! Error and warning types produced while reading feature documents.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::location::Location;

/// A malformed document structure.
///
/// Carries the location of the offending construct and the raw text of the
/// line so diagnostics can point precisely at the input.
///
/// # Examples
/// ```
/// use cress_gherkin::{Location, SyntaxError};
///
/// let err = SyntaxError::new(Location::new(None, 2, 1), "Feature must have a name", "Feature:");
/// assert_eq!(err.to_string(), "<string>:2:1: Feature must have a name\n    Feature:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Where the problem was detected.
    pub location: Location,
    /// Human-readable reason.
    pub message: String,
    /// The offending source line, without its line terminator.
    pub line: String,
}

impl SyntaxError {
    /// Construct a syntax error.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            line: line.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)?;
        if !self.line.trim().is_empty() {
            write!(f, "\n    {}", self.line.trim_end())?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// A recoverable oddity noticed while parsing.
///
/// Parsing continues; the warning is kept on the resulting feature and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Where the oddity was found.
    pub location: Location,
    /// Human-readable description.
    pub message: String,
    /// The value that was kept after recovery.
    pub line: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {:?}", self.location, self.message, self.line)
    }
}

/// Failure to load keyword definitions for a language.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LanguageError {
    /// No bundled definition exists for the requested code.
    #[error("unknown language '{code}'")]
    Unknown {
        /// The code that was requested.
        code: String,
    },
    /// A bundled definition exists but could not be decoded.
    #[error("language definition '{code}' is malformed: {source}")]
    Malformed {
        /// The code whose definition failed to decode.
        code: String,
        /// The decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// An alias points at a definition that is itself missing or an alias.
    #[error("language '{code}' aliases '{target}', which has no keyword definitions")]
    BrokenAlias {
        /// The alias code.
        code: String,
        /// The aliased code.
        target: String,
    },
}

/// Any failure surfaced by the parsing entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The document is structurally invalid.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The requested or declared language is not available.
    #[error(transparent)]
    Language(#[from] LanguageError),
    /// The document could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Borrow the syntax error, if this is one.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Language(_) | Self::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_omits_blank_offending_line() {
        let err = SyntaxError::new(Location::new(None, 1, 1), "unexpected end of input", "");
        assert_eq!(err.to_string(), "<string>:1:1: unexpected end of input");
    }

    #[test]
    fn unknown_language_names_code() {
        let err = LanguageError::Unknown {
            code: "xx".to_string(),
        };
        assert_eq!(err.to_string(), "unknown language 'xx'");
    }

    #[test]
    fn parse_error_forwards_syntax_display() {
        let syntax = SyntaxError::new(Location::new(None, 4, 2), "oops", "  Given");
        let err = ParseError::from(syntax.clone());
        assert_eq!(err.to_string(), syntax.to_string());
        assert_eq!(err.as_syntax(), Some(&syntax));
    }

    #[test]
    fn warning_quotes_recovered_value() {
        let warning = ParseWarning {
            location: Location::new(None, 5, 1),
            message: "under-indented".to_string(),
            line: "text".to_string(),
        };
        assert_eq!(warning.to_string(), "<string>:5:1: under-indented: \"text\"");
    }
}
