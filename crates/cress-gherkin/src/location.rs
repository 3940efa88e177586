//! Source positions attached to every parsed node.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// Position of a construct within a feature document.
///
/// Lines and columns are one-based; columns count characters, not bytes, so
/// diagnostics line up with what an editor shows for non-ASCII keywords.
///
/// # Examples
/// ```
/// use cress_gherkin::Location;
///
/// let location = Location::new(None, 3, 5);
/// assert_eq!(location.to_string(), "<string>:3:5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: Option<Arc<Path>>,
    line: usize,
    column: usize,
}

impl Location {
    /// Construct a location from its parts.
    #[must_use]
    pub fn new(path: Option<Arc<Path>>, line: usize, column: usize) -> Self {
        Self { path, line, column }
    }

    /// Path of the document, when it was read from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// One-based column number.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}:{}", path.display(), self.line, self.column),
            None => write!(f, "<string>:{}:{}", self.line, self.column),
        }
    }
}

/// Byte range of a node within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Construct a span, clamping `end` so it never precedes `start`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Extend this span so it also covers `other`.
    #[must_use]
    pub const fn join(self, other: Self) -> Self {
        let start = if other.start < self.start {
            other.start
        } else {
            self.start
        };
        let end = if other.end > self.end {
            other.end
        } else {
            self.end
        };
        Self { start, end }
    }

    /// View the span as a byte range.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}
