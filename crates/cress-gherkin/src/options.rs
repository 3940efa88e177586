//! Options shared by the parsing entry points.

use std::path::{Path, PathBuf};

/// How a document should be read.
///
/// # Examples
/// ```
/// use cress_gherkin::ParseOptions;
///
/// let options = ParseOptions::new().with_language("fr").with_path("features/panier.feature");
/// assert_eq!(options.language(), Some("fr"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    language: Option<String>,
    path: Option<PathBuf>,
}

impl ParseOptions {
    /// Options for an English document with no path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the keywords of `code` unless the document declares its own
    /// language with a `# language:` header.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Attribute locations to `path`.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Requested language code.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Path locations are attributed to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
