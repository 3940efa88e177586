//! Step arguments: data tables, records and multiline strings.

use crate::location::{Location, Span};

use super::Node;

/// An ordered mapping from column name to cell value.
///
/// Produced by zipping a table row with the table's header. Inserting an
/// existing key replaces its value in place, keeping the original position.
///
/// # Examples
/// ```
/// use cress_gherkin::Record;
///
/// let mut record: Record = [("a", "2"), ("b", "3")].into_iter().collect();
/// record.insert("a", "20");
/// assert_eq!(record.get("a"), Some("20"));
/// assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if one existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// A data table attached to a step or an Examples block.
///
/// Row 0 is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Table {
    /// Every row, header included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The header row, or an empty slice for an empty table.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows after the header.
    #[must_use]
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Each body row zipped with the header.
    #[must_use]
    pub fn hashes(&self) -> Vec<Record> {
        let keys = self.keys();
        self.body()
            .iter()
            .map(|row| keys.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.keys().len()
    }
}

impl Node for Table {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// Fence used to open and close a multiline string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStringDelimiter {
    /// `"""`
    Quotes,
    /// ```` ``` ````
    Backticks,
}

impl DocStringDelimiter {
    /// The delimiter as written.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quotes => "\"\"\"",
            Self::Backticks => "```",
        }
    }

    /// The escaped spelling accepted inside the body.
    #[must_use]
    pub const fn escaped(self) -> &'static str {
        match self {
            Self::Quotes => "\\\"\\\"\\\"",
            Self::Backticks => "\\`\\`\\`",
        }
    }

    pub(crate) fn opening(content: &str) -> Option<Self> {
        [Self::Quotes, Self::Backticks]
            .into_iter()
            .find(|delimiter| content.starts_with(delimiter.as_str()))
    }
}

/// A multiline string attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocString {
    pub(crate) content: String,
    pub(crate) content_type: Option<String>,
    pub(crate) delimiter: DocStringDelimiter,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl DocString {
    /// Dedented body text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content type written after the opening delimiter, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Delimiter the string was written with.
    #[must_use]
    pub const fn delimiter(&self) -> DocStringDelimiter {
        self.delimiter
    }
}

impl Node for DocString {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}
