use crate::keyword::StepKeyword;
use crate::location::{Location, Span};

use super::{BlockId, DocString, Node, Record, Table};

/// One step line with its optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub(crate) literal: String,
    pub(crate) kind: StepKeyword,
    pub(crate) phase: StepKeyword,
    pub(crate) text: String,
    pub(crate) sentence: String,
    pub(crate) table: Option<Table>,
    pub(crate) docstring: Option<DocString>,
    pub(crate) owner: Option<BlockId>,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Step {
    /// Keyword as written, e.g. `Given` or `Soit`.
    #[must_use]
    pub fn keyword(&self) -> &str {
        self.literal.trim()
    }

    /// Keyword literal exactly as declared by the language, including any
    /// trailing space.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Semantic keyword.
    #[must_use]
    pub const fn kind(&self) -> StepKeyword {
        self.kind
    }

    /// `Given`, `When` or `Then`: the keyword with conjunctions resolved
    /// against the earlier steps of the same block.
    #[must_use]
    pub const fn phase(&self) -> StepKeyword {
        self.phase
    }

    /// Step body without its keyword.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Keyword and body with every whitespace run collapsed to one space.
    ///
    /// This is the string step definitions are matched against.
    #[must_use]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// Attached data table.
    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Attached multiline string.
    #[must_use]
    pub fn docstring(&self) -> Option<&DocString> {
        self.docstring.as_ref()
    }

    /// Body of the attached multiline string.
    #[must_use]
    pub fn multiline(&self) -> Option<&str> {
        self.docstring.as_ref().map(DocString::content)
    }

    /// Header row of the attached table; empty without a table.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.table.as_ref().map(Table::keys).unwrap_or_default()
    }

    /// Body rows of the attached table zipped with its header.
    #[must_use]
    pub fn hashes(&self) -> Vec<Record> {
        self.table.as_ref().map(Table::hashes).unwrap_or_default()
    }

    /// Block that owns this step; `None` for steps parsed on their own.
    #[must_use]
    pub const fn owner(&self) -> Option<BlockId> {
        self.owner
    }
}

impl Node for Step {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// Collapse whitespace runs into single spaces and trim both ends.
pub(crate) fn normalise_sentence(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalise_sentence("Given  I\thave   3 "), "Given I have 3");
        assert_eq!(normalise_sentence("前提ユーザー"), "前提ユーザー");
    }
}
