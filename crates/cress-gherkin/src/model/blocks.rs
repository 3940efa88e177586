use crate::language::BlockKind;
use crate::location::{Location, Span};

use super::{Node, Record, Step, Table};

/// Identifies a step-owning block within its feature.
///
/// Steps refer to their owner through this index rather than a pointer; use
/// [`Feature::block`](super::Feature::block) to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// The feature's background.
    Background,
    /// The scenario at this position in [`Feature::scenarios`](super::Feature::scenarios).
    Scenario(usize),
}

/// Free-text lines following a block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub(crate) lines: Vec<String>,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Description {
    /// Trimmed lines, blank and comment lines excluded.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Node for Description {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// Steps run before every scenario of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub(crate) keyword: String,
    pub(crate) name: String,
    pub(crate) description: Option<Description>,
    pub(crate) steps: Vec<Step>,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Background {
    /// Keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Name after the colon; may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description lines, if any.
    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Steps in document order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Node for Background {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// One Examples block of a scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    pub(crate) keyword: String,
    pub(crate) name: String,
    pub(crate) tags: Vec<String>,
    pub(crate) description: Option<Description>,
    pub(crate) table: Table,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Examples {
    /// Keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Name after the colon; may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags written directly above the block.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Description lines, if any.
    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Header and value rows.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl Node for Examples {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// A named sequence of steps, optionally templated by Examples rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub(crate) keyword: String,
    pub(crate) kind: BlockKind,
    pub(crate) name: String,
    pub(crate) tags: Vec<String>,
    pub(crate) description: Option<Description>,
    pub(crate) steps: Vec<Step>,
    pub(crate) examples: Vec<Examples>,
    pub(crate) outlines: Vec<Record>,
    pub(crate) index: usize,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Scenario {
    /// Keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Whether the header used an outline keyword such as `Scenario Outline`.
    #[must_use]
    pub fn declared_as_outline(&self) -> bool {
        self.kind == BlockKind::ScenarioOutline
    }

    /// Whether the scenario has rows to resolve before it can run.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        !self.outlines.is_empty()
    }

    /// Non-empty name after the colon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags written directly above this scenario, without inherited ones.
    ///
    /// [`ScenarioRef::tags`](super::ScenarioRef::tags) adds the feature's.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Description lines, if any.
    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Template steps in document order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Examples blocks in document order.
    #[must_use]
    pub fn examples(&self) -> &[Examples] {
        &self.examples
    }

    /// Rows of every Examples block, concatenated in document order.
    #[must_use]
    pub fn outlines(&self) -> &[Record] {
        &self.outlines
    }

    /// Position of this scenario within its feature.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Identifier that this scenario's steps carry as their owner.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        BlockId::Scenario(self.index)
    }
}

impl Node for Scenario {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// A resolved step owner.
#[derive(Debug, Clone, Copy)]
pub enum BlockRef<'a> {
    /// The feature's background.
    Background(&'a Background),
    /// One of the feature's scenarios.
    Scenario(&'a Scenario),
}

impl<'a> BlockRef<'a> {
    /// Steps of the block.
    #[must_use]
    pub fn steps(self) -> &'a [Step] {
        match self {
            Self::Background(background) => background.steps(),
            Self::Scenario(scenario) => scenario.steps(),
        }
    }

    /// Name of the block.
    #[must_use]
    pub fn name(self) -> &'a str {
        match self {
            Self::Background(background) => background.name(),
            Self::Scenario(scenario) => scenario.name(),
        }
    }

    /// Location of the block header.
    #[must_use]
    pub fn location(self) -> &'a Location {
        match self {
            Self::Background(background) => &background.location,
            Self::Scenario(scenario) => &scenario.location,
        }
    }
}
