use std::collections::BTreeSet;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use crate::errors::ParseWarning;
use crate::language::Language;
use crate::location::{Location, Span};

use super::{Background, BlockId, BlockRef, Description, Node, Scenario};

/// Root of a parsed document.
///
/// The feature owns every block and step by value. Steps point back at their
/// block through [`BlockId`], and scenarios reach their feature through
/// [`ScenarioRef`], so the tree never forms reference cycles.
#[derive(Debug, Clone)]
pub struct Feature {
    pub(crate) keyword: String,
    pub(crate) name: String,
    pub(crate) tags: Vec<String>,
    pub(crate) description: Option<Description>,
    pub(crate) background: Option<Background>,
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) language: Arc<Language>,
    pub(crate) source: Arc<str>,
    pub(crate) warnings: Vec<ParseWarning>,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

impl Feature {
    /// Keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Non-empty name after the colon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags written above the feature header.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Description lines between the header and the first block.
    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Optional background.
    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Scenarios in document order; never empty.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// The scenario at `index`, paired with this feature.
    #[must_use]
    pub fn scenario(&self, index: usize) -> Option<ScenarioRef<'_>> {
        self.scenarios.get(index).map(|scenario| ScenarioRef {
            feature: self,
            scenario,
        })
    }

    /// Every scenario paired with this feature.
    pub fn scenario_refs(&self) -> impl Iterator<Item = ScenarioRef<'_>> {
        self.scenarios.iter().map(move |scenario| ScenarioRef {
            feature: self,
            scenario,
        })
    }

    /// Own tags of the scenario at `index` together with the feature's tags.
    #[must_use]
    pub fn scenario_tags(&self, index: usize) -> BTreeSet<&str> {
        self.scenario(index)
            .map(|scenario| scenario.tags())
            .unwrap_or_default()
    }

    /// Resolve a step owner.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<BlockRef<'_>> {
        match id {
            BlockId::Background => self.background.as_ref().map(BlockRef::Background),
            BlockId::Scenario(index) => self.scenarios.get(index).map(BlockRef::Scenario),
        }
    }

    /// Language the document was parsed with.
    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// File the document was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.location.path()
    }

    /// Complete source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Raw source text covered by `node`.
    ///
    /// Nodes synthesised by outline resolution report their template's text.
    #[must_use]
    pub fn source_of(&self, node: &dyn Node) -> &str {
        self.source.get(node.span().range()).unwrap_or_default()
    }

    /// Recoverable problems noticed while parsing.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

impl Node for Feature {
    fn location(&self) -> &Location {
        &self.location
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// A scenario viewed together with its feature.
///
/// Dereferences to [`Scenario`]; [`tags`](Self::tags) shadows
/// [`Scenario::tags`] to include inherited feature tags.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRef<'a> {
    feature: &'a Feature,
    scenario: &'a Scenario,
}

impl<'a> ScenarioRef<'a> {
    /// Owning feature.
    #[must_use]
    pub const fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// The scenario itself.
    #[must_use]
    pub const fn scenario(&self) -> &'a Scenario {
        self.scenario
    }

    /// Own tags together with the feature's tags.
    ///
    /// Computed on every call; the union is never stored.
    #[must_use]
    pub fn tags(&self) -> BTreeSet<&'a str> {
        self.scenario
            .tags
            .iter()
            .chain(&self.feature.tags)
            .map(String::as_str)
            .collect()
    }
}

impl Deref for ScenarioRef<'_> {
    type Target = Scenario;

    fn deref(&self) -> &Scenario {
        self.scenario
    }
}
