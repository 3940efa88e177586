//! Immutable document model.
//!
//! A [`Feature`] owns its background and scenarios, which own their steps.
//! Nodes are built once by the parser and never mutated afterwards; outline
//! resolution produces fresh copies instead of editing templates.

mod blocks;
mod data;
mod feature;
mod step;

pub use blocks::{Background, BlockId, BlockRef, Description, Examples, Scenario};
pub use data::{DocString, DocStringDelimiter, Record, Table};
pub use feature::{Feature, ScenarioRef};
pub use step::Step;

pub(crate) use step::normalise_sentence;

use crate::location::{Location, Span};

/// Capabilities shared by every parsed node.
pub trait Node {
    /// Where the node's opening construct was recognised.
    fn location(&self) -> &Location;

    /// Byte range of the node within the document.
    fn span(&self) -> Span;
}
