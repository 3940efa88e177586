//! Gherkin grammar, document model and outline resolution for cress.
//!
//! Text flows through a line-oriented lexer, a recursive-descent grammar and
//! a model builder to become an immutable [`Feature`]. Scenario outlines are
//! expanded lazily with [`Scenario::evaluated`], and every node renders back
//! to canonical Gherkin through [`std::fmt::Display`].
//!
//! ```
//! use cress_gherkin::{ParseOptions, parse_feature};
//!
//! let feature = parse_feature(
//!     "Feature: Addition\n  Scenario: Add two numbers\n    Given I have entered 2\n",
//!     &ParseOptions::new(),
//! )?;
//! assert_eq!(feature.name(), "Addition");
//! assert_eq!(feature.scenarios().len(), 1);
//! # Ok::<(), cress_gherkin::ParseError>(())
//! ```

mod builder;
mod errors;
pub mod grammar;
mod keyword;
mod language;
mod lexer;
mod location;
mod model;
mod options;
mod outline;
mod render;

use std::fs;
use std::path::Path;

pub use errors::{LanguageError, ParseError, ParseWarning, SyntaxError};
pub use grammar::{ParseTree, StartSymbol, parse};
pub use keyword::StepKeyword;
pub use language::{
    BlockKind, BlockLine, DEFAULT_LANGUAGE, Language, Slot, StatementLine, available_languages,
};
pub use lexer::declared_language;
pub use location::{Location, Span};
pub use model::{
    Background, BlockId, BlockRef, Description, DocString, DocStringDelimiter, Examples, Feature,
    Node, Record, Scenario, ScenarioRef, Step, Table,
};
pub use options::ParseOptions;
pub use outline::{Evaluated, EvaluatedIter, Example, placeholders, substitute};

/// Parse a complete feature document.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for malformed documents and
/// [`ParseError::Language`] when the requested or declared language is not
/// bundled.
pub fn parse_feature(text: &str, options: &ParseOptions) -> Result<Feature, ParseError> {
    Ok(parse(text, StartSymbol::Feature, options)?.into_feature()?)
}

/// Read and parse the feature document at `path`.
///
/// Locations in the result and in any error refer to `path` unless
/// `options` already names one.
///
/// # Errors
///
/// Returns [`ParseError::Io`] when the file cannot be read, otherwise the
/// same errors as [`parse_feature`].
pub fn parse_feature_file(path: &Path, options: &ParseOptions) -> Result<Feature, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = if options.path().is_some() {
        options.clone()
    } else {
        options.clone().with_path(path)
    };
    parse_feature(&text, &options)
}

/// Parse a bare sequence of steps, such as a snippet of a scenario body.
///
/// The steps have no owner.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] when the text contains anything other than
/// steps and their arguments.
pub fn parse_steps(text: &str, options: &ParseOptions) -> Result<Vec<Step>, ParseError> {
    Ok(parse(text, StartSymbol::Steps, options)?.into_steps()?)
}
