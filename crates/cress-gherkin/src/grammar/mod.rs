//! Grammar over the token stream.
//!
//! [`parse`] recognises the structure of a document and yields a
//! [`ParseTree`] of productions; [`ParseTree::into_feature`] and
//! [`ParseTree::into_steps`] hand those to the model builder, which performs
//! the semantic checks.

mod parser;
pub(crate) mod productions;

use std::path::Path;
use std::sync::Arc;

use crate::builder;
use crate::errors::{ParseError, ParseWarning, SyntaxError};
use crate::language::{DEFAULT_LANGUAGE, Language};
use crate::lexer::{self, declared_language};
use crate::location::Location;
use crate::model::{Feature, Step};
use crate::options::ParseOptions;

use self::parser::Parser;
use self::productions::Production;

/// Production a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartSymbol {
    /// A complete document holding exactly one feature.
    Feature,
    /// A bare sequence of steps, as used by step snippets.
    Steps,
}

/// Structure recognised in one document, before semantic validation.
#[derive(Debug)]
pub struct ParseTree {
    pub(crate) root: Production,
    pub(crate) language: Arc<Language>,
    pub(crate) source: Arc<str>,
    pub(crate) path: Option<Arc<Path>>,
    pub(crate) warnings: Vec<ParseWarning>,
}

impl ParseTree {
    /// The start symbol the tree was parsed from.
    #[must_use]
    pub const fn start(&self) -> StartSymbol {
        match self.root {
            Production::Feature(_) => StartSymbol::Feature,
            Production::Steps(_) => StartSymbol::Steps,
        }
    }

    /// Language whose keywords were used.
    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Recoverable problems noticed while tokenising.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Build the feature model.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when a semantic rule is broken (an empty
    /// name, a feature without scenarios, a ragged table, ...) or when the
    /// tree was parsed from [`StartSymbol::Steps`].
    pub fn into_feature(self) -> Result<Feature, SyntaxError> {
        builder::feature(self)
    }

    /// Build free-standing steps.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for ragged tables or when the tree was
    /// parsed from [`StartSymbol::Feature`].
    pub fn into_steps(self) -> Result<Vec<Step>, SyntaxError> {
        builder::steps(self)
    }
}

/// Recognise the structure of `text` starting from `start`.
///
/// A leading byte order mark is ignored. The keyword language is taken from
/// a `# language:` header when present, then from `options`, then defaults
/// to English.
///
/// # Errors
///
/// Returns [`ParseError::Language`] for an unknown language and
/// [`ParseError::Syntax`] for structural problems.
pub fn parse(text: &str, start: StartSymbol, options: &ParseOptions) -> Result<ParseTree, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let code = declared_language(text)
        .or(options.language())
        .unwrap_or(DEFAULT_LANGUAGE);
    let language = Language::load(code)?;
    let path: Option<Arc<Path>> = options.path().map(Arc::from);

    let lexed = lexer::tokenize(text, &language, path.clone())?;
    let end = Location::new(path.clone(), text.split('\n').count(), 1);
    let mut parser = Parser::new(lexed.tokens, start, end);
    let root = match start {
        StartSymbol::Feature => Production::Feature(parser.feature()?),
        StartSymbol::Steps => Production::Steps(parser.steps_only()?),
    };

    Ok(ParseTree {
        root,
        language,
        source: Arc::from(text),
        path,
        warnings: lexed.warnings,
    })
}
