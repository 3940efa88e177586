//! Step definitions, their handles and match results.

use std::any;
use std::fmt;
use std::sync::Arc;

use cress_gherkin::Location;

use crate::localization;
use crate::pattern::StepPattern;
use crate::types::{StepArguments, StepFn, StepHandler};

use super::Registry;

/// Unique identity of one registration.
///
/// Replacing a pattern issues a new id, so handles to the replaced
/// definition no longer remove anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId(pub(crate) u64);

/// Source position of a statically declared step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOrigin {
    /// Source file of the declaration.
    pub file: &'static str,
    /// Line of the declaration.
    pub line: u32,
}

impl fmt::Display for StepOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A registered step.
pub struct StepDefinition {
    pub(crate) id: StepId,
    pub(crate) pattern: StepPattern,
    pub(crate) handler: StepHandler,
    pub(crate) origin: Option<StepOrigin>,
}

impl StepDefinition {
    /// Identity of this registration.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// Compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// Whether arguments are reported by name.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.pattern.is_named()
    }

    /// The handler.
    #[must_use]
    pub fn handler(&self) -> &StepHandler {
        &self.handler
    }

    /// Where the step was declared, for steps collected with [`step!`](crate::step).
    #[must_use]
    pub const fn origin(&self) -> Option<StepOrigin> {
        self.origin
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("pattern", &self.pattern.as_str())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Proof of a step registration, used to remove it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHandle {
    pub(crate) id: StepId,
    pub(crate) pattern: String,
}

impl StepHandle {
    /// Identity of the registration this handle refers to.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// Pattern text the step was registered under.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Remove the definition this handle created from `registry`.
    ///
    /// Same as [`Registry::unregister_step`].
    pub fn unregister(&self, registry: &mut Registry) -> bool {
        registry.unregister_step(self)
    }
}

/// Result of a successful match.
#[derive(Debug, Clone)]
pub struct StepMatch {
    pub(crate) definition: Arc<StepDefinition>,
    pub(crate) arguments: StepArguments,
}

impl StepMatch {
    /// The definition that matched.
    #[must_use]
    pub fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    /// Captured arguments.
    #[must_use]
    pub const fn arguments(&self) -> &StepArguments {
        &self.arguments
    }
}

/// A step collected at link time by [`step!`](crate::step).
#[derive(Debug)]
pub struct StepDeclaration {
    /// Explicit pattern, if one was given.
    pub pattern: Option<&'static str>,
    /// Documentation whose first line becomes the pattern.
    pub doc: Option<&'static str>,
    /// Path of the handler as written at the declaration.
    pub name: &'static str,
    /// The handler.
    pub handler: StepFn,
    /// Source file of the declaration.
    pub file: &'static str,
    /// Line of the declaration.
    pub line: u32,
}

inventory::collect!(StepDeclaration);

impl StepDeclaration {
    /// The pattern text this declaration registers under.
    ///
    /// # Errors
    ///
    /// Returns [`StepLoadingError`] when no sentence can be derived.
    pub fn sentence(&self) -> Result<String, StepLoadingError> {
        match (self.pattern, self.doc) {
            (Some(pattern), _) => Ok(pattern.to_owned()),
            (None, Some(doc)) => sentence_from_doc(doc),
            (None, None) => sentence_from_name(self.name),
        }
    }

    pub(crate) const fn origin(&self) -> StepOrigin {
        StepOrigin {
            file: self.file,
            line: self.line,
        }
    }
}

/// Failure to register a step.
#[derive(Debug)]
#[non_exhaustive]
pub enum StepLoadingError {
    /// The pattern is not a valid regular expression.
    InvalidPattern {
        /// Offending pattern text.
        pattern: String,
        /// Compiler diagnostic.
        source: regex::Error,
    },
    /// No pattern was given and the handler has no usable name.
    UnnamedHandler {
        /// Type name of the handler.
        handler: String,
    },
    /// The documentation given as the pattern has no non-blank line.
    MissingDocumentation,
}

impl fmt::Display for StepLoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::InvalidPattern { pattern, source } => {
                localization::message_with_args("step-loading-invalid-pattern", |args| {
                    args.set("pattern", pattern.clone());
                    args.set("reason", source.to_string());
                })
            }
            Self::UnnamedHandler { handler } => {
                localization::message_with_args("step-loading-unnamed-handler", |args| {
                    args.set("handler", handler.clone());
                })
            }
            Self::MissingDocumentation => localization::message("step-loading-missing-documentation"),
        };
        f.write_str(&message)
    }
}

impl std::error::Error for StepLoadingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// No registered pattern matches a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoDefinitionFound {
    /// The sentence that was looked up.
    pub sentence: String,
    /// Where the step appears, when matching a parsed step.
    pub location: Option<Location>,
}

impl fmt::Display for NoDefinitionFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match &self.location {
            Some(location) => localization::message_with_args("no-definition-found-at", |args| {
                args.set("location", location.to_string());
                args.set("sentence", self.sentence.clone());
            }),
            None => localization::message_with_args("no-definition-found", |args| {
                args.set("sentence", self.sentence.clone());
            }),
        };
        f.write_str(&message)
    }
}

impl std::error::Error for NoDefinitionFound {}

/// Sentence for a handler registered without a pattern.
pub(crate) fn sentence_for<H>() -> Result<String, StepLoadingError> {
    sentence_from_name(any::type_name::<H>())
}

/// Turn `crate::steps::i_have_cukes` into `I have cukes`.
fn sentence_from_name(name: &str) -> Result<String, StepLoadingError> {
    let unnamed = || StepLoadingError::UnnamedHandler {
        handler: name.to_owned(),
    };
    let path = name.split('<').next().unwrap_or(name);
    let ident = path.rsplit("::").next().unwrap_or(path).trim();
    if ident.is_empty() || !ident.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(unnamed());
    }
    let words = ident.replace('_', " ");
    let words = words.trim();
    let mut chars = words.chars();
    let Some(first) = chars.next() else {
        return Err(unnamed());
    };
    Ok(first.to_uppercase().chain(chars).collect())
}

/// First non-blank line of a doc comment.
pub(crate) fn sentence_from_doc(doc: &str) -> Result<String, StepLoadingError> {
    doc.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
        .ok_or(StepLoadingError::MissingDocumentation)
}
