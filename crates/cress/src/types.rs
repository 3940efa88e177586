//! Values passed to and returned from step handlers.

use std::fmt;
use std::sync::Arc;

use cress_gherkin::{Record, Step, Table};
use hashbrown::HashMap;

use crate::localization;

/// Captured arguments of a matched step.
///
/// A pattern with at least one named group yields only [`named`](Self::named)
/// arguments; otherwise every group is positional. Groups that did not take
/// part in the match are reported as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepArguments {
    pub(crate) positional: Vec<String>,
    pub(crate) named: HashMap<String, String>,
}

impl StepArguments {
    /// Positional captures in group order.
    #[must_use]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Named captures.
    #[must_use]
    pub fn named(&self) -> &HashMap<String, String> {
        &self.named
    }

    /// Positional capture at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Named capture `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

/// Everything a handler sees when it runs.
#[derive(Debug, Clone, Copy)]
pub struct StepCall<'a> {
    step: &'a Step,
    arguments: &'a StepArguments,
    outline: Option<&'a Record>,
}

impl<'a> StepCall<'a> {
    /// Bundle a resolved step with its captured arguments.
    #[must_use]
    pub const fn new(step: &'a Step, arguments: &'a StepArguments, outline: Option<&'a Record>) -> Self {
        Self {
            step,
            arguments,
            outline,
        }
    }

    /// The step being executed, with outline placeholders already substituted.
    #[must_use]
    pub const fn step(&self) -> &'a Step {
        self.step
    }

    /// Arguments captured by the matching pattern.
    #[must_use]
    pub const fn arguments(&self) -> &'a StepArguments {
        self.arguments
    }

    /// Positional capture at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.arguments.get(index)
    }

    /// Named capture `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&'a str> {
        self.arguments.by_name(name)
    }

    /// Attached data table.
    #[must_use]
    pub fn table(&self) -> Option<&'a Table> {
        self.step.table()
    }

    /// Attached multiline string content.
    #[must_use]
    pub fn multiline(&self) -> Option<&'a str> {
        self.step.multiline()
    }

    /// Examples row the step was resolved from.
    #[must_use]
    pub const fn outline(&self) -> Option<&'a Record> {
        self.outline
    }
}

/// Shared, type-erased step handler.
pub type StepHandler = Arc<dyn Fn(&StepCall<'_>) -> Result<(), StepError> + Send + Sync>;

/// Plain function form used for statically declared steps.
pub type StepFn = fn(&StepCall<'_>) -> Result<(), StepError>;

/// Failure reported by a step handler.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    /// The handler returned an error.
    Failed {
        /// Message supplied by the handler.
        message: String,
    },
    /// The handler panicked.
    Panicked {
        /// Rendered panic payload.
        message: String,
    },
}

impl StepError {
    /// Build a [`StepError::Failed`] from any displayable value.
    pub fn failed(message: impl fmt::Display) -> Self {
        Self::Failed {
            message: message.to_string(),
        }
    }

    /// The handler's or panic's message without decoration.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Failed { message } | Self::Panicked { message } => message,
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { message } => f.write_str(message),
            Self::Panicked { message } => {
                let rendered = localization::message_with_args("step-error-panicked", |args| {
                    args.set("message", message.clone());
                });
                f.write_str(&rendered)
            }
        }
    }
}

impl std::error::Error for StepError {}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self::Failed { message }
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self::failed(message)
    }
}
