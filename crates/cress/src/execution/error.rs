//! Error type for example execution.

use std::fmt;

use cress_gherkin::{Node, Step};

use crate::localization;
use crate::registry::{HookFailure, WrapError};
use crate::types::StepError;

/// Why an example did not run to completion.
///
/// Execution stops at the first failing step; steps after it are not run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No definition matches the step.
    StepNotFound {
        /// Zero-based position of the step within its block.
        index: usize,
        /// The resolved step.
        step: Box<Step>,
    },
    /// The matched handler returned an error or panicked.
    HandlerFailed {
        /// Zero-based position of the step within its block.
        index: usize,
        /// The resolved step.
        step: Box<Step>,
        /// Pattern of the matched definition.
        pattern: String,
        /// The handler's failure.
        error: StepError,
    },
    /// A hook failed.
    HookFailed(HookFailure),
}

impl ExecutionError {
    /// The step the failure belongs to, when it belongs to one.
    #[must_use]
    pub fn step(&self) -> Option<&Step> {
        match self {
            Self::StepNotFound { step, .. } | Self::HandlerFailed { step, .. } => Some(step),
            Self::HookFailed(_) => None,
        }
    }

    /// Whether the failure is a missing step definition.
    #[must_use]
    pub const fn is_missing_step(&self) -> bool {
        matches!(self, Self::StepNotFound { .. })
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::StepNotFound { step, .. } => {
                localization::message_with_args("execution-step-not-found", |args| {
                    args.set("location", step.location().to_string());
                    args.set("sentence", step.sentence().to_owned());
                })
            }
            Self::HandlerFailed {
                step,
                pattern,
                error,
                ..
            } => localization::message_with_args("execution-handler-failed", |args| {
                args.set("location", step.location().to_string());
                args.set("sentence", step.sentence().to_owned());
                args.set("pattern", pattern.clone());
                args.set("message", error.to_string());
            }),
            Self::HookFailed(failure) => return failure.fmt(f),
        };
        f.write_str(&message)
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StepNotFound { .. } => None,
            Self::HandlerFailed { error, .. } => Some(error),
            Self::HookFailed(failure) => Some(failure),
        }
    }
}

impl From<WrapError<Self>> for ExecutionError {
    fn from(error: WrapError<Self>) -> Self {
        match error {
            WrapError::Hook(failure) => Self::HookFailed(failure),
            WrapError::Call(error) => error,
        }
    }
}
