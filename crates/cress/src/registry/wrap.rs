//! Running a call inside the hooks of one scope.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::hooks::{AroundGuard, Callback, HookEntry, HookError, HookTarget, Scope, Timing};
use crate::localization;

/// A hook that failed while wrapping a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    /// Scope being wrapped.
    pub scope: Scope,
    /// Phase the hook ran in. Failures while leaving an around hook report
    /// [`Timing::Around`].
    pub timing: Timing,
    /// Name of the failing hook.
    pub name: String,
    /// The hook's error.
    pub error: HookError,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = localization::message_with_args("hook-failed", |args| {
            args.set("timing", self.timing.as_str());
            args.set("scope", self.scope.as_str());
            args.set("name", self.name.clone());
            args.set("message", self.error.message().to_owned());
        });
        f.write_str(&message)
    }
}

impl std::error::Error for HookFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Error returned by a wrapped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapError<E> {
    /// A hook failed.
    Hook(HookFailure),
    /// The wrapped call itself failed.
    Call(E),
}

impl<E: fmt::Display> fmt::Display for WrapError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook(failure) => failure.fmt(f),
            Self::Call(error) => error.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for WrapError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Hook(failure) => Some(failure),
            Self::Call(error) => Some(error),
        }
    }
}

/// The hooks of one scope, split into an entry and an exit half.
///
/// [`before`](Self::before) runs the before hooks and enters the around
/// hooks; [`after`](Self::after) exits the around hooks in reverse and runs
/// every after hook. Around hooks still entered when the bracket is dropped
/// are exited then, which covers unwinding.
#[must_use]
pub struct HookBracket {
    scope: Scope,
    befores: Vec<HookEntry>,
    arounds: Vec<HookEntry>,
    afters: Vec<HookEntry>,
    entered: Vec<(String, AroundGuard)>,
}

impl HookBracket {
    pub(crate) fn new(
        scope: Scope,
        befores: Vec<HookEntry>,
        arounds: Vec<HookEntry>,
        afters: Vec<HookEntry>,
    ) -> Self {
        Self {
            scope,
            befores,
            arounds,
            afters,
            entered: Vec::new(),
        }
    }

    /// Scope this bracket wraps.
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Run the before hooks in order, then enter the around hooks in order.
    ///
    /// Stops at the first failure; nothing after the failing hook runs.
    ///
    /// # Errors
    ///
    /// Returns the [`HookFailure`] of the first hook that failed.
    pub fn before(&mut self, target: &HookTarget<'_>) -> Result<(), HookFailure> {
        for entry in &self.befores {
            if let Callback::Plain(hook) = &entry.callback {
                hook(target).map_err(|error| self.failure(Timing::Before, &entry.name, error))?;
            }
        }
        for entry in &self.arounds {
            if let Callback::Around(hook) = &entry.callback {
                let guard =
                    hook(target).map_err(|error| self.failure(Timing::Around, &entry.name, error))?;
                self.entered.push((entry.name.clone(), guard));
            }
        }
        Ok(())
    }

    /// Exit entered around hooks in reverse, then run every after hook.
    ///
    /// All exits and after hooks run even when some fail.
    ///
    /// # Errors
    ///
    /// Returns the first [`HookFailure`]; later ones are logged.
    pub fn after(&mut self, target: &HookTarget<'_>) -> Result<(), HookFailure> {
        let mut first = None;
        let mut record = |failure: HookFailure| {
            if first.is_none() {
                first = Some(failure);
            } else {
                log::warn!("{failure}");
            }
        };
        while let Some((name, guard)) = self.entered.pop() {
            if let Err(error) = guard.release() {
                record(self.failure(Timing::Around, &name, error));
            }
        }
        for entry in &self.afters {
            if let Callback::Plain(hook) = &entry.callback {
                if let Err(error) = hook(target) {
                    record(self.failure(Timing::After, &entry.name, error));
                }
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn failure(&self, timing: Timing, name: &str, error: HookError) -> HookFailure {
        HookFailure {
            scope: self.scope,
            timing,
            name: name.to_owned(),
            error,
        }
    }
}

impl Drop for HookBracket {
    fn drop(&mut self) {
        while let Some((name, guard)) = self.entered.pop() {
            if let Err(error) = guard.release() {
                log::warn!("{}", self.failure(Timing::Around, &name, error));
            }
        }
    }
}

impl fmt::Debug for HookBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBracket")
            .field("scope", &self.scope)
            .field("befores", &self.befores.len())
            .field("arounds", &self.arounds.len())
            .field("afters", &self.afters.len())
            .field("entered", &self.entered.len())
            .finish()
    }
}

/// Run `call` between the two halves of `bracket`.
///
/// A failing before hook skips `call`; the exit half always runs and the
/// first error wins. A panicking `call` still runs the exit half before the
/// panic resumes.
pub(crate) fn run_bracketed<T, E>(
    mut bracket: HookBracket,
    target: &HookTarget<'_>,
    call: impl FnOnce(&HookTarget<'_>) -> Result<T, E>,
) -> Result<T, WrapError<E>> {
    let outcome = match bracket.before(target) {
        Ok(()) => match panic::catch_unwind(AssertUnwindSafe(|| call(target))) {
            Ok(result) => result.map_err(WrapError::Call),
            Err(payload) => {
                if let Err(failure) = bracket.after(target) {
                    log::warn!("{failure}");
                }
                panic::resume_unwind(payload);
            }
        },
        Err(failure) => Err(WrapError::Hook(failure)),
    };
    let exited = bracket.after(target);
    match (outcome, exited) {
        (Err(error), Err(failure)) => {
            log::warn!("{failure}");
            Err(error)
        }
        (Err(error), Ok(())) => Err(error),
        (Ok(_), Err(failure)) => Err(WrapError::Hook(failure)),
        (Ok(value), Ok(())) => Ok(value),
    }
}
