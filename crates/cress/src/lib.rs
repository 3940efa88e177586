//! Step registry, hook pipeline and execution helpers for cress.
//!
//! Step sentences parsed by [`cress_gherkin`] are dispatched to handlers
//! through a [`Registry`]: the first registered pattern found in a sentence
//! wins. Hooks run before, around and after each lifecycle [`Scope`] in an
//! order fixed by their [`PriorityClass`], explicit priority and insertion.
//!
//! ```
//! use cress::{Registry, StepCall, StepError, examples};
//! use cress_gherkin::{ParseOptions, parse_feature};
//!
//! let feature = parse_feature(
//!     "Feature: Addition\n  Scenario: Add\n    Given I have entered 2\n",
//!     &ParseOptions::new(),
//! )?;
//! let mut registry = Registry::new();
//! registry.register_step(Some(r"I have entered (\d+)"), |call: &StepCall<'_>| {
//!     let value: u32 = call.arg(0).unwrap_or_default().parse().map_err(StepError::failed)?;
//!     assert_eq!(value, 2);
//!     Ok(())
//! })?;
//! for run in examples(&feature) {
//!     run.run(&registry)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod execution;
pub mod localization;
mod panic_support;
mod pattern;
mod registry;
mod types;

pub use inventory::{iter, submit};

pub use execution::{ExampleOutcome, ExampleRun, ExecutionError, examples, run_feature};
pub use localization::{LocalizationError, Localizations, ScopedLocalization};
pub use panic_support::panic_message;
pub use pattern::StepPattern;
pub use registry::{
    AroundGuard, HookBracket, HookError, HookFailure, HookHandle, HookOptions, HookTarget,
    NoDefinitionFound, PriorityClass, Registry, RegistrySnapshot, Scope, StepDeclaration,
    StepDefinition, StepHandle, StepId, StepLoadingError, StepMatch, StepOrigin, Timing,
    WrapError, global,
};
pub use types::{StepArguments, StepCall, StepError, StepFn, StepHandler};

/// Declare a step for collection by [`Registry::from_inventory`] and
/// [`global`].
///
/// The pattern is given explicitly, taken from the first line of a `doc`
/// string, or derived from the handler's name.
///
/// ```
/// use cress::{StepCall, StepError, step};
///
/// fn i_have_entered_a_number(_: &StepCall<'_>) -> Result<(), StepError> {
///     Ok(())
/// }
/// fn the_result_is(_: &StepCall<'_>) -> Result<(), StepError> {
///     Ok(())
/// }
/// fn press(_: &StepCall<'_>) -> Result<(), StepError> {
///     Ok(())
/// }
///
/// step!(i_have_entered_a_number);
/// step!(r"the result is (\d+)", the_result_is);
/// step!(doc = "I press (add|subtract)\n\nPresses a button.", press);
/// ```
#[macro_export]
macro_rules! step {
    (@declare $pattern:expr, $doc:expr, $handler:path) => {
        const _: () = {
            $crate::submit! {
                $crate::StepDeclaration {
                    pattern: $pattern,
                    doc: $doc,
                    name: stringify!($handler),
                    handler: $handler,
                    file: file!(),
                    line: line!(),
                }
            }
        };
    };
    (doc = $doc:literal, $handler:path $(,)?) => {
        $crate::step!(@declare ::core::option::Option::None, ::core::option::Option::Some($doc), $handler);
    };
    ($pattern:literal, $handler:path $(,)?) => {
        $crate::step!(@declare ::core::option::Option::Some($pattern), ::core::option::Option::None, $handler);
    };
    ($handler:path $(,)?) => {
        $crate::step!(@declare ::core::option::Option::None, ::core::option::Option::None, $handler);
    };
}
