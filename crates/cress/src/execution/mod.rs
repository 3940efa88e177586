//! Running resolved examples against a registry.
//!
//! [`examples`] flattens a feature into one [`ExampleRun`] per scenario and
//! examples row, in document order. Running an example wraps it in the
//! `Example` hooks, its background in the `Background` hooks and every step
//! in the `Step` hooks. Handler panics are caught and reported as
//! [`StepError::Panicked`].

mod error;

use std::borrow::Cow;

use cress_gherkin::{Feature, Record, ScenarioRef, Step};

pub use error::ExecutionError;

use crate::panic_support;
use crate::registry::{HookTarget, Registry, Scope, StepMatch};
use crate::types::{StepCall, StepError};

/// One example of one scenario, ready to run.
#[derive(Debug, Clone)]
pub struct ExampleRun<'a> {
    scenario: ScenarioRef<'a>,
    outline: Option<&'a Record>,
    steps: Cow<'a, [Step]>,
}

/// Every example of `feature`, scenario by scenario and row by row.
///
/// # Examples
/// ```
/// use cress::examples;
/// use cress_gherkin::{ParseOptions, parse_feature};
///
/// let feature = parse_feature(
///     "Feature: f\n  Scenario Outline: s\n    Given <n>\n    Examples:\n      | n |\n      | 1 |\n      | 2 |\n",
///     &ParseOptions::new(),
/// )?;
/// let sentences: Vec<String> = examples(&feature)
///     .map(|run| run.steps()[0].sentence().to_owned())
///     .collect();
/// assert_eq!(sentences, ["Given 1", "Given 2"]);
/// # Ok::<(), cress_gherkin::ParseError>(())
/// ```
pub fn examples(feature: &Feature) -> impl Iterator<Item = ExampleRun<'_>> {
    feature.scenario_refs().flat_map(|scenario| {
        scenario
            .scenario()
            .evaluated()
            .into_iter()
            .map(move |example| ExampleRun {
                scenario,
                outline: example.outline,
                steps: example.steps,
            })
    })
}

impl<'a> ExampleRun<'a> {
    /// Feature the example belongs to.
    #[must_use]
    pub const fn feature(&self) -> &'a Feature {
        self.scenario.feature()
    }

    /// Scenario the example was resolved from.
    #[must_use]
    pub const fn scenario(&self) -> ScenarioRef<'a> {
        self.scenario
    }

    /// Examples row, for outlines.
    #[must_use]
    pub const fn outline(&self) -> Option<&'a Record> {
        self.outline
    }

    /// Resolved scenario steps, without the background.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the background and the steps.
    ///
    /// # Errors
    ///
    /// Returns the first failure: a missing definition, a failing handler or
    /// a failing hook.
    pub fn run(&self, registry: &Registry) -> Result<(), ExecutionError> {
        let target = HookTarget::Example {
            scenario: self.scenario,
            outline: self.outline,
        };
        let example = registry.wrap(Scope::Example, |_| -> Result<(), ExecutionError> {
            if let Some(background) = self.feature().background() {
                let wrapped = registry.wrap(Scope::Background, |_| {
                    self.run_steps(registry, background.steps())
                });
                wrapped(&HookTarget::Background(background))?;
            }
            self.run_steps(registry, &self.steps)
        });
        Ok(example(&target)?)
    }

    fn run_steps(&self, registry: &Registry, steps: &[Step]) -> Result<(), ExecutionError> {
        for (index, step) in steps.iter().enumerate() {
            let matched = resolve_step(registry, index, step)?;
            let wrapped = registry.wrap(Scope::Step, |_| {
                invoke(&matched, step, self.outline).map_err(|error| {
                    ExecutionError::HandlerFailed {
                        index,
                        step: Box::new(step.clone()),
                        pattern: matched.definition().pattern().as_str().to_owned(),
                        error,
                    }
                })
            });
            wrapped(&HookTarget::Step(step))?;
        }
        Ok(())
    }
}

fn resolve_step(registry: &Registry, index: usize, step: &Step) -> Result<StepMatch, ExecutionError> {
    registry.match_step(step).map_err(|missing| {
        log::debug!("{missing}");
        ExecutionError::StepNotFound {
            index,
            step: Box::new(step.clone()),
        }
    })
}

fn invoke(matched: &StepMatch, step: &Step, outline: Option<&Record>) -> Result<(), StepError> {
    let call = StepCall::new(step, matched.arguments(), outline);
    let handler = matched.definition().handler();
    panic_support::catch(|| handler(&call))
        .unwrap_or_else(|message| Err(StepError::Panicked { message }))
}

/// Outcome of one example within [`run_feature`].
pub type ExampleOutcome<'a> = (ExampleRun<'a>, Result<(), ExecutionError>);

/// Run every example of `feature` inside the `Feature` hooks.
///
/// A failing example does not stop the others.
///
/// # Errors
///
/// Returns [`ExecutionError::HookFailed`] when a feature-level hook fails.
/// Example outcomes gathered before the failure are discarded.
pub fn run_feature<'a>(
    registry: &Registry,
    feature: &'a Feature,
) -> Result<Vec<ExampleOutcome<'a>>, ExecutionError> {
    let wrapped = registry.wrap(Scope::Feature, |_| {
        Ok::<_, ExecutionError>(
            examples(feature)
                .map(|run| {
                    let outcome = run.run(registry);
                    (run, outcome)
                })
                .collect::<Vec<_>>(),
        )
    });
    Ok(wrapped(&HookTarget::Feature(feature))?)
}
