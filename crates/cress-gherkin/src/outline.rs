//! Scenario outline resolution.
//!
//! Resolution never mutates the template: every row yields fresh copies of
//! the scenario's steps with `<name>` placeholders replaced from that row.
//! Scenarios without rows yield their own steps, borrowed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::{DocString, Record, Scenario, Step, Table};

/// `<name>` with a non-blank first character; the name is capture group 1.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    // The pattern is a constant covered by the unit tests below.
    Regex::new(r"<([^>\s][^>]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

/// Replace every `<name>` in `text` with the value of `name` in `row`.
///
/// Names missing from the row are left verbatim. Substituted values are not
/// scanned again, so a value containing `<other>` stays as written.
///
/// # Examples
/// ```
/// use cress_gherkin::{Record, substitute};
///
/// let row: Record = [("a", "2"), ("b", "<a>")].into_iter().collect();
/// assert_eq!(substitute("<a> + <b> = <sum>", &row), "2 + <a> = <sum>");
/// ```
#[must_use]
pub fn substitute<'t>(text: &'t str, row: &Record) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        caps.get(1)
            .and_then(|name| row.get(name.as_str()))
            .unwrap_or(whole)
            .to_string()
    })
}

/// Names of every placeholder in `text`, in order of appearance.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|name| name.as_str()))
}

impl Step {
    /// A copy of this step with placeholders in its sentence, body, table
    /// cells and multiline string replaced from `row`.
    ///
    /// The copy keeps the template's owner, location and span.
    #[must_use]
    pub fn resolved(&self, row: &Record) -> Self {
        Self {
            literal: self.literal.clone(),
            kind: self.kind,
            phase: self.phase,
            text: substitute(&self.text, row).into_owned(),
            sentence: substitute(&self.sentence, row).into_owned(),
            table: self.table.as_ref().map(|table| Table {
                rows: table
                    .rows
                    .iter()
                    .map(|cells| {
                        cells
                            .iter()
                            .map(|cell| substitute(cell, row).into_owned())
                            .collect()
                    })
                    .collect(),
                location: table.location.clone(),
                span: table.span,
            }),
            docstring: self.docstring.as_ref().map(|docstring| DocString {
                content: substitute(&docstring.content, row).into_owned(),
                content_type: docstring.content_type.clone(),
                delimiter: docstring.delimiter,
                location: docstring.location.clone(),
                span: docstring.span,
            }),
            owner: self.owner,
            location: self.location.clone(),
            span: self.span,
        }
    }
}

/// One runnable instance of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example<'a> {
    /// Row the steps were resolved from; `None` for plain scenarios.
    pub outline: Option<&'a Record>,
    /// Resolved steps, or the scenario's own steps when there is no row.
    pub steps: Cow<'a, [Step]>,
}

/// Lazy, restartable view over a scenario's examples.
///
/// Obtained from [`Scenario::evaluated`]. Each iteration allocates fresh
/// step copies; the scenario itself is never modified.
#[derive(Debug, Clone, Copy)]
pub struct Evaluated<'a> {
    scenario: &'a Scenario,
}

impl<'a> Evaluated<'a> {
    /// Number of examples the view yields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenario.outlines.len().max(1)
    }

    /// Always `false`: a scenario yields at least one example.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the examples.
    #[must_use]
    pub fn iter(&self) -> EvaluatedIter<'a> {
        EvaluatedIter {
            scenario: self.scenario,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for Evaluated<'a> {
    type Item = Example<'a>;
    type IntoIter = EvaluatedIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Evaluated::iter`].
#[derive(Debug, Clone)]
pub struct EvaluatedIter<'a> {
    scenario: &'a Scenario,
    next: usize,
}

impl<'a> Iterator for EvaluatedIter<'a> {
    type Item = Example<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let scenario = self.scenario;
        let index = self.next;
        if scenario.outlines.is_empty() {
            if index > 0 {
                return None;
            }
            self.next += 1;
            return Some(Example {
                outline: None,
                steps: Cow::Borrowed(scenario.steps.as_slice()),
            });
        }

        let row = scenario.outlines.get(index)?;
        self.next += 1;
        Some(Example {
            outline: Some(row),
            steps: Cow::Owned(scenario.steps.iter().map(|step| step.resolved(row)).collect()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.scenario.outlines.len().max(1);
        let remaining = total.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EvaluatedIter<'_> {}

impl Scenario {
    /// The runnable examples of this scenario.
    ///
    /// Yields one example per outline row, in row order. A scenario without
    /// rows yields exactly one example borrowing its own steps.
    ///
    /// # Examples
    /// ```
    /// use cress_gherkin::{ParseOptions, parse_feature};
    ///
    /// let feature = parse_feature(
    ///     "Feature: f\n  Scenario Outline: o\n    Given <n> cukes\n    Examples:\n      | n |\n      | 1 |\n      | 2 |\n",
    ///     &ParseOptions::new(),
    /// )?;
    /// let sentences: Vec<String> = feature.scenarios()[0]
    ///     .evaluated()
    ///     .into_iter()
    ///     .map(|example| example.steps[0].sentence().to_string())
    ///     .collect();
    /// assert_eq!(sentences, ["Given 1 cukes", "Given 2 cukes"]);
    /// # Ok::<(), cress_gherkin::ParseError>(())
    /// ```
    #[must_use]
    pub const fn evaluated(&self) -> Evaluated<'_> {
        Evaluated { scenario: self }
    }
}
