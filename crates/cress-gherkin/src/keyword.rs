//! Semantic step keywords.
//!
//! Every language maps its literal step keywords ("Given ", "Soit ", "前提")
//! onto one [`StepKeyword`], so the rest of the engine can reason about steps
//! without caring which language a document was written in.

use std::fmt;

/// Language-independent meaning of a step keyword.
///
/// `And`, `But` and `*` carry no phase of their own; [`resolve`](Self::resolve)
/// maps them onto the phase they continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Expected outcome.
    Then,
    /// Continues the current phase.
    And,
    /// Continues the current phase with a contrast.
    But,
    /// Bullet step.
    Star,
}

impl StepKeyword {
    /// Return the canonical English name of the keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use cress_gherkin::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::Star.as_str(), "*");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
            Self::Star => "*",
        }
    }

    /// Whether the keyword continues the previous step rather than starting a
    /// new phase.
    #[must_use]
    pub const fn is_conjunction(&self) -> bool {
        matches!(self, Self::And | Self::But | Self::Star)
    }

    /// The phase a step with this keyword belongs to.
    ///
    /// Conjunctions take the phase held in `prev`, or `Given` when no phase
    /// has started. `Given`, `When` and `Then` start a new phase and store it
    /// in `prev`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cress_gherkin::StepKeyword;
    ///
    /// let mut prev = Some(StepKeyword::Given);
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), StepKeyword::Given);
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), StepKeyword::When);
    /// assert_eq!(prev, Some(StepKeyword::When));
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            prev.as_ref().copied().unwrap_or(Self::Given)
        } else {
            *prev = Some(self);
            self
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
