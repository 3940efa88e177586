//! Compiled step patterns.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::types::StepArguments;

/// A step pattern compiled once at registration.
///
/// Patterns are case-insensitive Unicode regular expressions matched by
/// searching anywhere in the sentence. Whether arguments are reported by name
/// or by position is fixed here, from the presence of named groups.
#[derive(Debug, Clone)]
pub struct StepPattern {
    regex: Regex,
    named: bool,
}

impl StepPattern {
    /// Compile `text`.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] when `text` is not a valid expression.
    pub fn new(text: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(text)
            .case_insensitive(true)
            .unicode(true)
            .build()?;
        let named = regex.capture_names().flatten().next().is_some();
        Ok(Self { regex, named })
    }

    /// Pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern reports its arguments by name.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.named
    }

    /// Search `sentence`, returning the captured arguments on success.
    #[must_use]
    pub fn captures(&self, sentence: &str) -> Option<StepArguments> {
        let captures = self.regex.captures(sentence)?;
        let text = |m: Option<regex::Match<'_>>| m.map_or_else(String::new, |m| m.as_str().to_owned());
        let mut arguments = StepArguments::default();
        if self.named {
            arguments.named = self
                .regex
                .capture_names()
                .flatten()
                .map(|name| (name.to_owned(), text(captures.name(name))))
                .collect();
        } else {
            arguments.positional = captures.iter().skip(1).map(text).collect();
        }
        Some(arguments)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile(text: &str) -> StepPattern {
        StepPattern::new(text).unwrap_or_else(|err| panic!("pattern should compile: {err}"))
    }

    #[test]
    fn searches_case_insensitively() {
        let pattern = compile(r"i have (\d+) cukes");
        let arguments = pattern
            .captures("Given I HAVE 42 cukes in my belly")
            .unwrap_or_else(|| panic!("sentence should match"));
        assert_eq!(arguments.positional(), ["42"]);
        assert!(arguments.named().is_empty());
    }

    #[test]
    fn named_groups_suppress_positional_arguments() {
        let pattern = compile(r"(?P<who>\w+) owes (\d+)");
        assert!(pattern.is_named());
        let arguments = pattern
            .captures("Given Ann owes 3")
            .unwrap_or_else(|| panic!("sentence should match"));
        assert!(arguments.positional().is_empty());
        assert_eq!(arguments.by_name("who"), Some("Ann"));
        assert_eq!(arguments.named().len(), 1);
    }

    #[rstest]
    #[case::positional(r"a (x)?b", "a b", &[""][..])]
    #[case::no_groups(r"plain", "a plain step", &[][..])]
    fn missing_groups_are_empty(#[case] text: &str, #[case] sentence: &str, #[case] expected: &[&str]) {
        let arguments = compile(text)
            .captures(sentence)
            .unwrap_or_else(|| panic!("sentence should match"));
        assert_eq!(arguments.positional(), expected);
    }

    #[test]
    fn matches_unicode_case_folding() {
        assert!(compile("ÉTAPE").captures("une étape").is_some());
    }

    #[test]
    fn rejects_invalid_expressions() {
        assert!(StepPattern::new("(unclosed").is_err());
    }
}
