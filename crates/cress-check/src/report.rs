//! Per-file check results.

use std::path::{Path, PathBuf};

use cress_gherkin::{
    Feature, Node, ParseError, ParseOptions, Record, Scenario, parse_feature_file,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Outcome of checking one feature file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileReport {
    /// The checked file.
    pub path: PathBuf,
    /// Summary of the parsed feature, when parsing succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<FeatureSummary>,
    /// Why parsing failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
    /// Recoverable oddities noticed while parsing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

/// Structure of a parsed feature.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeatureSummary {
    /// Feature name.
    pub name: String,
    /// Code of the language the document was read in.
    pub language: String,
    /// Whether the feature has a background.
    pub background: bool,
    /// Scenarios in document order.
    pub scenarios: Vec<ScenarioSummary>,
}

/// Structure of one scenario.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScenarioSummary {
    /// Keyword as written.
    pub keyword: String,
    /// Scenario name.
    pub name: String,
    /// One-based line of the scenario header.
    pub line: usize,
    /// Tags, including those inherited from the feature.
    pub tags: Vec<String>,
    /// Number of runnable examples.
    pub example_count: usize,
    /// Resolved examples, filled in only when expansion was requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ExampleSummary>,
}

/// One resolved example.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExampleSummary {
    /// Examples row the steps were resolved from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<Row>,
    /// Resolved step sentences.
    pub steps: Vec<String>,
}

/// Examples row that serialises as a map in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(pub Vec<(String, String)>);

impl From<&Record> for Row {
    fn from(record: &Record) -> Self {
        Self(
            record
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        )
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A message tied to an optional source position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// Human-readable description.
    pub message: String,
    /// One-based line, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// One-based column, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// The offending source text, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Why a file failed to parse.
pub type ErrorSummary = Diagnostic;

impl FileReport {
    /// Parse `path` and summarise the outcome.
    ///
    /// With `expand` set every scenario lists its resolved examples.
    #[must_use]
    pub fn check(path: &Path, options: &ParseOptions, expand: bool) -> Self {
        let _span = tracing::debug_span!("check", path = %path.display()).entered();
        match parse_feature_file(path, options) {
            Ok(feature) => {
                tracing::debug!(scenarios = feature.scenarios().len(), "parsed feature");
                Self::parsed(path, &feature, expand)
            }
            Err(error) => {
                tracing::info!(%error, "feature failed to parse");
                Self::failed(path, &error)
            }
        }
    }

    /// Whether the file parsed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn parsed(path: &Path, feature: &Feature, expand: bool) -> Self {
        let scenarios = feature
            .scenario_refs()
            .map(|scenario| {
                summarise_scenario(
                    scenario.scenario(),
                    scenario.tags().into_iter().map(str::to_owned).collect(),
                    expand,
                )
            })
            .collect();
        Self {
            path: path.to_path_buf(),
            feature: Some(FeatureSummary {
                name: feature.name().to_owned(),
                language: feature.language().code().to_owned(),
                background: feature.background().is_some(),
                scenarios,
            }),
            error: None,
            warnings: feature
                .warnings()
                .iter()
                .map(|warning| Diagnostic {
                    message: warning.message.clone(),
                    line: Some(warning.location.line()),
                    column: Some(warning.location.column()),
                    source: Some(warning.line.clone()),
                })
                .collect(),
        }
    }

    fn failed(path: &Path, error: &ParseError) -> Self {
        let diagnostic = match error.as_syntax() {
            Some(syntax) => Diagnostic {
                message: syntax.message.clone(),
                line: Some(syntax.location.line()),
                column: Some(syntax.location.column()),
                source: Some(syntax.line.trim().to_owned()).filter(|line| !line.is_empty()),
            },
            None => Diagnostic {
                message: error.to_string(),
                line: None,
                column: None,
                source: None,
            },
        };
        Self {
            path: path.to_path_buf(),
            feature: None,
            error: Some(diagnostic),
            warnings: Vec::new(),
        }
    }
}

fn summarise_scenario(scenario: &Scenario, tags: Vec<String>, expand: bool) -> ScenarioSummary {
    let evaluated = scenario.evaluated();
    let examples = if expand {
        evaluated
            .iter()
            .map(|example| ExampleSummary {
                row: example.outline.map(Row::from),
                steps: example
                    .steps
                    .iter()
                    .map(|step| step.sentence().to_owned())
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };
    ScenarioSummary {
        keyword: scenario.keyword().to_owned(),
        name: scenario.name().to_owned(),
        line: scenario.location().line(),
        tags,
        example_count: evaluated.len(),
        examples,
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on fixture setup errors")]
mod tests {
    use std::fs;

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    const OUTLINE: &str = "\
@smoke
Feature: Doubling
  Background:
    Given a calculator

  Scenario Outline: Double
    When I double <n>
    Then I see <twice>

    Examples:
      | n | twice |
      | 1 | 2     |
      | 3 | 6     |
";

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("temporary directory")
    }

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).expect("write fixture");
        path
    }

    #[rstest]
    fn summarises_parsed_features(dir: TempDir) {
        let path = write(&dir, "double.feature", OUTLINE);
        let report = FileReport::check(&path, &ParseOptions::new(), false);
        assert!(report.is_ok());
        let feature = report.feature.expect("feature summary");
        assert_eq!(feature.name, "Doubling");
        assert_eq!(feature.language, "en");
        assert!(feature.background);
        let [scenario] = feature.scenarios.as_slice() else {
            panic!("expected one scenario: {:?}", feature.scenarios);
        };
        assert_eq!(scenario.name, "Double");
        assert_eq!(scenario.line, 6);
        assert_eq!(scenario.tags, ["smoke"]);
        assert_eq!(scenario.example_count, 2);
        assert!(scenario.examples.is_empty());
    }

    #[rstest]
    fn expansion_lists_resolved_steps(dir: TempDir) {
        let path = write(&dir, "double.feature", OUTLINE);
        let report = FileReport::check(&path, &ParseOptions::new(), true);
        let feature = report.feature.expect("feature summary");
        let examples: Vec<(Option<Row>, Vec<String>)> = feature
            .scenarios
            .iter()
            .flat_map(|scenario| scenario.examples.iter())
            .map(|example| (example.row.clone(), example.steps.clone()))
            .collect();
        let row = |n: &str, twice: &str| {
            Some(Row(vec![
                ("n".to_owned(), n.to_owned()),
                ("twice".to_owned(), twice.to_owned()),
            ]))
        };
        assert_eq!(
            examples,
            [
                (row("1", "2"), vec!["When I double 1".to_owned(), "Then I see 2".to_owned()]),
                (row("3", "6"), vec!["When I double 3".to_owned(), "Then I see 6".to_owned()]),
            ]
        );
    }

    #[rstest]
    fn syntax_errors_keep_their_position(dir: TempDir) {
        let path = write(&dir, "broken.feature", "Feature: f\n  Scenario: s\n    | a |\n");
        let report = FileReport::check(&path, &ParseOptions::new(), false);
        assert!(!report.is_ok());
        assert_eq!(
            report.error,
            Some(Diagnostic {
                message: "table must follow a step".to_owned(),
                line: Some(3),
                column: Some(5),
                source: Some("| a |".to_owned()),
            })
        );
    }

    #[rstest]
    fn unknown_languages_are_reported_without_position(dir: TempDir) {
        let path = write(&dir, "odd.feature", "Feature: f\n");
        let report = FileReport::check(&path, &ParseOptions::new().with_language("xx"), false);
        let error = report.error.expect("language error");
        assert_eq!(error.message, "unknown language 'xx'");
        assert_eq!(error.line, None);
    }

    #[test]
    fn rows_serialise_in_column_order() {
        let row = Row(vec![
            ("z".to_owned(), "1".to_owned()),
            ("a".to_owned(), "2".to_owned()),
        ]);
        let json = serde_json::to_string(&row).expect("serialises");
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
