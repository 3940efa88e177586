#![expect(clippy::expect_used, reason = "tests assert on parse results")]
//! Behavioural tests for parsing complete feature documents.

use std::io::Write as _;

use cress_gherkin::{
    BlockId, ParseError, ParseOptions, StepKeyword, SyntaxError, parse_feature,
    parse_feature_file, parse_steps,
};
use rstest::rstest;

fn syntax_error(text: &str) -> SyntaxError {
    match parse_feature(text, &ParseOptions::new()) {
        Err(ParseError::Syntax(err)) => err,
        Err(other) => panic!("expected a syntax error, got {other}"),
        Ok(feature) => panic!("expected a syntax error, parsed '{}'", feature.name()),
    }
}

#[test]
fn parses_the_addition_feature() {
    let feature = parse_feature(
        "Feature: Addition\n\
         Scenario: Add two numbers\n  \
           Given I have entered 2\n  \
           And I have entered 3\n  \
           When I press add\n  \
           Then the result should be 5\n",
        &ParseOptions::new(),
    )
    .expect("addition feature parses");

    assert_eq!(feature.name(), "Addition");
    assert!(feature.background().is_none());
    let [scenario] = feature.scenarios() else {
        panic!("expected exactly one scenario");
    };
    assert_eq!(scenario.name(), "Add two numbers");
    assert_eq!(scenario.steps().len(), 4);
    assert!(scenario.outlines().is_empty());
    assert!(!scenario.is_outline());

    let kinds: Vec<StepKeyword> = scenario.steps().iter().map(|step| step.kind()).collect();
    assert_eq!(
        kinds,
        [
            StepKeyword::Given,
            StepKeyword::And,
            StepKeyword::When,
            StepKeyword::Then
        ]
    );
}

#[test]
fn conjunctions_take_the_phase_of_their_block() {
    let feature = parse_feature(
        "Feature: Phases
           Background:
               * a clean slate
           Scenario: s
               When I act
               And act again
               Then it worked
               But nothing broke
",
        &ParseOptions::new(),
    )
    .expect("phases feature parses");

    let background = feature.background().expect("feature has a background");
    let phases: Vec<StepKeyword> = background.steps().iter().map(|step| step.phase()).collect();
    assert_eq!(phases, [StepKeyword::Given]);

    let [scenario] = feature.scenarios() else {
        panic!("expected exactly one scenario");
    };
    let phases: Vec<StepKeyword> = scenario.steps().iter().map(|step| step.phase()).collect();
    assert_eq!(
        phases,
        [
            StepKeyword::When,
            StepKeyword::When,
            StepKeyword::Then,
            StepKeyword::Then
        ]
    );
}

#[test]
fn rejects_a_second_feature() {
    let err = syntax_error(
        "Feature: One\n  Scenario: a\n    Given x\n\nFeature: Two\n  Scenario: b\n    Given y\n",
    );
    assert!(
        err.message.contains("Expected EOF (max one feature per file)"),
        "{err}"
    );
    assert_eq!(err.location.line(), 5);
    assert_eq!(err.line, "Feature: Two");
}

#[test]
fn ignores_a_byte_order_mark() {
    let feature = parse_feature(
        "\u{feff}Feature: Marked\n  Scenario: s\n    Given x\n",
        &ParseOptions::new(),
    )
    .expect("a leading byte order mark is skipped");
    assert_eq!(feature.name(), "Marked");
}

#[test]
fn tab_after_a_step_keyword_still_starts_a_step() {
    let feature = parse_feature("Feature: f\n  Scenario: s\n    Given\tz\n", &ParseOptions::new())
        .expect("tab-separated step parses");
    let [scenario] = feature.scenarios() else {
        panic!("expected exactly one scenario");
    };
    let [step] = scenario.steps() else {
        panic!("expected exactly one step");
    };
    assert_eq!(step.text(), "z");
}

#[test]
fn rejects_a_tagged_second_feature() {
    let err = syntax_error("Feature: One\n  Scenario: a\n\n@wip\nFeature: Two\n");
    assert_eq!(err.message, "Expected EOF (max one feature per file)");
}

#[rstest]
#[case::nameless_feature("Feature:\n  Scenario: s\n", "Feature must have a name", 1)]
#[case::nameless_scenario("Feature: f\n  Scenario:   \n", "Scenario must have a name", 2)]
#[case::no_scenarios("Feature: f\n  Some prose.\n", "Feature must contain at least one Scenario", 1)]
#[case::table_after_header("Feature: f\n  Scenario: s\n    | a |\n", "table must follow a step", 3)]
#[case::docstring_after_header(
    "Feature: f\n  Scenario: s\n    \"\"\"\n    x\n    \"\"\"\n",
    "multiline string must follow a step",
    3
)]
#[case::text_after_steps("Feature: f\n  Scenario: s\n    Given x\n    stray\n", "unexpected text", 4)]
#[case::ragged_table(
    "Feature: f\n  Scenario: s\n    Given x\n      | a | b |\n      | 1 |\n",
    "inconsistent table row: expected 2 cell(s), found 1",
    5
)]
#[case::examples_without_table(
    "Feature: f\n  Scenario Outline: s\n    Given <a>\n    Examples:\n",
    "Examples must have a table",
    4
)]
#[case::table_and_docstring(
    "Feature: f\n  Scenario: s\n    Given x\n      | a |\n      \"\"\"\n      y\n      \"\"\"\n",
    "a step cannot have both a table and a multiline string",
    5
)]
#[case::late_background(
    "Feature: f\n  Scenario: s\n    Given x\n  Background:\n    Given y\n",
    "Background must come before the first Scenario",
    4
)]
#[case::second_background(
    "Feature: f\n  Background:\n    Given a\n  Background:\n    Given b\n  Scenario: s\n",
    "a Feature can have only one Background",
    4
)]
#[case::tagged_background("Feature: f\n  @tag\n  Background:\n", "tags are not allowed before Background", 2)]
#[case::dangling_tags("Feature: f\n  Scenario: s\n  @orphan\n", "tags must be followed by a Feature, Scenario or Examples", 3)]
#[case::missing_feature("Given x\n", "expected a Feature, found step 'Given'", 1)]
fn reports_structural_errors(#[case] text: &str, #[case] message: &str, #[case] line: usize) {
    let err = syntax_error(text);
    assert_eq!(err.message, message, "{err}");
    assert_eq!(err.location.line(), line, "{err}");
}

#[test]
fn syntax_errors_show_the_offending_line() {
    let err = syntax_error("Feature: f\n  Scenario: s\n    | a |\n");
    assert_eq!(
        err.to_string(),
        "<string>:3:5: table must follow a step\n        | a |"
    );
}

#[test]
fn collects_descriptions_for_every_block() {
    let feature = parse_feature(
        "Feature: f\n  Feature prose.\n  # hidden\n\n  More prose.\n\n  \
         Background:\n    Background prose.\n    Given x\n\n  \
         Scenario Outline: s\n    Scenario prose.\n    Given <a>\n\n    \
         Examples: small\n      Examples prose.\n      | a |\n      | 1 |\n",
        &ParseOptions::new(),
    )
    .expect("descriptions parse");

    let lines = |description: Option<&cress_gherkin::Description>| {
        description.map(|d| d.lines().to_vec()).unwrap_or_default()
    };
    assert_eq!(lines(feature.description()), ["Feature prose.", "More prose."]);
    let background = feature.background().expect("background");
    assert_eq!(lines(background.description()), ["Background prose."]);
    let scenario = feature.scenarios().first().expect("scenario");
    assert_eq!(lines(scenario.description()), ["Scenario prose."]);
    let examples = scenario.examples().first().expect("examples");
    assert_eq!(examples.name(), "small");
    assert_eq!(lines(examples.description()), ["Examples prose."]);
}

#[test]
fn comments_inside_blocks_are_ignored() {
    let feature = parse_feature(
        "# leading comment\nFeature: f\n  Scenario: s\n    # between steps\n    Given x # not a comment\n",
        &ParseOptions::new(),
    )
    .expect("comments parse");
    let step = feature
        .scenarios()
        .first()
        .and_then(|scenario| scenario.steps().first())
        .expect("one step");
    assert_eq!(step.text(), "x # not a comment");
}

#[test]
fn sentences_collapse_whitespace() {
    let steps = parse_steps("Given   I  have\t3 cukes  \n", &ParseOptions::new()).expect("steps");
    let step = steps.first().expect("one step");
    assert_eq!(step.sentence(), "Given I have 3 cukes");
    assert_eq!(step.text(), "I  have\t3 cukes");
    assert_eq!(step.owner(), None);
}

#[test]
fn parse_steps_rejects_block_headers() {
    let Err(ParseError::Syntax(err)) =
        parse_steps("Given x\nScenario: nope\n", &ParseOptions::new())
    else {
        panic!("expected a syntax error");
    };
    assert_eq!(err.message, "expected a step, found 'Scenario:'");
}

#[test]
fn multiline_warnings_are_kept_on_the_feature() {
    let feature = parse_feature(
        "Feature: f\n  Scenario: s\n    Given text\n      \"\"\"\n    short\n        deep\n      \"\"\"\n",
        &ParseOptions::new(),
    )
    .expect("under-indented content still parses");
    let [warning] = feature.warnings() else {
        panic!("expected one warning");
    };
    assert_eq!(warning.location.line(), 5);
    let step = feature
        .scenarios()
        .first()
        .and_then(|scenario| scenario.steps().first())
        .expect("one step");
    assert_eq!(step.multiline(), Some("short\n  deep"));
}

#[test]
fn reads_files_and_attributes_locations() {
    let mut file = tempfile::Builder::new()
        .suffix(".feature")
        .tempfile()
        .expect("temp file");
    write!(file, "Feature: from disk\n  Scenario:\n").expect("write feature");

    let err = parse_feature_file(file.path(), &ParseOptions::new()).expect_err("nameless scenario");
    let syntax = err.as_syntax().expect("syntax error");
    assert_eq!(syntax.location.path(), Some(file.path()));
    assert!(err.to_string().starts_with(&file.path().display().to_string()));
}

#[test]
fn missing_files_report_io_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.feature");
    let err = parse_feature_file(&path, &ParseOptions::new()).expect_err("missing file");
    assert!(matches!(err, ParseError::Io { .. }), "{err}");
}

#[test]
fn scenario_indices_match_owner_ids() {
    let feature = parse_feature(
        "Feature: f\n  Scenario: a\n    Given x\n  Scenario: b\n    Given y\n",
        &ParseOptions::new(),
    )
    .expect("two scenarios");
    for (index, scenario) in feature.scenarios().iter().enumerate() {
        assert_eq!(scenario.index(), index);
        for step in scenario.steps() {
            assert_eq!(step.owner(), Some(BlockId::Scenario(index)));
        }
    }
}
