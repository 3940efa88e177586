#![expect(clippy::expect_used, reason = "tests assert on parse results")]
//! Rendering a parsed feature and parsing it again must not change it.

use cress_gherkin::{Feature, ParseOptions, Step, parse_feature};
use rstest::rstest;

/// The semantic content of a step, without locations.
fn step_shape(step: &Step) -> (String, Option<Vec<Vec<String>>>, Option<(String, Option<String>)>) {
    (
        step.sentence().to_string(),
        step.table().map(|table| table.rows().to_vec()),
        step.docstring().map(|docstring| {
            (
                docstring.content().to_string(),
                docstring.content_type().map(str::to_string),
            )
        }),
    )
}

fn assert_same_content(left: &Feature, right: &Feature) {
    assert_eq!(left.name(), right.name());
    assert_eq!(left.tags(), right.tags());
    assert_eq!(
        left.description().map(|d| d.lines().to_vec()),
        right.description().map(|d| d.lines().to_vec())
    );
    assert_eq!(
        left.background().map(|b| b.steps().iter().map(step_shape).collect::<Vec<_>>()),
        right.background().map(|b| b.steps().iter().map(step_shape).collect::<Vec<_>>())
    );
    assert_eq!(left.scenarios().len(), right.scenarios().len());
    for (l, r) in left.scenarios().iter().zip(right.scenarios()) {
        assert_eq!(l.name(), r.name());
        assert_eq!(l.keyword(), r.keyword());
        assert_eq!(l.tags(), r.tags());
        assert_eq!(l.outlines(), r.outlines());
        assert_eq!(
            l.description().map(|d| d.lines().to_vec()),
            r.description().map(|d| d.lines().to_vec())
        );
        let left_steps: Vec<_> = l.steps().iter().map(step_shape).collect();
        let right_steps: Vec<_> = r.steps().iter().map(step_shape).collect();
        assert_eq!(left_steps, right_steps);
    }
}

const KITCHEN_SINK: &str = r#"# language: en
@billing @slow
Feature: Invoices
  As an accountant
  I want invoices

  Background: seeded
    Given the ledger is empty

  @smoke
  Scenario: Render a table
    Given these customers:
      | name | note          |
      | Ann  | pays \| late  |
      | Bob  | two\nlines    |
    * a bullet step
    But not   this   one

  Scenario Outline: Totals for <who>
    Outline prose.
    Given <who> owes <amount>
    Then the statement reads:
      ```markdown

      # Statement
        indented <amount>

      ```

    @fast
    Examples: small
      | who | amount |
      | Ann | 3      |

    Examples:
      | who | amount |
      | Bob | 40     |
"#;

#[rstest]
#[case::kitchen_sink(KITCHEN_SINK)]
#[case::minimal("Feature: f\nScenario: s\nGiven x\n")]
#[case::french("# language: fr\nFonctionnalité: Panier\n  Scénario: Ajouter\n    Soit un panier vide\n    Et qu'il pleut\n")]
#[case::quotes_in_docstring(
    "Feature: f\n  Scenario: s\n    Given text\n      \"\"\"\n      a \\\"\\\"\\\" b\n      \"\"\"\n"
)]
fn parse_render_parse_is_stable(#[case] source: &str) {
    let options = ParseOptions::new();
    let first = parse_feature(source, &options).expect("source parses");
    let rendered = first.to_string();
    let second = parse_feature(&rendered, &options)
        .unwrap_or_else(|err| panic!("rendered text should parse: {err}\n{rendered}"));
    assert_same_content(&first, &second);
    assert_eq!(second.to_string(), rendered);
}

#[test]
fn renders_canonical_layout() {
    let feature = parse_feature(
        "@a\nFeature:   Layout\nScenario:  s\nGiven  x\n|a|bb|\n|ccc|d|\n",
        &ParseOptions::new(),
    )
    .expect("layout parses");
    assert_eq!(
        feature.to_string(),
        "@a\nFeature: Layout\n\n  Scenario: s\n    Given x\n      | a   | bb |\n      | ccc | d  |\n"
    );
}

#[test]
fn kitchen_sink_keeps_multiline_blank_edges() {
    let feature = parse_feature(KITCHEN_SINK, &ParseOptions::new()).expect("parses");
    let outline = feature.scenarios().get(1).expect("outline");
    let docstring = outline
        .steps()
        .get(1)
        .and_then(Step::docstring)
        .expect("docstring");
    assert_eq!(docstring.content(), "# Statement\n  indented <amount>");
    assert_eq!(docstring.content_type(), Some("markdown"));
}
