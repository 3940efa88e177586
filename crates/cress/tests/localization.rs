//! Localisation behaviour of runtime diagnostics.
#![expect(clippy::expect_used, reason = "tests fail loudly on unexpected setup errors")]

use cress::localization::{current_languages, select_localizations};
use cress::{
    ExecutionError, HookOptions, Registry, ScopedLocalization, Scope, StepCall, StepError,
    examples,
};
use cress_gherkin::{Node, ParseOptions, parse_feature};
use rstest::rstest;
use serial_test::serial;
use unic_langid::langid;

fn missing_step_error() -> ExecutionError {
    let feature = parse_feature("Feature: f\n  Scenario: s\n    Given nothing\n", &ParseOptions::new())
        .expect("feature should parse");
    let run = examples(&feature).next().expect("one example");
    run.run(&Registry::new()).expect_err("no steps are registered")
}

#[rstest]
#[case::english(langid!("en-US"), ": no step definition matches 'Given nothing'")]
#[case::french(langid!("fr"), " : aucune définition d'étape ne correspond à « Given nothing »")]
fn missing_steps_render_in_the_scoped_language(
    #[case] language: unic_langid::LanguageIdentifier,
    #[case] expected: &str,
) {
    let _guard = ScopedLocalization::new(&[language]).expect("bundle should load");
    let error = missing_step_error();
    let location = error.step().expect("missing steps carry their step").location();
    assert_eq!(location.line(), 3);
    assert_eq!(error.to_string(), format!("{location}{expected}"));
}

#[test]
#[serial]
fn scoped_localization_is_restored_on_drop() {
    let error = StepError::Panicked {
        message: "boom".to_owned(),
    };
    {
        let _guard = ScopedLocalization::new(&[langid!("fr")]).expect("bundle should load");
        assert_eq!(error.to_string(), "l'étape a paniqué : boom");
        {
            let _inner = ScopedLocalization::new(&[langid!("en-US")]).expect("bundle should load");
            assert_eq!(error.to_string(), "step panicked: boom");
        }
        assert_eq!(error.to_string(), "l'étape a paniqué : boom");
    }
    assert_eq!(error.to_string(), "step panicked: boom");
}

#[test]
fn scoped_loaders_fall_back_to_english() {
    let _guard = ScopedLocalization::new(&[langid!("fr")]).expect("bundle should load");
    let languages = current_languages().expect("languages should be readable");
    assert_eq!(languages.first(), Some(&langid!("fr")));
    assert!(languages.contains(&langid!("en-US")));
}

#[test]
#[serial]
fn hook_failures_render_in_english_by_default() {
    let feature = parse_feature("Feature: f\n  Scenario: s\n    Given ready\n", &ParseOptions::new())
        .expect("feature should parse");
    let mut registry = Registry::new();
    registry
        .register_step(Some("ready"), |_: &StepCall<'_>| Ok(()))
        .expect("pattern should register");
    registry.before(Scope::Example, HookOptions::new().named("gate"), |_| {
        Err(cress::HookError::new("closed"))
    });
    let run = examples(&feature).next().expect("one example");
    let error = run.run(&registry).expect_err("the hook fails");
    assert_eq!(error.to_string(), "before example hook 'gate' failed: closed");
}

#[test]
#[serial]
fn process_wide_selection_applies_without_a_scope() {
    let selected = select_localizations(&[langid!("fr")]).expect("french should load");
    assert_eq!(selected.first(), Some(&langid!("fr")));
    let error = StepError::Panicked {
        message: "boom".to_owned(),
    };
    let rendered = error.to_string();
    select_localizations(&[langid!("en-US")]).expect("english should load");
    assert_eq!(rendered, "l'étape a paniqué : boom");
    assert_eq!(error.to_string(), "step panicked: boom");
}
