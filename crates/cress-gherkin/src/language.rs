//! Keyword tables for the bundled languages.
//!
//! Each language is described by a JSON file under `languages/`, embedded in
//! the binary at build time. Definitions are decoded once per code and cached
//! for the lifetime of the process. Keyword candidates are kept sorted
//! longest-first so that "Scenario Outline" is always tried before "Scenario"
//! and "Sachant qu'" before "Sachant ".

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::errors::LanguageError;
use crate::keyword::StepKeyword;

/// Code of the language used when a document does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(RustEmbed)]
#[folder = "languages"]
struct Definitions;

#[derive(Debug, Deserialize)]
struct LanguageDefinition {
    name: String,
    native: String,
    #[serde(default)]
    alias_of: Option<String>,
    #[serde(default)]
    feature: Vec<String>,
    #[serde(default)]
    background: Vec<String>,
    #[serde(default)]
    scenario: Vec<String>,
    #[serde(default)]
    scenario_outline: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    given: Vec<String>,
    #[serde(default)]
    when: Vec<String>,
    #[serde(default)]
    then: Vec<String>,
    #[serde(default)]
    and: Vec<String>,
    #[serde(default)]
    but: Vec<String>,
}

impl LanguageDefinition {
    fn has_keywords(&self) -> bool {
        !self.feature.is_empty() && !self.scenario.is_empty() && !self.given.is_empty()
    }
}

/// Grammar role a keyword literal can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `Feature`.
    Feature,
    /// `Background`.
    Background,
    /// `Scenario` and `Scenario Outline`.
    Scenario,
    /// `Examples`.
    Examples,
    /// Step keywords: `Given`, `When`, `Then`, `And`, `But`, `*`.
    Statement,
}

/// Kind of block introduced by a `Keyword: name` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A feature header.
    Feature,
    /// A background header.
    Background,
    /// A plain scenario header.
    Scenario,
    /// A scenario outline header.
    ScenarioOutline,
    /// An examples header.
    Examples,
}

impl BlockKind {
    /// The keyword slot this block kind belongs to.
    #[must_use]
    pub const fn slot(self) -> Slot {
        match self {
            Self::Feature => Slot::Feature,
            Self::Background => Slot::Background,
            Self::Scenario | Self::ScenarioOutline => Slot::Scenario,
            Self::Examples => Slot::Examples,
        }
    }
}

#[derive(Debug, Clone)]
struct BlockKeyword {
    literal: String,
    kind: BlockKind,
}

#[derive(Debug, Clone)]
struct StatementKeyword {
    literal: String,
    keyword: StepKeyword,
}

/// A line recognised as a block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLine<'l, 't> {
    /// What the header introduces.
    pub kind: BlockKind,
    /// The keyword literal as declared by the language.
    pub keyword: &'l str,
    /// Trimmed text after the colon.
    pub name: &'t str,
}

/// A line recognised as a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementLine<'l, 't> {
    /// Semantic keyword.
    pub keyword: StepKeyword,
    /// The keyword literal as declared by the language, including any
    /// trailing space.
    pub literal: &'l str,
    /// Trimmed step body.
    pub text: &'t str,
}

/// Keyword set for one language.
#[derive(Debug)]
pub struct Language {
    code: String,
    name: String,
    native: String,
    blocks: Vec<BlockKeyword>,
    statements: Vec<StatementKeyword>,
}

static CACHE: LazyLock<RwLock<HashMap<String, Arc<Language>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn normalise_code(code: &str) -> String {
    code.trim().replace('_', "-").to_ascii_lowercase()
}

fn read_definition(code: &str) -> Result<LanguageDefinition, LanguageError> {
    let file = Definitions::get(&format!("{code}.json")).ok_or_else(|| LanguageError::Unknown {
        code: code.to_string(),
    })?;
    serde_json::from_slice(&file.data).map_err(|source| LanguageError::Malformed {
        code: code.to_string(),
        source,
    })
}

fn sort_longest_first<T>(items: &mut [T], literal: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        literal(b)
            .chars()
            .count()
            .cmp(&literal(a).chars().count())
    });
}

impl Language {
    /// Load (or fetch from the cache) the keyword set for `code`.
    ///
    /// Codes are case-insensitive and accept `_` in place of `-`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Unknown`] when no definition is bundled for
    /// `code`.
    ///
    /// # Examples
    /// ```
    /// use cress_gherkin::Language;
    ///
    /// let french = Language::load("fr").expect("French is bundled");
    /// assert_eq!(french.name(), "French");
    /// assert!(Language::load("xx").is_err());
    /// ```
    pub fn load(code: &str) -> Result<Arc<Self>, LanguageError> {
        let code = normalise_code(code);
        if let Some(language) = CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&code)
        {
            return Ok(Arc::clone(language));
        }

        let language = Arc::new(Self::build(&code)?);
        let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
        let cached = cache
            .entry(code)
            .or_insert_with(|| Arc::clone(&language));
        Ok(Arc::clone(cached))
    }

    /// Load the default (English) keyword set.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled English definition is damaged.
    pub fn english() -> Result<Arc<Self>, LanguageError> {
        Self::load(DEFAULT_LANGUAGE)
    }

    fn build(code: &str) -> Result<Self, LanguageError> {
        let definition = read_definition(code)?;
        let aliased = match definition.alias_of.as_deref() {
            Some(target) => {
                let target_definition = read_definition(target).map_err(|err| match err {
                    LanguageError::Unknown { .. } => LanguageError::BrokenAlias {
                        code: code.to_string(),
                        target: target.to_string(),
                    },
                    other => other,
                })?;
                if target_definition.alias_of.is_some() || !target_definition.has_keywords() {
                    return Err(LanguageError::BrokenAlias {
                        code: code.to_string(),
                        target: target.to_string(),
                    });
                }
                log::debug!("language '{code}' resolves keywords from '{target}'");
                Some(target_definition)
            }
            None => None,
        };
        let keywords = aliased.as_ref().unwrap_or(&definition);

        let mut blocks = Vec::new();
        for (literals, kind) in [
            (&keywords.feature, BlockKind::Feature),
            (&keywords.background, BlockKind::Background),
            (&keywords.scenario_outline, BlockKind::ScenarioOutline),
            (&keywords.scenario, BlockKind::Scenario),
            (&keywords.examples, BlockKind::Examples),
        ] {
            blocks.extend(literals.iter().map(|literal| BlockKeyword {
                literal: literal.trim().to_string(),
                kind,
            }));
        }
        sort_longest_first(&mut blocks, |keyword| keyword.literal.as_str());

        let mut statements: Vec<StatementKeyword> = Vec::new();
        for (literals, keyword) in [
            (&keywords.given, StepKeyword::Given),
            (&keywords.when, StepKeyword::When),
            (&keywords.then, StepKeyword::Then),
            (&keywords.and, StepKeyword::And),
            (&keywords.but, StepKeyword::But),
        ] {
            for literal in literals {
                if statements.iter().any(|known| &known.literal == literal) {
                    continue;
                }
                let keyword = if literal.trim() == "*" {
                    StepKeyword::Star
                } else {
                    keyword
                };
                statements.push(StatementKeyword {
                    literal: literal.clone(),
                    keyword,
                });
            }
        }
        sort_longest_first(&mut statements, |keyword| keyword.literal.as_str());

        Ok(Self {
            code: code.to_string(),
            name: definition.name,
            native: definition.native,
            blocks,
            statements,
        })
    }

    /// Language code, as normalised when loading.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// English display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name in the language itself.
    #[must_use]
    pub fn native(&self) -> &str {
        &self.native
    }

    /// Keyword literals for `slot`, longest first.
    ///
    /// # Examples
    /// ```
    /// use cress_gherkin::{Language, Slot};
    ///
    /// let english = Language::english().expect("English is bundled");
    /// let scenario = english.keywords(Slot::Scenario);
    /// assert_eq!(scenario.first().copied(), Some("Scenario Template"));
    /// assert_eq!(scenario.last().copied(), Some("Example"));
    /// ```
    #[must_use]
    pub fn keywords(&self, slot: Slot) -> Vec<&str> {
        match slot {
            Slot::Statement => self
                .statements
                .iter()
                .map(|keyword| keyword.literal.as_str())
                .collect(),
            _ => self
                .blocks
                .iter()
                .filter(|keyword| keyword.kind.slot() == slot)
                .map(|keyword| keyword.literal.as_str())
                .collect(),
        }
    }

    /// Regular-expression alternation matching any keyword of `slot`.
    ///
    /// Candidates appear longest first so that a leftmost-first regex engine
    /// never settles on a shorter keyword sharing a prefix with a longer one.
    #[must_use]
    pub fn alternation(&self, slot: Slot) -> String {
        let candidates: Vec<String> = self
            .keywords(slot)
            .into_iter()
            .map(regex::escape)
            .collect();
        format!("(?:{})", candidates.join("|"))
    }

    /// Recognise a block header such as `Scenario Outline: adding`.
    ///
    /// `line` must already have its indentation removed. Candidates from every
    /// block slot are tried together, longest first.
    #[must_use]
    pub fn match_block<'t>(&self, line: &'t str) -> Option<BlockLine<'_, 't>> {
        self.blocks.iter().find_map(|keyword| {
            let rest = line.strip_prefix(keyword.literal.as_str())?;
            let name = rest.trim_start().strip_prefix(':')?;
            Some(BlockLine {
                kind: keyword.kind,
                keyword: keyword.literal.as_str(),
                name: name.trim(),
            })
        })
    }

    /// Recognise a step line such as `Given I have 3 cukes`.
    ///
    /// `line` must already have its indentation removed. A keyword declared
    /// with a trailing space accepts any whitespace after it. A keyword with
    /// no body is not a step.
    #[must_use]
    pub fn match_statement<'t>(&self, line: &'t str) -> Option<StatementLine<'_, 't>> {
        self.statements.iter().find_map(|keyword| {
            let word = keyword.literal.trim_end();
            let rest = line.strip_prefix(word)?;
            if word.len() < keyword.literal.len() && !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let text = rest.trim();
            if text.is_empty() {
                return None;
            }
            Some(StatementLine {
                keyword: keyword.keyword,
                literal: keyword.literal.as_str(),
                text,
            })
        })
    }
}

/// Codes of every bundled language, sorted.
#[must_use]
pub fn available_languages() -> Vec<String> {
    let mut codes: Vec<String> = Definitions::iter()
        .filter_map(|file| file.strip_suffix(".json").map(str::to_string))
        .collect();
    codes.sort();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn load(code: &str) -> Arc<Language> {
        Language::load(code).unwrap_or_else(|err| panic!("failed to load '{code}': {err}"))
    }

    #[test]
    fn scenario_outline_is_tried_before_scenario() {
        let english = load("en");
        let keywords = english.keywords(Slot::Scenario);
        let outline = keywords.iter().position(|k| *k == "Scenario Outline");
        let plain = keywords.iter().position(|k| *k == "Scenario");
        assert!(outline < plain, "unexpected order: {keywords:?}");
    }

    #[rstest]
    #[case("Feature: Addition", BlockKind::Feature, "Addition")]
    #[case("Scenario Outline: eating", BlockKind::ScenarioOutline, "eating")]
    #[case("Scenario: plain", BlockKind::Scenario, "plain")]
    #[case("Scenario :spaced", BlockKind::Scenario, "spaced")]
    #[case("Examples:", BlockKind::Examples, "")]
    #[case("Background: setup ", BlockKind::Background, "setup")]
    fn recognises_english_blocks(
        #[case] line: &str,
        #[case] kind: BlockKind,
        #[case] name: &str,
    ) {
        let english = load("en");
        let Some(block) = english.match_block(line) else {
            panic!("'{line}' should be a block header");
        };
        assert_eq!(block.kind, kind);
        assert_eq!(block.name, name);
    }

    #[test]
    fn keyword_without_colon_is_not_a_block() {
        let english = load("en");
        assert!(english.match_block("Scenario outlines are handy").is_none());
    }

    #[rstest]
    #[case("Sachant qu'il pleut", StepKeyword::Given, "il pleut")]
    #[case("Et que je mange", StepKeyword::And, "je mange")]
    #[case("Et je bois", StepKeyword::And, "je bois")]
    #[case("Étant donné que j'ai faim", StepKeyword::Given, "j'ai faim")]
    #[case("* une puce", StepKeyword::Star, "une puce")]
    fn prefers_longest_french_statement(
        #[case] line: &str,
        #[case] keyword: StepKeyword,
        #[case] text: &str,
    ) {
        let french = load("fr");
        let Some(statement) = french.match_statement(line) else {
            panic!("'{line}' should be a step");
        };
        assert_eq!(statement.keyword, keyword);
        assert_eq!(statement.text, text);
    }

    #[test]
    fn portuguese_background_is_not_shadowed_by_scenario() {
        let portuguese = load("pt");
        let Some(block) = portuguese.match_block("Cenário de Fundo: preparação") else {
            panic!("expected a background header");
        };
        assert_eq!(block.kind, BlockKind::Background);
    }

    #[test]
    fn brazilian_alias_shares_keywords_but_not_names() {
        let portuguese = load("pt");
        let brazilian = load("pt-BR");
        assert_eq!(brazilian.code(), "pt-br");
        assert_eq!(
            brazilian.keywords(Slot::Statement),
            portuguese.keywords(Slot::Statement)
        );
        assert_eq!(
            brazilian.keywords(Slot::Feature),
            portuguese.keywords(Slot::Feature)
        );
        assert_eq!(portuguese.name(), "Portuguese");
        assert_ne!(brazilian.name(), portuguese.name());
        assert_ne!(brazilian.native(), portuguese.native());
    }

    #[rstest]
    #[case::tab("Given\tz", Some("z"))]
    #[case::several_spaces("Then   it works", Some("it works"))]
    #[case::glued("Givenz", None)]
    fn spaced_keywords_accept_any_whitespace(#[case] line: &str, #[case] text: Option<&str>) {
        let english = load("en");
        assert_eq!(english.match_statement(line).map(|statement| statement.text), text);
    }

    #[test]
    fn japanese_keywords_need_no_space() {
        let japanese = load("ja");
        let Some(statement) = japanese.match_statement("前提ユーザーがいる") else {
            panic!("expected a step");
        };
        assert_eq!(statement.keyword, StepKeyword::Given);
        assert_eq!(statement.text, "ユーザーがいる");
    }

    #[test]
    fn unknown_language_is_reported() {
        let Err(err) = Language::load("tlh") else {
            panic!("Klingon is not bundled");
        };
        assert!(matches!(err, LanguageError::Unknown { ref code } if code == "tlh"));
    }

    #[test]
    fn loads_are_cached() {
        let first = load("de");
        let second = load("DE");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn alternation_escapes_and_orders() {
        let english = load("en");
        let alternation = english.alternation(Slot::Scenario);
        assert!(alternation.starts_with("(?:Scenario Template|Scenario Outline|"));
        let statements = english.alternation(Slot::Statement);
        assert!(statements.contains(r"\* "), "{statements}");
    }

    #[test]
    fn lists_bundled_languages() {
        let codes = available_languages();
        for expected in ["de", "en", "es", "fr", "ja", "pt", "pt-br", "ru"] {
            assert!(codes.iter().any(|code| code == expected), "{codes:?}");
        }
    }
}
