//! Line-oriented tokeniser for feature documents.
//!
//! Every physical line is classified exactly once: blank lines and whole-line
//! comments are dropped, multiline strings swallow every line up to their
//! closing delimiter, and everything else becomes one [`Token`]. Keyword
//! recognition is delegated to the active [`Language`].

mod docstring;
pub(crate) mod table;

use std::path::Path;
use std::sync::Arc;

use crate::errors::{ParseWarning, SyntaxError};
use crate::keyword::StepKeyword;
use crate::language::{BlockKind, Language};
use crate::location::{Location, Span};
use crate::model::DocStringDelimiter;

use self::docstring::Dedent;

/// Classified content of one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// One or more `@tag` names, without the `@`.
    Tags(Vec<String>),
    /// A `Keyword: name` header.
    Block {
        kind: BlockKind,
        keyword: String,
        name: String,
    },
    /// A step line.
    Step {
        keyword: StepKeyword,
        literal: String,
        text: String,
    },
    /// A table row, already split into cells.
    Row(Vec<String>),
    /// A complete multiline string.
    DocString {
        delimiter: DocStringDelimiter,
        content_type: Option<String>,
        content: String,
    },
    /// Any other non-blank line.
    Text(String),
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Tags(_) => "tags".to_string(),
            Self::Block { keyword, .. } => format!("'{keyword}:'"),
            Self::Step { literal, .. } => format!("step '{}'", literal.trim()),
            Self::Row(_) => "table row".to_string(),
            Self::DocString { .. } => "multiline string".to_string(),
            Self::Text(_) => "text".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) location: Location,
    pub(crate) span: Span,
    /// Raw source line that opened the token.
    pub(crate) line: String,
}

impl Token {
    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.location.clone(), message, self.line.clone())
    }
}

/// Tokens and recoverable warnings for one document.
#[derive(Debug, Default)]
pub(crate) struct Lexed {
    pub(crate) tokens: Vec<Token>,
    pub(crate) warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
}

impl<'a> SourceLine<'a> {
    fn content(&self) -> &'a str {
        self.text.trim()
    }

    fn indent_len(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }

    fn indent_chars(&self) -> usize {
        self.text.chars().take_while(|ch| ch.is_whitespace()).count()
    }

    fn start(&self) -> usize {
        self.offset + self.indent_len()
    }

    fn end(&self) -> usize {
        self.offset + self.text.trim_end().len()
    }
}

fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut offset = 0;
    let mut lines = Vec::new();
    for (index, raw) in source.split('\n').enumerate() {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(SourceLine {
            number: index + 1,
            offset,
            text,
        });
        offset += raw.len() + 1;
    }
    lines
}

/// Return the code named by a `# language: xx` header.
///
/// Only the first non-blank line is considered.
///
/// # Examples
/// ```
/// use cress_gherkin::declared_language;
///
/// assert_eq!(declared_language("\n# language: fr\nFonctionnalité: x"), Some("fr"));
/// assert_eq!(declared_language("Feature: x\n# language: fr"), None);
/// ```
#[must_use]
pub fn declared_language(source: &str) -> Option<&str> {
    let first = source.lines().map(str::trim).find(|line| !line.is_empty())?;
    let code = first
        .strip_prefix('#')?
        .trim_start()
        .strip_prefix("language")?
        .trim_start()
        .strip_prefix(':')?
        .trim();
    (!code.is_empty()).then_some(code)
}

struct Lexer<'a> {
    lines: Vec<SourceLine<'a>>,
    pos: usize,
    language: &'a Language,
    path: Option<Arc<Path>>,
    warnings: Vec<ParseWarning>,
}

/// Split `source` into tokens using the keywords of `language`.
///
/// # Errors
///
/// Returns a [`SyntaxError`] for malformed table rows, invalid tags, or an
/// unterminated multiline string.
pub(crate) fn tokenize(
    source: &str,
    language: &Language,
    path: Option<Arc<Path>>,
) -> Result<Lexed, SyntaxError> {
    let mut lexer = Lexer {
        lines: split_lines(source),
        pos: 0,
        language,
        path,
        warnings: Vec::new(),
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(Lexed {
        tokens,
        warnings: lexer.warnings,
    })
}

impl<'a> Lexer<'a> {
    fn location(&self, line: SourceLine<'_>, column: usize) -> Location {
        Location::new(self.path.clone(), line.number, column)
    }

    fn error(&self, line: SourceLine<'_>, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(
            self.location(line, line.indent_chars() + 1),
            message,
            line.text,
        )
    }

    fn token(&self, line: SourceLine<'_>, kind: TokenKind) -> Token {
        Token {
            kind,
            location: self.location(line, line.indent_chars() + 1),
            span: Span::new(line.start(), line.end()),
            line: line.text.to_string(),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        while let Some(line) = self.lines.get(self.pos).copied() {
            self.pos += 1;
            let content = line.content();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            if let Some(delimiter) = DocStringDelimiter::opening(content) {
                return self.docstring(line, delimiter).map(Some);
            }
            let kind = self.classify(line, content)?;
            return Ok(Some(self.token(line, kind)));
        }
        Ok(None)
    }

    fn classify(&self, line: SourceLine<'_>, content: &str) -> Result<TokenKind, SyntaxError> {
        if content.starts_with('|') {
            let cells = table::split_row(content).map_err(|message| self.error(line, message))?;
            return Ok(TokenKind::Row(cells));
        }
        if content.starts_with('@') {
            let tags = split_tags(content).map_err(|message| self.error(line, message))?;
            return Ok(TokenKind::Tags(tags));
        }
        if let Some(block) = self.language.match_block(content) {
            return Ok(TokenKind::Block {
                kind: block.kind,
                keyword: block.keyword.to_string(),
                name: block.name.to_string(),
            });
        }
        if let Some(statement) = self.language.match_statement(content) {
            return Ok(TokenKind::Step {
                keyword: statement.keyword,
                literal: statement.literal.to_string(),
                text: statement.text.to_string(),
            });
        }
        Ok(TokenKind::Text(content.to_string()))
    }

    fn docstring(
        &mut self,
        open: SourceLine<'a>,
        delimiter: DocStringDelimiter,
    ) -> Result<Token, SyntaxError> {
        let indent = open.indent_chars();
        let content_type = open
            .content()
            .get(delimiter.as_str().len()..)
            .map(str::trim)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);

        let mut body = Vec::new();
        let close = loop {
            let Some(line) = self.lines.get(self.pos).copied() else {
                return Err(self.error(open, "unterminated multiline string"));
            };
            self.pos += 1;
            if line.content() == delimiter.as_str() {
                break line;
            }
            let text = match docstring::dedent(line.text, indent) {
                Dedent::Exact(text) => text,
                Dedent::Short(text) => {
                    self.warn(line, text);
                    text
                }
            };
            body.push(docstring::unescape(text, delimiter));
        };

        Ok(Token {
            kind: TokenKind::DocString {
                delimiter,
                content_type,
                content: docstring::assemble(body),
            },
            location: self.location(open, indent + 1),
            span: Span::new(open.start(), close.end()),
            line: open.text.to_string(),
        })
    }

    fn warn(&mut self, line: SourceLine<'_>, kept: &str) {
        let warning = ParseWarning {
            location: self.location(line, line.indent_chars() + 1),
            message: "multiline string line is indented less than its opening delimiter"
                .to_string(),
            line: kept.to_string(),
        };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

fn split_tags(content: &str) -> Result<Vec<String>, String> {
    let mut tags: Vec<String> = Vec::new();
    for word in content.split_whitespace() {
        if word.starts_with('#') {
            break;
        }
        let Some(name) = word.strip_prefix('@').filter(|name| !name.is_empty()) else {
            return Err(format!("invalid tag '{word}'"));
        };
        if !tags.iter().any(|tag| tag == name) {
            tags.push(name.to_string());
        }
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Lexed {
        let english = Language::english().unwrap_or_else(|err| panic!("{err}"));
        tokenize(source, &english, None).unwrap_or_else(|err| panic!("{err}"))
    }

    fn lex_err(source: &str) -> SyntaxError {
        let english = Language::english().unwrap_or_else(|err| panic!("{err}"));
        let Err(err) = tokenize(source, &english, None) else {
            panic!("expected a syntax error for {source:?}");
        };
        err
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let kinds = kinds("# comment\n\n   # indented comment\nFeature: x\n");
        assert_eq!(
            kinds,
            vec![TokenKind::Block {
                kind: BlockKind::Feature,
                keyword: "Feature".to_string(),
                name: "x".to_string(),
            }]
        );
    }

    #[test]
    fn hash_inside_a_line_is_text() {
        let kinds = kinds("Given I have 3 # of cukes\n");
        assert_eq!(
            kinds,
            vec![TokenKind::Step {
                keyword: StepKeyword::Given,
                literal: "Given ".to_string(),
                text: "I have 3 # of cukes".to_string(),
            }]
        );
    }

    #[test]
    fn tags_are_deduplicated_and_stop_at_comments() {
        let kinds = kinds("@slow @smoke @slow # @ignored\n");
        assert_eq!(
            kinds,
            vec![TokenKind::Tags(vec!["slow".to_string(), "smoke".to_string()])]
        );
    }

    #[test]
    fn rejects_tokens_without_at_sign_on_tag_lines() {
        let err = lex_err("@slow smoke\n");
        assert_eq!(err.message, "invalid tag 'smoke'");
        assert_eq!(err.location.line(), 1);
    }

    #[test]
    fn records_line_and_character_column() {
        let lexed = lex("Feature: x\n\n  Scénario: y\n");
        let english = Language::english().unwrap_or_else(|err| panic!("{err}"));
        assert!(english.match_block("Scénario: y").is_none());
        let Some(token) = lexed.tokens.get(1) else {
            panic!("expected two tokens");
        };
        assert_eq!(token.location.line(), 3);
        assert_eq!(token.location.column(), 3);
        assert_eq!(token.kind, TokenKind::Text("Scénario: y".to_string()));
        assert_eq!(token.span.start, "Feature: x\n\n  ".len());
    }

    #[test]
    fn dedents_multiline_strings_relative_to_the_delimiter() {
        let lexed = lex("    \"\"\"markdown\n\n      indented\n    flush\n\n    \"\"\"\n");
        assert!(lexed.warnings.is_empty());
        let Some(TokenKind::DocString {
            content,
            content_type,
            delimiter,
        }) = lexed.tokens.first().map(|token| token.kind.clone())
        else {
            panic!("expected a multiline string");
        };
        assert_eq!(delimiter, DocStringDelimiter::Quotes);
        assert_eq!(content_type.as_deref(), Some("markdown"));
        assert_eq!(content, "  indented\nflush");
    }

    #[test]
    fn under_indented_content_warns_and_keeps_going() {
        let lexed = lex("    ```\n  short\n    ok\n    ```\nGiven after\n");
        assert_eq!(lexed.tokens.len(), 2);
        let [warning] = lexed.warnings.as_slice() else {
            panic!("expected one warning, got {:?}", lexed.warnings);
        };
        assert_eq!(warning.location.line(), 2);
        assert_eq!(warning.line, "short");
        let Some(TokenKind::DocString { content, .. }) =
            lexed.tokens.first().map(|token| token.kind.clone())
        else {
            panic!("expected a multiline string");
        };
        assert_eq!(content, "short\nok");
    }

    #[test]
    fn multiline_strings_hide_keywords_and_comments() {
        let kinds = kinds("\"\"\"\nFeature: not a header\n# not a comment\n\\\"\\\"\\\"\n\"\"\"\n");
        assert_eq!(
            kinds,
            vec![TokenKind::DocString {
                delimiter: DocStringDelimiter::Quotes,
                content_type: None,
                content: "Feature: not a header\n# not a comment\n\"\"\"".to_string(),
            }]
        );
    }

    #[test]
    fn unterminated_multiline_string_is_an_error() {
        let err = lex_err("Given x\n  \"\"\"\n  never closed\n");
        assert_eq!(err.message, "unterminated multiline string");
        assert_eq!(err.location.line(), 2);
        assert_eq!(err.location.column(), 3);
    }

    #[test]
    fn unterminated_row_is_an_error() {
        let err = lex_err("| a | b\n");
        assert_eq!(err.message, "table row must end with '|'");
        assert_eq!(err.line, "| a | b");
    }

    #[test]
    fn strips_carriage_returns() {
        let kinds = kinds("Given windows\r\n| a |\r\n");
        assert_eq!(kinds.get(1), Some(&TokenKind::Row(vec!["a".to_string()])));
    }

    #[test]
    fn detects_language_header() {
        assert_eq!(declared_language("  #language:pt-br\n"), Some("pt-br"));
        assert_eq!(declared_language("# languages: fr"), None);
        assert_eq!(declared_language("# language:"), None);
    }
}
