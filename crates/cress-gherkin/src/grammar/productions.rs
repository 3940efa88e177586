//! Untyped grammar productions handed to the model builder.

use crate::errors::SyntaxError;
use crate::keyword::StepKeyword;
use crate::language::BlockKind;
use crate::lexer::{Token, TokenKind};
use crate::location::{Location, Span};
use crate::model::DocStringDelimiter;

#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub(crate) tags: Vec<String>,
    pub(crate) kind: BlockKind,
    pub(crate) keyword: String,
    pub(crate) name: String,
    pub(crate) location: Location,
    pub(crate) span: Span,
    pub(crate) line: String,
}

impl Header {
    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.location.clone(), message, self.line.clone())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Text {
    pub(crate) text: String,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) cells: Vec<String>,
    pub(crate) location: Location,
    pub(crate) span: Span,
    pub(crate) line: String,
}

impl Row {
    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.location.clone(), message, self.line.clone())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DocStringProduction {
    pub(crate) delimiter: DocStringDelimiter,
    pub(crate) content_type: Option<String>,
    pub(crate) content: String,
    pub(crate) location: Location,
    pub(crate) span: Span,
}

#[derive(Debug, Clone)]
pub(crate) enum Argument {
    Table(Vec<Row>),
    DocString(DocStringProduction),
}

#[derive(Debug, Clone)]
pub(crate) struct StepProduction {
    pub(crate) keyword: StepKeyword,
    pub(crate) literal: String,
    pub(crate) text: String,
    pub(crate) location: Location,
    pub(crate) span: Span,
    pub(crate) argument: Option<Argument>,
}

#[derive(Debug, Clone)]
pub(crate) struct BlockProduction {
    pub(crate) header: Header,
    pub(crate) description: Vec<Text>,
    pub(crate) steps: Vec<StepProduction>,
    pub(crate) examples: Vec<ExamplesProduction>,
}

#[derive(Debug, Clone)]
pub(crate) struct ExamplesProduction {
    pub(crate) header: Header,
    pub(crate) description: Vec<Text>,
    pub(crate) rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub(crate) struct FeatureProduction {
    pub(crate) header: Header,
    pub(crate) description: Vec<Text>,
    pub(crate) background: Option<BlockProduction>,
    pub(crate) scenarios: Vec<BlockProduction>,
}

#[derive(Debug, Clone)]
pub(crate) enum Production {
    Feature(FeatureProduction),
    Steps(Vec<StepProduction>),
}

fn rebuild(kind: TokenKind, location: Location, span: Span, line: String) -> Token {
    Token {
        kind,
        location,
        span,
        line,
    }
}

// Each conversion hands the token back untouched when its kind does not fit,
// so the parser can push it back and try something else.
impl Token {
    pub(crate) fn into_header(self, tags: Vec<String>) -> Result<Header, Self> {
        match self.kind {
            TokenKind::Block {
                kind,
                keyword,
                name,
            } => Ok(Header {
                tags,
                kind,
                keyword,
                name,
                location: self.location,
                span: self.span,
                line: self.line,
            }),
            kind => Err(rebuild(kind, self.location, self.span, self.line)),
        }
    }

    pub(crate) fn into_text(self) -> Result<Text, Self> {
        match self.kind {
            TokenKind::Text(text) => Ok(Text {
                text,
                location: self.location,
                span: self.span,
            }),
            kind => Err(rebuild(kind, self.location, self.span, self.line)),
        }
    }

    pub(crate) fn into_row(self) -> Result<Row, Self> {
        match self.kind {
            TokenKind::Row(cells) => Ok(Row {
                cells,
                location: self.location,
                span: self.span,
                line: self.line,
            }),
            kind => Err(rebuild(kind, self.location, self.span, self.line)),
        }
    }

    pub(crate) fn into_docstring(self) -> Result<DocStringProduction, Self> {
        match self.kind {
            TokenKind::DocString {
                delimiter,
                content_type,
                content,
            } => Ok(DocStringProduction {
                delimiter,
                content_type,
                content,
                location: self.location,
                span: self.span,
            }),
            kind => Err(rebuild(kind, self.location, self.span, self.line)),
        }
    }

    pub(crate) fn into_step(self) -> Result<StepProduction, Self> {
        match self.kind {
            TokenKind::Step {
                keyword,
                literal,
                text,
            } => Ok(StepProduction {
                keyword,
                literal,
                text,
                location: self.location,
                span: self.span,
                argument: None,
            }),
            kind => Err(rebuild(kind, self.location, self.span, self.line)),
        }
    }
}
