//! Recursive-descent parser over the token stream.

use std::collections::VecDeque;

use crate::errors::SyntaxError;
use crate::language::BlockKind;
use crate::lexer::{Token, TokenKind};
use crate::location::Location;

use super::StartSymbol;
use super::productions::{
    Argument, BlockProduction, ExamplesProduction, FeatureProduction, Header, StepProduction,
    Text,
};

const MULTIPLE_FEATURES: &str = "Expected EOF (max one feature per file)";

pub(super) struct Parser {
    tokens: VecDeque<Token>,
    start: StartSymbol,
    end: Location,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Token>, start: StartSymbol, end: Location) -> Self {
        Self {
            tokens: tokens.into(),
            start,
            end,
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.front().map(|token| &token.kind)
    }

    fn peek_block(&self) -> Option<BlockKind> {
        match self.peek() {
            Some(TokenKind::Block { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    fn peek_block_after_tags(&self) -> Option<BlockKind> {
        let token = self
            .tokens
            .iter()
            .find(|token| !matches!(token.kind, TokenKind::Tags(_)))?;
        match token.kind {
            TokenKind::Block { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Pop the next token if `convert` accepts it; otherwise leave it queued.
    fn next<T>(&mut self, convert: impl FnOnce(Token) -> Result<T, Token>) -> Option<T> {
        let token = self.tokens.pop_front()?;
        match convert(token) {
            Ok(value) => Some(value),
            Err(token) => {
                self.tokens.push_front(token);
                None
            }
        }
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        match self.tokens.front() {
            Some(token) => token.error(message),
            None => SyntaxError::new(self.end.clone(), message, ""),
        }
    }

    fn tags(&mut self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        while matches!(self.peek(), Some(TokenKind::Tags(_))) {
            if let Some(Token {
                kind: TokenKind::Tags(more),
                ..
            }) = self.tokens.pop_front()
            {
                for tag in more {
                    if !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
            }
        }
        tags
    }

    fn header(&mut self, tags: Vec<String>) -> Result<Header, SyntaxError> {
        self.next(|token| token.into_header(tags))
            .ok_or_else(|| self.error_here("expected a block header"))
    }

    fn description(&mut self) -> Vec<Text> {
        let mut lines = Vec::new();
        while let Some(text) = self.next(Token::into_text) {
            lines.push(text);
        }
        lines
    }

    pub(super) fn feature(&mut self) -> Result<FeatureProduction, SyntaxError> {
        let tags = self.tags();
        if self.peek_block() != Some(BlockKind::Feature) {
            let found = self
                .peek()
                .map_or_else(|| "end of input".to_string(), TokenKind::describe);
            return Err(self.error_here(format!("expected a Feature, found {found}")));
        }
        let header = self.header(tags)?;
        let description = self.description();

        let background = if self.peek_block() == Some(BlockKind::Background) {
            Some(self.block()?)
        } else {
            None
        };
        if background.is_some() && self.peek_block() == Some(BlockKind::Background) {
            return Err(self.error_here("a Feature can have only one Background"));
        }

        let mut scenarios = Vec::new();
        while matches!(
            self.peek_block_after_tags(),
            Some(BlockKind::Scenario | BlockKind::ScenarioOutline)
        ) {
            scenarios.push(self.block()?);
        }

        self.finish()?;
        Ok(FeatureProduction {
            header,
            description,
            background,
            scenarios,
        })
    }

    pub(super) fn steps_only(&mut self) -> Result<Vec<StepProduction>, SyntaxError> {
        let steps = self.steps()?;
        self.finish()?;
        Ok(steps)
    }

    /// A background or scenario, with the scenario's Examples blocks.
    fn block(&mut self) -> Result<BlockProduction, SyntaxError> {
        let tags = self.tags();
        let header = self.header(tags)?;
        let description = self.description();
        let steps = self.steps()?;

        let mut examples = Vec::new();
        if header.kind != BlockKind::Background {
            while self.peek_block_after_tags() == Some(BlockKind::Examples) {
                let tags = self.tags();
                let header = self.header(tags)?;
                let description = self.description();
                let mut rows = Vec::new();
                while let Some(row) = self.next(Token::into_row) {
                    rows.push(row);
                }
                examples.push(ExamplesProduction {
                    header,
                    description,
                    rows,
                });
            }
        }

        Ok(BlockProduction {
            header,
            description,
            steps,
            examples,
        })
    }

    fn steps(&mut self) -> Result<Vec<StepProduction>, SyntaxError> {
        let mut steps = Vec::new();
        while let Some(mut step) = self.next(Token::into_step) {
            step.argument = self.argument()?;
            steps.push(step);
        }
        Ok(steps)
    }

    fn argument(&mut self) -> Result<Option<Argument>, SyntaxError> {
        let argument = if let Some(first) = self.next(Token::into_row) {
            let mut rows = vec![first];
            while let Some(row) = self.next(Token::into_row) {
                rows.push(row);
            }
            Argument::Table(rows)
        } else if let Some(docstring) = self.next(Token::into_docstring) {
            Argument::DocString(docstring)
        } else {
            return Ok(None);
        };

        let conflict = match (&argument, self.peek()) {
            (Argument::Table(_), Some(TokenKind::DocString { .. }))
            | (Argument::DocString(_), Some(TokenKind::Row(_))) => {
                Some("a step cannot have both a table and a multiline string")
            }
            (Argument::DocString(_), Some(TokenKind::DocString { .. })) => {
                Some("a step cannot have more than one multiline string")
            }
            _ => None,
        };
        if let Some(message) = conflict {
            return Err(self.error_here(message));
        }
        Ok(Some(argument))
    }

    /// Report whatever is left after the start symbol was reduced.
    fn finish(&mut self) -> Result<(), SyntaxError> {
        let Some(first) = self.tokens.front() else {
            return Ok(());
        };
        if matches!(first.kind, TokenKind::Tags(_)) {
            let tagged = self.peek_block_after_tags();
            let message = match (self.start, tagged) {
                (StartSymbol::Feature, Some(BlockKind::Feature)) => None,
                (_, Some(BlockKind::Background)) => {
                    Some("tags are not allowed before Background")
                }
                _ => Some("tags must be followed by a Feature, Scenario or Examples"),
            };
            if let Some(message) = message {
                return Err(first.error(message));
            }
            self.tags();
        }

        let Some(token) = self.tokens.front() else {
            return Ok(());
        };
        let message = match (&token.kind, self.start) {
            (TokenKind::Block { .. } | TokenKind::Tags(_), StartSymbol::Steps) => {
                format!("expected a step, found {}", token.kind.describe())
            }
            (TokenKind::Block { kind, .. }, StartSymbol::Feature) => match kind {
                BlockKind::Feature => MULTIPLE_FEATURES.to_string(),
                BlockKind::Background => {
                    "Background must come before the first Scenario".to_string()
                }
                BlockKind::Examples => "Examples must follow a Scenario".to_string(),
                BlockKind::Scenario | BlockKind::ScenarioOutline => {
                    format!("unexpected {}", token.kind.describe())
                }
            },
            (TokenKind::Step { .. }, _) => "step must belong to a Scenario or Background".to_string(),
            (TokenKind::Row(_), _) => "table must follow a step".to_string(),
            (TokenKind::DocString { .. }, _) => "multiline string must follow a step".to_string(),
            (TokenKind::Text(_), _) | (TokenKind::Tags(_), StartSymbol::Feature) => {
                "unexpected text".to_string()
            }
        };
        Err(token.error(message))
    }
}
