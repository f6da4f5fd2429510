//! Parser for the circuit definition language.

use tracing::{debug, warn};

use super::ast::*;
use super::lexer::{Keyword, Lexer, Token, TokenKind};
use super::names::suggest;
use crate::error::{LexicalError, LogsimError, Position, Result, SyntaxError, SyntaxErrorKind};

/// Default cap on the number of errors collected by [`Parser::check`].
pub const DEFAULT_MAX_ERRORS: usize = 50;

const STATEMENT_KEYWORDS: [Keyword; 3] = [Keyword::Device, Keyword::Connect, Keyword::Monitor];

/// Configuration for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accept `//` and `/* */` comments.
    pub comments: bool,
    /// Maximum number of errors collected by [`Parser::check`].
    pub max_errors: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comments: true,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable comments.
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Set the maximum number of errors collected by a check.
    ///
    /// A value of 0 is treated as 1.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors.max(1);
        self
    }
}

/// Parser for definition text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Lexical error raised while reading the first token
    pending: Option<LexicalError>,
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self::with_config(lexer, ParserConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(lexer: Lexer<'a>, config: ParserConfig) -> Self {
        let mut parser = Self {
            lexer: lexer.with_comments(config.comments),
            current: Token {
                kind: TokenKind::Invalid,
                text: String::new(),
                position: Position::START,
            },
            pending: None,
            config,
        };
        if let Err(LogsimError::Lexical(err)) = parser.advance() {
            parser.pending = Some(err);
        }
        parser
    }

    /// Parse the entire definition file, stopping at the first error.
    pub fn parse(&mut self) -> Result<DefinitionFile> {
        if let Some(err) = self.pending.take() {
            return Err(err.into());
        }

        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }

        debug!(statements = statements.len(), "parsed definition file");
        Ok(DefinitionFile::new(statements))
    }

    /// Check the entire definition file, collecting every error.
    ///
    /// After an error the parser skips to the next '(' and carries on.
    /// An empty result means the text parses.
    pub fn check(&mut self) -> Vec<LogsimError> {
        let mut errors = Vec::new();
        if let Some(err) = self.pending.take() {
            errors.push(err.into());
            self.recover(&mut errors);
        }

        while self.current.kind != TokenKind::Eof && errors.len() < self.config.max_errors {
            if let Err(err) = self.parse_statement() {
                errors.push(err);
                self.recover(&mut errors);
            }
        }

        errors.truncate(self.config.max_errors);
        debug!(errors = errors.len(), "checked definition file");
        errors
    }

    fn recover(&mut self, errors: &mut Vec<LogsimError>) {
        let from = self.current.position;
        while !matches!(self.current.kind, TokenKind::OpenParen | TokenKind::Eof) {
            if let Err(err) = self.advance() {
                errors.push(err);
            }
        }
        if self.current.position != from {
            warn!(
                line = from.line,
                column = from.column,
                "skipped input to resume at next statement"
            );
        }
    }

    fn advance(&mut self) -> Result<()> {
        match self.lexer.next_token() {
            Ok(token) => {
                self.current = token;
                Ok(())
            }
            Err(err) => {
                // Keep the parser off any stale token
                self.current = Token {
                    kind: TokenKind::Invalid,
                    text: String::new(),
                    position: err.position().unwrap_or(self.current.position),
                };
                Err(err)
            }
        }
    }

    /// Build an error at the current token.
    ///
    /// Running out of input always reports an unterminated statement.
    fn error(&self, kind: SyntaxErrorKind) -> LogsimError {
        let kind = if self.current.kind == TokenKind::Eof {
            SyntaxErrorKind::UnterminatedStatement
        } else {
            kind
        };
        SyntaxError::new(kind, self.current.text.clone(), self.current.position).into()
    }

    fn expect_identifier(&mut self, expected: &'static str) -> Result<String> {
        if self.current.kind != TokenKind::Identifier {
            return Err(self.error(SyntaxErrorKind::Expected { expected }));
        }
        let text = std::mem::take(&mut self.current.text);
        self.advance()?;
        Ok(text)
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        if self.current.kind != TokenKind::OpenParen {
            return Err(self.error(SyntaxErrorKind::Expected { expected: "'('" }));
        }
        let line = self.current.position.line;
        self.advance()?;

        let statement = match self.current.kind {
            TokenKind::Keyword(Keyword::Device) => {
                self.advance()?;
                Statement::Device(self.parse_device()?)
            }
            TokenKind::Keyword(Keyword::Connect) => {
                self.advance()?;
                Statement::Connect(self.parse_connect()?)
            }
            TokenKind::Keyword(Keyword::Monitor) => {
                self.advance()?;
                Statement::Monitor(self.parse_monitor()?)
            }
            _ => {
                let suggestions =
                    suggest(&self.current.text, STATEMENT_KEYWORDS.iter().map(|kw| kw.as_str()));
                return Err(match self.error(SyntaxErrorKind::UnknownStatement) {
                    LogsimError::Syntax(err) => err.with_suggestions(suggestions).into(),
                    other => other,
                });
            }
        };

        match self.current.kind {
            TokenKind::CloseParen => self.advance()?,
            _ => return Err(self.error(SyntaxErrorKind::Expected { expected: "')'" })),
        }

        debug!(line, %statement, "statement");
        Ok(statement)
    }

    fn parse_device(&mut self) -> Result<DeviceDecl> {
        let mut names = vec![self.expect_identifier("a device name")?];
        while self.current.kind == TokenKind::Identifier {
            names.push(self.expect_identifier("a device name")?);
        }

        match self.current.kind {
            TokenKind::Keyword(Keyword::Is) | TokenKind::Keyword(Keyword::Are) => self.advance()?,
            _ => return Err(self.error(SyntaxErrorKind::MissingCopula)),
        }

        let device_type = match self.current.kind {
            TokenKind::Keyword(keyword) => DeviceType::from_keyword(keyword),
            _ => None,
        };
        let device_type = match device_type {
            Some(device_type) => device_type,
            None => {
                let suggestions =
                    suggest(&self.current.text, DeviceType::ALL.iter().map(|ty| ty.keyword().as_str()));
                return Err(match self.error(SyntaxErrorKind::UnknownDeviceType) {
                    LogsimError::Syntax(err) => err.with_suggestions(suggestions).into(),
                    other => other,
                });
            }
        };
        self.advance()?;

        let qualifier = match self.current.kind {
            TokenKind::Number(value) => Some(value),
            _ => None,
        };
        let kind = DeviceKind::new(device_type, qualifier).map_err(|mismatch| {
            self.error(match mismatch {
                QualifierMismatch::Missing(device_type) => {
                    SyntaxErrorKind::MissingQualifier { device_type }
                }
                QualifierMismatch::Unexpected(device_type) => {
                    SyntaxErrorKind::UnexpectedQualifier { device_type }
                }
            })
        })?;
        if qualifier.is_some() {
            self.advance()?;
        }

        DeviceDecl::new(names, kind)
            .ok_or_else(|| self.error(SyntaxErrorKind::Expected { expected: "a device name" }))
    }

    fn parse_connect(&mut self) -> Result<Connect> {
        let source = self.parse_terminal()?;

        if self.current.kind != TokenKind::Keyword(Keyword::To) {
            return Err(self.error(SyntaxErrorKind::MissingTo));
        }
        self.advance()?;

        let destination = self.parse_terminal()?;
        Ok(Connect {
            source,
            destination,
        })
    }

    fn parse_monitor(&mut self) -> Result<Monitor> {
        let mut terminals = vec![self.parse_terminal()?];
        while self.current.kind == TokenKind::Identifier {
            terminals.push(self.parse_terminal()?);
        }
        Monitor::new(terminals)
            .ok_or_else(|| self.error(SyntaxErrorKind::Expected { expected: "a device name" }))
    }

    fn parse_terminal(&mut self) -> Result<DeviceTerminal> {
        let device = self.expect_identifier("a device name")?;
        if self.current.kind != TokenKind::Dot {
            return Ok(DeviceTerminal::new(device));
        }
        self.advance()?;

        if self.current.kind != TokenKind::Identifier {
            return Err(self.error(SyntaxErrorKind::DanglingDot));
        }
        let pin = self.expect_identifier("a pin name")?;
        Ok(DeviceTerminal::with_pin(device, pin))
    }
}
