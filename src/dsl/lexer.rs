//! Lexer (tokenizer) for the circuit definition language.

use std::fmt;

use tracing::trace;

use crate::error::{LexicalError, LexicalErrorKind, LogsimError, Position, Result};

/// Reserved words. Keywords are case-sensitive and never identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Device,
    Connect,
    Monitor,
    Clock,
    Switch,
    Rc,
    And,
    Nand,
    Or,
    Nor,
    Dtype,
    Xor,
    Not,
    Is,
    Are,
    To,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Keyword; 16] = [
        Self::Device,
        Self::Connect,
        Self::Monitor,
        Self::Clock,
        Self::Switch,
        Self::Rc,
        Self::And,
        Self::Nand,
        Self::Or,
        Self::Nor,
        Self::Dtype,
        Self::Xor,
        Self::Not,
        Self::Is,
        Self::Are,
        Self::To,
    ];

    /// Match a word exactly against the keyword list.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kw| kw.as_str() == word)
    }

    /// The keyword as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "DEVICE",
            Self::Connect => "CONNECT",
            Self::Monitor => "MONITOR",
            Self::Clock => "CLOCK",
            Self::Switch => "SWITCH",
            Self::Rc => "RC",
            Self::And => "AND",
            Self::Nand => "NAND",
            Self::Or => "OR",
            Self::Nor => "NOR",
            Self::Dtype => "DTYPE",
            Self::Xor => "XOR",
            Self::Not => "NOT",
            Self::Is => "is",
            Self::Are => "are",
            Self::To => "to",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text (empty at end of input)
    pub text: String,
    /// Where the token starts
    pub position: Position,
}

/// Token types in the definition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A device or pin name
    Identifier,
    /// A reserved word
    Keyword(Keyword),
    /// A qualifier number
    Number(u32),
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Pin separator '.'
    Dot,
    /// Comma ','
    Comma,
    /// End of input
    Eof,
    /// Stand-in for text the lexer rejected
    Invalid,
}

/// Lexer for tokenizing definition text.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    comments: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input. Comments are enabled.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            comments: true,
        }
    }

    /// Enable or disable `//` and `/* */` comments.
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Get the next token.
    ///
    /// On error the offending text has already been consumed, so calling
    /// again resumes after it.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        let position = self.position();
        let ch = match self.chars.peek() {
            Some(&(_, ch)) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    position,
                });
            }
        };

        let (kind, text) = match ch {
            '(' => {
                self.advance();
                (TokenKind::OpenParen, "(".to_string())
            }
            ')' => {
                self.advance();
                (TokenKind::CloseParen, ")".to_string())
            }
            '.' => {
                self.advance();
                (TokenKind::Dot, ".".to_string())
            }
            ',' => {
                self.advance();
                (TokenKind::Comma, ",".to_string())
            }
            '0'..='9' => {
                let text = self.read_while(|c| c.is_ascii_digit());
                (TokenKind::Number(parse_number(&text, position)?), text)
            }
            _ if ch.is_ascii_alphabetic() => {
                let text = self.read_while(|c| c.is_ascii_alphanumeric());
                match Keyword::from_word(&text) {
                    Some(keyword) => (TokenKind::Keyword(keyword), text),
                    None => (TokenKind::Identifier, text),
                }
            }
            _ => {
                self.advance();
                return Err(LexicalError::new(
                    LexicalErrorKind::UnrecognizedCharacter(ch),
                    ch.to_string(),
                    position,
                )
                .into());
            }
        };

        trace!(?kind, %text, line = position.line, column = position.column, "token");
        Ok(Token {
            kind,
            text,
            position,
        })
    }

    /// Consume the whole input into a token list ending with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn position(&mut self) -> Position {
        let offset = self
            .chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len());
        Position {
            offset,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, ch)| ch)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else if ch == '/' && self.comments && self.peek_second() == Some('/') {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if ch == '/' && self.comments && self.peek_second() == Some('*') {
                self.skip_block_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.position();
        self.advance();
        self.advance();

        let mut previous = '\0';
        while let Some(ch) = self.advance() {
            if previous == '*' && ch == '/' {
                return Ok(());
            }
            previous = ch;
        }

        Err(LexicalError::new(LexicalErrorKind::UnterminatedComment, "/*", start).into())
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

/// Parse a number token: `0`, or a non-zero digit followed by digits.
fn parse_number(text: &str, position: Position) -> Result<u32> {
    if text.len() > 1 && text.starts_with('0') {
        return Err(LexicalError::new(LexicalErrorKind::LeadingZero, text, position).into());
    }
    text.parse::<u32>().map_err(|_| {
        LogsimError::from(LexicalError::new(
            LexicalErrorKind::NumberOutOfRange,
            text,
            position,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lexer_basic() {
        let input = "(DEVICE g1 is CLOCK 5)";
        let mut lexer = Lexer::new(input);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::OpenParen);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Keyword(Keyword::Device));

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "g1");
        assert_eq!(tok.position.column, 9);
    }

    #[test]
    fn test_lexer_terminal() {
        assert_eq!(
            kinds("sw1.Q"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("DEVICE device IS is"),
            vec![
                TokenKind::Keyword(Keyword::Device),
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Keyword(Keyword::Is),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comma_is_punctuation() {
        assert_eq!(
            kinds("a, b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0 7 120"),
            vec![
                TokenKind::Number(0),
                TokenKind::Number(7),
                TokenKind::Number(120),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_number_then_identifier() {
        assert_eq!(
            kinds("2ab"),
            vec![TokenKind::Number(2), TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_leading_zero() {
        let err = Lexer::new("(DEVICE s is SWITCH 01)").tokenize().unwrap_err();
        assert_eq!(err.lexical_kind(), Some(LexicalErrorKind::LeadingZero));
        assert_eq!(err.position().unwrap().column, 21);
    }

    #[test]
    fn test_number_out_of_range() {
        let err = Lexer::new("99999999999").tokenize().unwrap_err();
        assert_eq!(err.lexical_kind(), Some(LexicalErrorKind::NumberOutOfRange));
    }

    #[test]
    fn test_unrecognized_character() {
        let mut lexer = Lexer::new("a % b");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err.lexical_kind(),
            Some(LexicalErrorKind::UnrecognizedCharacter('%'))
        );
        // the bad character is consumed
        assert_eq!(lexer.next_token().unwrap().text, "b");
    }

    #[test]
    fn test_comments() {
        let input = "// line comment\n(MONITOR /* inline */ g1) // trailing";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::OpenParen,
                TokenKind::Keyword(Keyword::Monitor),
                TokenKind::Identifier,
                TokenKind::CloseParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("(MONITOR g1) /* never closed").tokenize().unwrap_err();
        assert_eq!(
            err.lexical_kind(),
            Some(LexicalErrorKind::UnterminatedComment)
        );
        assert_eq!(err.position().unwrap().offset, 13);
    }

    #[test]
    fn test_lone_slash() {
        let err = Lexer::new("a / b").tokenize().unwrap_err();
        assert_eq!(
            err.lexical_kind(),
            Some(LexicalErrorKind::UnrecognizedCharacter('/'))
        );
    }

    #[test]
    fn test_comments_disabled() {
        let err = Lexer::new("// note").with_comments(false).tokenize().unwrap_err();
        assert_eq!(
            err.lexical_kind(),
            Some(LexicalErrorKind::UnrecognizedCharacter('/'))
        );
    }

    #[test]
    fn test_positions_across_lines() {
        let tokens = Lexer::new("(MONITOR\n  g1)").tokenize().unwrap();
        let g1 = &tokens[2];
        assert_eq!(g1.text, "g1");
        assert_eq!(g1.position.line, 2);
        assert_eq!(g1.position.column, 3);
        assert_eq!(g1.position.offset, 11);
    }
}
