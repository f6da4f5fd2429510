//! Error types for the circuit definition parser.
//!
//! This module provides a unified error type [`LogsimError`] that covers
//! all error conditions that can occur while reading and parsing a
//! definition file. Lexical and syntax errors carry the [`Position`] of the
//! offending token and can be rendered against the source text with
//! [`LogsimError::render`].

use std::fmt;

use thiserror::Error;

use crate::dsl::DeviceType;

/// Result type alias using [`LogsimError`].
pub type Result<T> = std::result::Result<T, LogsimError>;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number in characters (1-indexed)
    pub column: usize,
}

impl Position {
    /// The position of the first character of the input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Unified error type for all definition file operations.
#[derive(Error, Debug)]
pub enum LogsimError {
    /// Error during lexical analysis
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    /// Grammar violation
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Error reading the definition file
    #[error("Failed to read definition file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Definition file exceeds the caller's size limit
    #[error("Definition file '{path}' is {size} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge { path: String, size: u64, limit: u64 },

    /// Failed to serialize a parsed definition
    #[cfg(feature = "cli")]
    #[error("Failed to serialize definition: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl LogsimError {
    /// Position of the offending token, if the error came from the source text.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexical(err) => Some(err.position),
            Self::Syntax(err) => Some(err.position),
            _ => None,
        }
    }

    /// The syntax error kind, if this is a syntax error.
    pub fn syntax_kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            Self::Syntax(err) => Some(err.kind),
            _ => None,
        }
    }

    /// The lexical error kind, if this is a lexical error.
    pub fn lexical_kind(&self) -> Option<LexicalErrorKind> {
        match self {
            Self::Lexical(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Render the error with the offending source line and a caret marker.
    ///
    /// Errors that do not point into the source render as a single line.
    pub fn render(&self, source: &str) -> String {
        match self {
            Self::Lexical(err) => err.render(source),
            Self::Syntax(err) => err.render(source),
            other => format!("error: {}\n", other),
        }
    }
}

/// Kinds of lexical error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    /// A character that cannot start any token
    UnrecognizedCharacter(char),
    /// A multi-digit number starting with '0'
    LeadingZero,
    /// A number that does not fit the qualifier range
    NumberOutOfRange,
    /// A '/*' comment with no closing '*/'
    UnterminatedComment,
}

impl fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCharacter(ch) => write!(f, "unrecognized character {:?}", ch),
            Self::LeadingZero => write!(f, "number has a leading zero"),
            Self::NumberOutOfRange => write!(f, "number is too large (maximum {})", u32::MAX),
            Self::UnterminatedComment => write!(f, "block comment is never closed"),
        }
    }
}

/// A character sequence the lexer could not turn into a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Lexical error at {position}: {kind}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    /// The offending text
    pub text: String,
    pub position: Position,
}

impl LexicalError {
    /// Create a lexical error
    pub fn new(kind: LexicalErrorKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Render with source context.
    pub fn render(&self, source: &str) -> String {
        render_snippet(source, &self.kind.to_string(), self.position, &self.text, None)
    }
}

/// Kinds of grammar violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A specific token was required
    Expected { expected: &'static str },
    /// Neither `is` nor `are` after the device names
    MissingCopula,
    /// A qualifier-bearing device type with no number
    MissingQualifier { device_type: DeviceType },
    /// A number after a device type that takes none
    UnexpectedQualifier { device_type: DeviceType },
    /// No `to` between the two terminals of a connection
    MissingTo,
    /// A '.' not followed by a pin name
    DanglingDot,
    /// Input ended inside a statement
    UnterminatedStatement,
    /// A statement keyword other than DEVICE, CONNECT or MONITOR
    UnknownStatement,
    /// A word after the copula that names no device type
    UnknownDeviceType,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { expected } => write!(f, "expected {}", expected),
            Self::MissingCopula => write!(f, "expected 'is' or 'are' after device names"),
            Self::MissingQualifier { device_type } => {
                write!(f, "device type {} requires a number", device_type)
            }
            Self::UnexpectedQualifier { device_type } => {
                write!(f, "device type {} takes no number", device_type)
            }
            Self::MissingTo => write!(f, "expected 'to' between connection terminals"),
            Self::DanglingDot => write!(f, "expected a pin name after '.'"),
            Self::UnterminatedStatement => write!(f, "statement is missing its closing ')'"),
            Self::UnknownStatement => write!(f, "expected DEVICE, CONNECT or MONITOR"),
            Self::UnknownDeviceType => write!(f, "expected a device type"),
        }
    }
}

/// A grammar violation at a specific token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at {position}: {kind}, found {}", describe_found(.found))]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Text of the offending token (empty at end of input)
    pub found: String,
    pub position: Position,
    /// Close matches for a misspelled keyword
    pub suggestions: Vec<String>,
}

impl SyntaxError {
    /// Create a syntax error
    pub fn new(kind: SyntaxErrorKind, found: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            found: found.into(),
            position,
            suggestions: Vec::new(),
        }
    }

    /// Attach keyword suggestions.
    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    /// Render with source context.
    pub fn render(&self, source: &str) -> String {
        let message = format!("{}, found {}", self.kind, describe_found(&self.found));
        let help = match self.suggestions.as_slice() {
            [] => None,
            [only] => Some(format!("did you mean '{}'?", only)),
            many => Some(format!(
                "did you mean one of {}?",
                many.iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        };
        render_snippet(source, &message, self.position, &self.found, help)
    }
}

fn describe_found(found: &str) -> String {
    if found.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", found)
    }
}

fn render_snippet(
    source: &str,
    message: &str,
    position: Position,
    text: &str,
    help: Option<String>,
) -> String {
    let line_text = source
        .split('\n')
        .nth(position.line.saturating_sub(1))
        .unwrap_or("")
        .trim_end_matches('\r');
    let number = position.line.to_string();
    let gutter = " ".repeat(number.len());

    // Keep tabs so the caret lines up with the source line
    let indent: String = line_text
        .chars()
        .take(position.column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let carets = "^".repeat(text.chars().count().max(1));

    let mut out = format!(
        "error: {message}\n{gutter}--> {position}\n{gutter} |\n{number} | {line_text}\n{gutter} | {indent}{carets}\n"
    );
    if let Some(help) = help {
        out.push_str(&format!("{gutter} = help: {help}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_points_at_token() {
        let source = "(DEVICE g1 CLOCK 5)";
        let err = LogsimError::from(SyntaxError::new(
            SyntaxErrorKind::MissingCopula,
            "CLOCK",
            Position {
                offset: 11,
                line: 1,
                column: 12,
            },
        ));

        let rendered = err.render(source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines[0],
            "error: expected 'is' or 'are' after device names, found 'CLOCK'"
        );
        assert_eq!(lines[1], " --> line 1, column 12");
        assert_eq!(lines[3], "1 | (DEVICE g1 CLOCK 5)");
        assert_eq!(lines[4], "  |            ^^^^^");
    }

    #[test]
    fn test_render_end_of_input() {
        let source = "(MONITOR a\n";
        let err = SyntaxError::new(
            SyntaxErrorKind::UnterminatedStatement,
            "",
            Position {
                offset: 11,
                line: 2,
                column: 1,
            },
        );

        let rendered = err.render(source);
        assert!(rendered.starts_with("error: statement is missing its closing ')', found end of input\n"));
        assert!(rendered.ends_with("  | ^\n"));
    }

    #[test]
    fn test_render_suggestions() {
        let err = SyntaxError::new(SyntaxErrorKind::UnknownStatement, "DEVICES", Position::START)
            .with_suggestions(["DEVICE"]);
        assert!(err.render("(DEVICES)").contains("= help: did you mean 'DEVICE'?"));
    }

    #[test]
    fn test_render_full_snippet() {
        let err = SyntaxError::new(
            SyntaxErrorKind::UnknownDeviceType,
            "CLK",
            Position {
                offset: 14,
                line: 1,
                column: 15,
            },
        )
        .with_suggestions(["CLOCK"]);

        assert_eq!(
            err.render("(DEVICE g1 is CLK 5)"),
            "error: expected a device type, found 'CLK'\n \
             --> line 1, column 15\n  \
             |\n\
             1 | (DEVICE g1 is CLK 5)\n  \
             |               ^^^\n  \
             = help: did you mean 'CLOCK'?\n"
        );
    }

    #[test]
    fn test_display_includes_position() {
        let err = LexicalError::new(
            LexicalErrorKind::LeadingZero,
            "007",
            Position {
                offset: 20,
                line: 3,
                column: 4,
            },
        );
        assert_eq!(
            err.to_string(),
            "Lexical error at line 3, column 4: number has a leading zero"
        );
    }

    #[test]
    fn test_io_errors_have_no_position() {
        let err = LogsimError::FileReadError {
            path: "missing.def".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.position(), None);
        assert!(err.render("").starts_with("error: Failed to read definition file 'missing.def'"));
    }
}
