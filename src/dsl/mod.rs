//! Parser for the circuit definition language.
//!
//! A definition file declares logic devices, wires them together and names
//! the signals to monitor. Every statement is wrapped in parentheses;
//! whitespace and comments between tokens are insignificant.
//!
//! # Grammar
//!
//! ```text
//! identifier = alpha, { alpha | digit } ;
//! number = '0' | digit_nonzero, { digit } ;
//! definition_file = { statement } ;
//! statement = '(', ( device | connect | monitor ), ')' ;
//! device = 'DEVICE', identifier, { identifier }, ('is'|'are'), device_type ;
//! device_type = device_no_qualifier | device_with_qualifier, number ;
//! device_with_qualifier = 'CLOCK' | 'SWITCH' | 'RC' | 'AND' | 'NAND' | 'OR' | 'NOR' ;
//! device_no_qualifier = 'DTYPE' | 'XOR' | 'NOT' ;
//! connect = 'CONNECT', device_terminal, 'to', device_terminal ;
//! monitor = 'MONITOR', device_terminal, { device_terminal } ;
//! device_terminal = identifier, [ '.', identifier ] ;
//! ```
//!
//! Comments are `// ...` to the end of the line or `/* ... */`.
//!
//! # Device Types
//!
//! | Type | Qualifier |
//! |------|-----------|
//! | CLOCK | half period in cycles |
//! | SWITCH | initial state |
//! | RC | cycles held high |
//! | AND, NAND, OR, NOR | number of inputs |
//! | DTYPE, XOR, NOT | none |
//!
//! # Example
//!
//! ```text
//! // Clocked D-type flip-flop
//! (DEVICE Q is DTYPE)
//! (DEVICE set clr data are SWITCH 0)
//! (DEVICE clk is CLOCK 1)
//! (CONNECT set to Q.SET)
//! (CONNECT clr to Q.CLEAR)
//! (CONNECT data to Q.DATA)
//! (CONNECT clk to Q.CLK)
//! (MONITOR clk Q.Q)
//! ```

mod ast;
mod lexer;
mod names;
mod parser;

pub use ast::*;
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use names::{common_prefix_len, suggest, NameId, Names};
pub use parser::{Parser, ParserConfig, DEFAULT_MAX_ERRORS};

use crate::error::{LogsimError, Result};

/// Parse definition text into an AST.
pub fn parse(input: &str) -> Result<DefinitionFile> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse definition text with custom configuration.
pub fn parse_with_config(input: &str, config: ParserConfig) -> Result<DefinitionFile> {
    let mut parser = Parser::with_config(Lexer::new(input), config);
    parser.parse()
}

/// Collect every error in the definition text, recovering after each one.
pub fn check(input: &str) -> Vec<LogsimError> {
    check_with_config(input, ParserConfig::default())
}

/// Collect every error with custom configuration.
pub fn check_with_config(input: &str, config: ParserConfig) -> Vec<LogsimError> {
    let mut parser = Parser::with_config(Lexer::new(input), config);
    parser.check()
}

/// Read a definition file, refusing files larger than `max_bytes`.
#[cfg(feature = "cli")]
pub fn read_source(path: &std::path::Path, max_bytes: Option<u64>) -> Result<String> {
    let read_error = |source| LogsimError::FileReadError {
        path: path.display().to_string(),
        source,
    };

    if let Some(limit) = max_bytes {
        let size = std::fs::metadata(path).map_err(read_error)?.len();
        if size > limit {
            return Err(LogsimError::InputTooLarge {
                path: path.display().to_string(),
                size,
                limit,
            });
        }
    }

    std::fs::read_to_string(path).map_err(read_error)
}

/// Parse a definition file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<DefinitionFile> {
    let content = read_source(path, None)?;
    parse(&content)
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("logsim-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_file() {
        let path = temp_file("ok.def", "(DEVICE n is NOT)\n(MONITOR n)\n");
        let file = parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_parse_file_missing() {
        let path = std::env::temp_dir().join("logsim-does-not-exist.def");
        assert!(matches!(
            parse_file(&path),
            Err(LogsimError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_read_source_size_limit() {
        let path = temp_file("big.def", "(MONITOR a b c d e f g)");
        let result = read_source(&path, Some(8));
        let within = read_source(&path, Some(1024));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(LogsimError::InputTooLarge { size: 23, limit: 8, .. })
        ));
        assert!(within.is_ok());
    }
}
