//! # Logsim Core
//!
//! Front-end for the Logic Simulator circuit definition language.
//!
//! This library provides:
//! - A lexer and recursive-descent parser for definition files
//! - A typed syntax tree of device declarations, connections and monitors
//! - Positioned lexical and syntax errors that render with source context
//! - An error-recovering checker that reports every error in a file
//!
//! ## Architecture
//!
//! - [`dsl`] - Lexer, parser, syntax tree and name table
//! - [`error`] - Error types and diagnostics rendering
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use logsim_core::dsl::{self, DeviceKind, Statement};
//!
//! let file = dsl::parse("(DEVICE g1 is CLOCK 5)").unwrap();
//! match &file.statements()[0] {
//!     Statement::Device(decl) => assert_eq!(decl.kind, DeviceKind::Clock(5)),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! logsim circuit.def            # print the canonical form
//! logsim --json circuit.def     # print the syntax tree as JSON
//! logsim --all-errors circuit.def
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmDefinition } from 'logsim_core';
//!
//! const def = new WasmDefinition(source);
//! console.log(def.statement_count, def.to_canonical());
//! ```
//!
//! Only the syntax is checked. Whether connected devices exist or pins are
//! valid for a device is left to the circuit builder.

pub mod dsl;
pub mod error;

// Re-export main types for convenience
pub use dsl::{check, parse, DefinitionFile, ParserConfig, Statement};
pub use error::{LogsimError, Position, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDefinition;
