//! WASM bindings for Logsim Core.
//!
//! This module provides JavaScript-friendly bindings for checking
//! definition files in a browser editor.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDefinition, check_definition } from 'logsim_core';
//!
//! await init();
//!
//! const source = `
//!   (DEVICE clk is CLOCK 1)
//!   (DEVICE inv is NOT)
//!   (CONNECT clk to inv)
//!   (MONITOR clk inv)
//! `;
//!
//! const errors = check_definition(source);   // [] when valid
//! const def = new WasmDefinition(source);
//! console.log(def.device_count);             // 2
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl::{self, DefinitionFile};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A parsed definition file.
#[wasm_bindgen]
pub struct WasmDefinition {
    file: DefinitionFile,
}

#[wasm_bindgen]
impl WasmDefinition {
    /// Parse definition text.
    ///
    /// # Returns
    /// The parsed definition, or the first error rendered with its source
    /// line.
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str) -> Result<WasmDefinition, JsValue> {
        let file = dsl::parse(source).map_err(|e| JsValue::from_str(&e.render(source)))?;
        Ok(WasmDefinition { file })
    }

    /// Number of statements.
    #[wasm_bindgen(getter)]
    pub fn statement_count(&self) -> usize {
        self.file.len()
    }

    /// Number of declared devices (a statement may declare several).
    #[wasm_bindgen(getter)]
    pub fn device_count(&self) -> usize {
        self.file.devices().map(|decl| decl.names().len()).sum()
    }

    /// Canonical source text.
    #[wasm_bindgen]
    pub fn to_canonical(&self) -> String {
        self.file.to_string()
    }
}

/// Check definition text, returning every error rendered with its source
/// line. An empty array means the text is valid.
#[wasm_bindgen]
pub fn check_definition(source: &str) -> Vec<String> {
    dsl::check(source)
        .iter()
        .map(|err| err.render(source))
        .collect()
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
