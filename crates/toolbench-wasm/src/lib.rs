//! Toolbench WASM - WebAssembly bindings for Toolbench
//!
//! This crate exposes toolbench-core to the browser front end. The GUI builds
//! one tab per entry returned by [`features`] and calls the matching binding.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for results
//! - `compress` - Size-targeted compression bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { features, compress_to_target } from '@toolbench/wasm';
//!
//! await init();
//! for (const feature of features()) {
//!   addTab(feature.name, feature.inputs);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

pub use compress::compress_to_target;
pub use types::JsCompressionResult;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Registered features as an array of `{ id, name, description, inputs, kind }`.
#[wasm_bindgen]
pub fn features() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(toolbench_core::features::FEATURES)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize features: {}", e)))
}
