//! hourgrid - man-hour allocation sheet for the web
//!
//! Projects employees and their project allocations into an editable grid
//! and maps grid edits back onto the data:
//! - One header row, one row per employee, three columns per allocation slot
//! - Searchable project selector cells with grid-controlled open state
//! - Per-employee totals, flagged when they do not reach 100%
//! - Batch reconciliation with per-edit outcomes and rollback
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { HourGrid } from 'hourgrid';
//! await init();
//! const sheet = await HourGrid.fixture();
//! render(sheet.grid());
//! grid.onCellsChanged = (changes) => {
//!   sheet.handleChanges(changes);
//!   render(sheet.grid());
//! };
//! ```

pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod numfmt;
pub mod projection;
pub mod source;
pub mod types;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use editor::HourGrid;
pub use editor::{EditOutcome, ManHourEditor, RejectReason};
pub use projection::{project, Grid};

pub use types::*;

/// The default grid config as JSON, for pages that edit it before use.
///
/// # Errors
/// Returns an error if serialization fails.
#[wasm_bindgen(js_name = "defaultConfig")]
pub fn default_config() -> Result<String, JsValue> {
    serde_json::to_string(&config::GridConfig::default())
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
