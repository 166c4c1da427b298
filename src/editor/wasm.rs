//! JavaScript surface for the man-hour editor.

use wasm_bindgen::prelude::*;
use web_sys::{CompositionEvent, KeyboardEvent};

use super::{KeyInput, ManHourEditor, SelectEvent};
use crate::config::GridConfig;
use crate::source::JsonSource;
use crate::types::{ColumnId, RawCellChange, RowId};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn column(column: &str) -> Result<ColumnId, JsValue> {
    Ok(column.parse()?)
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key_code: event.key_code(),
        key: event.key(),
        ctrl: event.ctrl_key() || event.meta_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }
}

/// The man-hour grid as seen from the page.
///
/// Every mutating call returns the edit outcomes (or `undefined` when the
/// call did nothing); call `grid()` afterwards to re-render.
#[wasm_bindgen]
pub struct HourGrid {
    editor: ManHourEditor,
}

#[wasm_bindgen]
impl HourGrid {
    /// An empty grid with the default config.
    #[wasm_bindgen(constructor)]
    pub fn new() -> HourGrid {
        console_error_panic_hook::set_once();
        HourGrid {
            editor: ManHourEditor::new(GridConfig::default()),
        }
    }

    /// A grid loaded with the built-in sample sheet.
    pub async fn fixture() -> Result<HourGrid, JsValue> {
        console_error_panic_hook::set_once();
        let state = JsonSource::fixture().load().await?;
        Ok(HourGrid {
            editor: ManHourEditor::with_state(state, GridConfig::default()),
        })
    }

    /// A grid loaded from a roster document and an options document.
    #[wasm_bindgen(js_name = "fromJson")]
    pub async fn from_json(roster: String, options: String) -> Result<HourGrid, JsValue> {
        console_error_panic_hook::set_once();
        let state = JsonSource::new(roster, options).load().await?;
        Ok(HourGrid {
            editor: ManHourEditor::with_state(state, GridConfig::default()),
        })
    }

    #[wasm_bindgen(js_name = "setConfig")]
    pub fn set_config(&mut self, config: &str) -> Result<(), JsValue> {
        self.editor.set_config(GridConfig::from_json(config)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "isEmpty")]
    pub fn is_empty(&self) -> bool {
        self.editor.state().is_empty()
    }

    /// Columns and rows to render.
    pub fn grid(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.grid())
    }

    /// Apply the change batch reported by the grid.
    #[wasm_bindgen(js_name = "handleChanges")]
    pub fn handle_changes(&mut self, changes: JsValue) -> Result<JsValue, JsValue> {
        let changes: Vec<RawCellChange> = serde_wasm_bindgen::from_value(changes)?;
        to_js(&self.editor.handle_raw_changes(changes))
    }

    /// Key press on a focused dropdown cell of an employee row.
    #[wasm_bindgen(js_name = "keyDown")]
    pub fn key_down(
        &mut self,
        row: usize,
        column_id: &str,
        event: &KeyboardEvent,
    ) -> Result<JsValue, JsValue> {
        let outcomes = self
            .editor
            .key_down(RowId::Employee(row), column(column_id)?, &key_input(event));
        if outcomes.is_some() {
            event.prevent_default();
        }
        to_js(&outcomes)
    }

    #[wasm_bindgen(js_name = "compositionEnd")]
    pub fn composition_end(
        &mut self,
        row: usize,
        column_id: &str,
        event: &CompositionEvent,
    ) -> Result<JsValue, JsValue> {
        let data = event.data().unwrap_or_default();
        to_js(
            &self
                .editor
                .composition_end(RowId::Employee(row), column(column_id)?, &data),
        )
    }

    /// Event from a rendered select control, e.g. `{ type: "change", value: "general" }`.
    #[wasm_bindgen(js_name = "selectEvent")]
    pub fn select_event(
        &mut self,
        row: usize,
        column_id: &str,
        event: JsValue,
    ) -> Result<JsValue, JsValue> {
        let event: SelectEvent = serde_wasm_bindgen::from_value(event)?;
        to_js(
            &self
                .editor
                .select_event(RowId::Employee(row), column(column_id)?, &event),
        )
    }

    /// Select-control props for a dropdown cell, or `undefined`.
    #[wasm_bindgen(js_name = "renderDropdown")]
    pub fn render_dropdown(&self, row: usize, column_id: &str) -> Result<JsValue, JsValue> {
        to_js(
            &self
                .editor
                .render_dropdown(RowId::Employee(row), column(column_id)?),
        )
    }
}

impl Default for HourGrid {
    fn default() -> Self {
        Self::new()
    }
}
