//! Cell-template protocol for custom grid cell types.
//!
//! The grid hands a custom cell type loosely-typed payloads (whatever the
//! application put on the row, or whatever the grid merged in after a paste
//! or fill). A template turns those into a compatible cell, merges external
//! updates, reacts to keys and describes how to render the result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HourgridError, Result};

/// A cell that passed [`CellTemplate::get_compatible_cell`], with the two
/// values every grid cell exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Compatible<C> {
    pub cell: C,
    /// Display text.
    pub text: String,
    /// Numeric reading of `text`; NaN when it has none.
    pub value: f64,
}

/// A key press delivered to a focused cell that is not in edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    pub key_code: u32,
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

pub mod keycodes {
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
}

impl KeyInput {
    pub fn new(key_code: u32, key: impl Into<String>) -> Self {
        Self {
            key_code,
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// A single character typed without ctrl/alt.
    pub fn is_printable(&self) -> bool {
        let mut chars = self.key.chars();
        !self.ctrl
            && !self.alt
            && matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
    }
}

/// Result of [`CellTemplate::handle_key_down`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDownOutcome<C> {
    pub cell: Compatible<C>,
    pub enable_edit_mode: bool,
}

/// The four operations a custom cell type provides to the grid.
pub trait CellTemplate {
    type Cell;
    type Rendered;

    /// Build a cell from an untyped payload. Missing optional properties
    /// take defaults; only missing required ones fail.
    fn get_compatible_cell(&self, uncertain: &Value) -> Result<Compatible<Self::Cell>>;

    /// Merge a cell the grid produced (paste, fill, undo) into `cell`.
    fn update(
        &self,
        cell: &Compatible<Self::Cell>,
        cell_to_merge: &Value,
    ) -> Result<Compatible<Self::Cell>>;

    fn handle_key_down(
        &self,
        cell: &Compatible<Self::Cell>,
        key: &KeyInput,
    ) -> KeyDownOutcome<Self::Cell>;

    fn render(&self, cell: &Compatible<Self::Cell>, is_in_edit_mode: bool) -> Self::Rendered;
}

/// JSON type a cell property is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Boolean,
    Number,
    Object,
}

impl PropertyType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Object => value.is_object() || value.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Object => "object",
        }
    }
}

/// Look up a property that must exist with the given type.
pub fn get_cell_property<'a>(
    cell: &'a Value,
    property: &'static str,
    expected: PropertyType,
) -> Result<&'a Value> {
    let value = cell
        .get(property)
        .filter(|v| !v.is_null())
        .ok_or_else(|| HourgridError::CellProperty {
            property,
            reason: "missing".to_string(),
        })?;
    if !expected.matches(value) {
        return Err(HourgridError::CellProperty {
            property,
            reason: format!("expected {}, got {value}", expected.name()),
        });
    }
    Ok(value)
}

/// Optional string property; absent or mistyped reads as `None`.
pub fn optional_string(cell: &Value, property: &'static str) -> Option<String> {
    get_cell_property(cell, property, PropertyType::String)
        .ok()
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Optional boolean property; absent or mistyped reads as `default`.
pub fn optional_bool(cell: &Value, property: &'static str, default: bool) -> bool {
    get_cell_property(cell, property, PropertyType::Boolean)
        .ok()
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_cell_property() {
        let cell = json!({ "text": "a", "isOpen": true, "values": [], "gone": null });
        assert!(get_cell_property(&cell, "text", PropertyType::String).is_ok());
        assert!(get_cell_property(&cell, "values", PropertyType::Object).is_ok());

        let err = get_cell_property(&cell, "text", PropertyType::Boolean).unwrap_err();
        assert!(matches!(err, HourgridError::CellProperty { property: "text", .. }));
        assert!(get_cell_property(&cell, "gone", PropertyType::String).is_err());
        assert!(get_cell_property(&cell, "missing", PropertyType::String).is_err());
    }

    #[test]
    fn test_optional_properties_degrade() {
        let cell = json!({ "isOpen": "yes", "inputValue": 3 });
        assert!(!optional_bool(&cell, "isOpen", false));
        assert!(optional_bool(&cell, "isDisabled", true));
        assert_eq!(optional_string(&cell, "inputValue"), None);
    }

    #[test]
    fn test_printable_keys() {
        assert!(KeyInput::new(65, "a").is_printable());
        assert!(KeyInput::new(65, "A").with_shift().is_printable());
        assert!(KeyInput::new(0, "项").is_printable());
        assert!(!KeyInput::new(65, "a").with_ctrl().is_printable());
        assert!(!KeyInput::new(65, "a").with_alt().is_printable());
        assert!(!KeyInput::new(37, "ArrowLeft").is_printable());
        assert!(!KeyInput::new(9, "Tab").is_printable());
    }
}
