//! Searchable single-select dropdown cell type.
//!
//! The grid owns the open/closed state: the select control is rendered with
//! its menu controlled by `is_open`, and every control event is turned back
//! into an updated cell that the grid commits. Nothing here keeps state of
//! its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::template::{
    get_cell_property, keycodes, optional_bool, optional_string, CellTemplate, Compatible,
    KeyDownOutcome, KeyInput, PropertyType,
};
use crate::error::{HourgridError, Result};
use crate::types::{CellStyle, DropdownCell, OptionType};

/// Cell template for [`DropdownCell`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DropdownCellTemplate;

impl DropdownCellTemplate {
    /// Wrap a typed cell, computing its text and numeric value.
    ///
    /// An empty selection is normalised to `None`.
    pub fn compatible(&self, mut cell: DropdownCell) -> Compatible<DropdownCell> {
        if cell.selected_value.as_deref() == Some("") {
            cell.selected_value = None;
        }
        let text = cell.selected_value.clone().unwrap_or_default();
        let value = text.trim().parse().unwrap_or(f64::NAN);
        Compatible { cell, text, value }
    }

    /// CSS class list: the cell's own class plus `open` or `closed`.
    pub fn class_name(&self, cell: &Compatible<DropdownCell>) -> String {
        let state = if cell.cell.is_open { "open" } else { "closed" };
        match cell.cell.class_name.as_deref() {
            Some(own) if !own.is_empty() => format!("{own} {state}"),
            _ => state.to_string(),
        }
    }

    /// IME composition finished while the cell had focus: open the menu and
    /// search for the composed text.
    pub fn handle_composition_end(
        &self,
        cell: &Compatible<DropdownCell>,
        data: &str,
    ) -> KeyDownOutcome<DropdownCell> {
        let mut next = cell.cell.clone();
        next.is_open = true;
        next.input_value = Some(data.to_string());
        KeyDownOutcome {
            cell: self.compatible(next),
            enable_edit_mode: false,
        }
    }
}

impl CellTemplate for DropdownCellTemplate {
    type Cell = DropdownCell;
    type Rendered = SelectControl;

    fn get_compatible_cell(&self, uncertain: &Value) -> Result<Compatible<DropdownCell>> {
        let values = get_cell_property(uncertain, "values", PropertyType::Object)?;
        let values: Vec<OptionType> =
            serde_json::from_value(values.clone()).map_err(|e| HourgridError::CellProperty {
                property: "values",
                reason: e.to_string(),
            })?;

        let style = uncertain
            .get("style")
            .and_then(|s| serde_json::from_value::<CellStyle>(s.clone()).ok());

        Ok(self.compatible(DropdownCell {
            selected_value: optional_string(uncertain, "selectedValue"),
            values,
            is_disabled: optional_bool(uncertain, "isDisabled", false),
            is_open: optional_bool(uncertain, "isOpen", false),
            input_value: optional_string(uncertain, "inputValue"),
            class_name: optional_string(uncertain, "className"),
            style,
        }))
    }

    /// The merged cell's text becomes the selection only if it names one of
    /// this cell's options. Open flag and search buffer are taken as-is.
    fn update(
        &self,
        cell: &Compatible<DropdownCell>,
        cell_to_merge: &Value,
    ) -> Result<Compatible<DropdownCell>> {
        let text = optional_string(cell_to_merge, "text");
        let mut next = cell.cell.clone();
        next.selected_value = text.filter(|t| cell.cell.has_value(t));
        next.is_open = optional_bool(cell_to_merge, "isOpen", false);
        next.input_value = optional_string(cell_to_merge, "inputValue");
        Ok(self.compatible(next))
    }

    fn handle_key_down(
        &self,
        cell: &Compatible<DropdownCell>,
        key: &KeyInput,
    ) -> KeyDownOutcome<DropdownCell> {
        let mut next = cell.cell.clone();

        if (key.key_code == keycodes::SPACE || key.key_code == keycodes::ENTER) && !key.shift {
            next.is_open = !next.is_open;
            if !next.is_open {
                next.input_value = None;
            }
        } else if key.key_code == keycodes::ESCAPE {
            if next.is_open {
                next.is_open = false;
                next.input_value = None;
            }
        } else if key.is_printable() && !(key.shift && key.key_code == keycodes::SPACE) {
            next.is_open = true;
            next.input_value = Some(key.key.clone());
        }

        KeyDownOutcome {
            cell: self.compatible(next),
            enable_edit_mode: false,
        }
    }

    fn render(&self, cell: &Compatible<DropdownCell>, _is_in_edit_mode: bool) -> SelectControl {
        SelectControl {
            options: cell.cell.values.clone(),
            value: cell.cell.selected_option().cloned(),
            is_searchable: true,
            is_multi: false,
            menu_is_open: cell.cell.is_open,
            is_disabled: cell.cell.is_disabled,
            input_value: cell.cell.input_value.clone(),
            blur_input_on_select: true,
            class_name: self.class_name(cell),
        }
    }
}

/// Props for the select control that renders a dropdown cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectControl {
    pub options: Vec<OptionType>,
    pub value: Option<OptionType>,
    pub is_searchable: bool,
    pub is_multi: bool,
    /// Controlled by the grid; the control never opens or closes itself.
    pub menu_is_open: bool,
    pub is_disabled: bool,
    pub input_value: Option<String>,
    pub blur_input_on_select: bool,
    pub class_name: String,
}

/// Something the user did to a rendered select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SelectEvent {
    PointerDown,
    MenuOpen,
    MenuClose,
    /// An option was picked.
    Change(String),
    InputChange(String),
    Escape,
}

impl SelectControl {
    /// Apply a control event to the cell it was rendered from.
    ///
    /// Returns the cell to commit, or `None` when the event changes nothing
    /// (disabled control, unknown option).
    pub fn on_event(
        &self,
        template: &DropdownCellTemplate,
        cell: &Compatible<DropdownCell>,
        event: &SelectEvent,
    ) -> Option<Compatible<DropdownCell>> {
        if self.is_disabled {
            return None;
        }
        let mut next = cell.cell.clone();
        match event {
            SelectEvent::PointerDown | SelectEvent::MenuOpen => {
                next.is_open = true;
            }
            SelectEvent::MenuClose | SelectEvent::Escape => {
                next.is_open = false;
                next.input_value = None;
            }
            SelectEvent::Change(value) => {
                let option = self.options.iter().find(|o| &o.value == value)?;
                if option.is_disabled {
                    return None;
                }
                next.selected_value = Some(option.value.clone());
                next.is_open = false;
                next.input_value = None;
            }
            SelectEvent::InputChange(text) => {
                next.input_value = Some(text.clone());
            }
        }
        let next = template.compatible(next);
        (next.cell != cell.cell).then_some(next)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<OptionType> {
        vec![
            OptionType::new("general", "综合项目"),
            OptionType::new("userGrowth", "用户增长"),
        ]
    }

    fn cell(selected: Option<&str>, is_open: bool) -> Compatible<DropdownCell> {
        DropdownCellTemplate.compatible(DropdownCell {
            selected_value: selected.map(str::to_string),
            values: options(),
            is_open,
            ..DropdownCell::default()
        })
    }

    #[test]
    fn test_compatible_cell_defaults() {
        let c = DropdownCellTemplate
            .get_compatible_cell(&json!({ "values": [] }))
            .unwrap();
        assert_eq!(c.cell.selected_value, None);
        assert!(!c.cell.is_open);
        assert!(!c.cell.is_disabled);
        assert_eq!(c.cell.input_value, None);
        assert_eq!(c.text, "");
        assert!(c.value.is_nan());
    }

    #[test]
    fn test_compatible_cell_requires_values() {
        let err = DropdownCellTemplate
            .get_compatible_cell(&json!({ "selectedValue": "general" }))
            .unwrap_err();
        assert!(matches!(err, HourgridError::CellProperty { property: "values", .. }));
    }

    #[test]
    fn test_compatible_cell_numeric_value() {
        let c = DropdownCellTemplate
            .get_compatible_cell(&json!({ "values": [], "selectedValue": "40" }))
            .unwrap();
        assert_eq!(c.text, "40");
        assert_eq!(c.value, 40.0);
    }

    #[test]
    fn test_class_name() {
        let mut c = cell(None, true);
        assert_eq!(DropdownCellTemplate.class_name(&c), "open");
        c.cell.class_name = Some("project".into());
        c.cell.is_open = false;
        assert_eq!(DropdownCellTemplate.class_name(&c), "project closed");
    }

    #[test]
    fn test_select_change_closes_and_commits() {
        let c = cell(Some("general"), true);
        let control = DropdownCellTemplate.render(&c, false);
        assert!(control.menu_is_open);
        assert_eq!(control.value.as_ref().map(|o| o.value.as_str()), Some("general"));

        let next = control
            .on_event(
                &DropdownCellTemplate,
                &c,
                &SelectEvent::Change("userGrowth".into()),
            )
            .unwrap();
        assert_eq!(next.cell.selected_value.as_deref(), Some("userGrowth"));
        assert!(!next.cell.is_open);
        assert_eq!(next.cell.input_value, None);
    }

    #[test]
    fn test_select_unknown_option_is_ignored() {
        let c = cell(Some("general"), true);
        let control = DropdownCellTemplate.render(&c, false);
        assert!(control
            .on_event(&DropdownCellTemplate, &c, &SelectEvent::Change("nope".into()))
            .is_none());
    }

    #[test]
    fn test_disabled_control_ignores_events() {
        let mut c = cell(None, false);
        c.cell.is_disabled = true;
        let control = DropdownCellTemplate.render(&c, false);
        assert!(control
            .on_event(&DropdownCellTemplate, &c, &SelectEvent::PointerDown)
            .is_none());
    }

    #[test]
    fn test_select_event_wire_format() {
        let event: SelectEvent =
            serde_json::from_value(json!({ "type": "change", "value": "general" })).unwrap();
        assert_eq!(event, SelectEvent::Change("general".into()));
        let event: SelectEvent = serde_json::from_value(json!({ "type": "menuClose" })).unwrap();
        assert_eq!(event, SelectEvent::MenuClose);
    }
}
