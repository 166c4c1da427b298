use serde::{Deserialize, Serialize};

use crate::numfmt::PercentFormat;

/// Presentation style attached to a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl CellStyle {
    pub fn background(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }
}

/// A typed cell payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridCell {
    Header(HeaderCell),
    Text(TextCell),
    Number(NumberCell),
    Dropdown(DropdownCell),
}

/// Discriminant of [`GridCell`], used to dispatch edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    Header,
    Text,
    Number,
    Dropdown,
}

impl GridCell {
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Header(_) => CellKind::Header,
            Self::Text(_) => CellKind::Text,
            Self::Number(_) => CellKind::Number,
            Self::Dropdown(_) => CellKind::Dropdown,
        }
    }

    /// Display text as the grid would show it.
    pub fn text(&self) -> &str {
        match self {
            Self::Header(c) => &c.text,
            Self::Text(c) => &c.text,
            Self::Number(c) => &c.text,
            Self::Dropdown(c) => c.selected_value.as_deref().unwrap_or(""),
        }
    }

    pub fn style(&self) -> Option<&CellStyle> {
        match self {
            Self::Header(c) => c.style.as_ref(),
            Self::Text(c) => c.style.as_ref(),
            Self::Number(c) => c.style.as_ref(),
            Self::Dropdown(c) => c.style.as_ref(),
        }
    }

    /// Whether the grid lets the user change this cell.
    pub fn is_editable(&self) -> bool {
        match self {
            Self::Header(_) => false,
            Self::Text(c) => !c.non_editable,
            Self::Number(c) => !c.non_editable,
            Self::Dropdown(c) => !c.is_disabled,
        }
    }

    pub fn as_dropdown(&self) -> Option<&DropdownCell> {
        match self {
            Self::Dropdown(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberCell> {
        match self {
            Self::Number(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub non_editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberCell {
    pub value: f64,
    /// Formatted display text.
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PercentFormat>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub non_editable: bool,
    /// Read NaN values as 0.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nan_to_zero: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

/// One entry of a dropdown's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionType {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_disabled: bool,
}

impl OptionType {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            is_disabled: false,
        }
    }
}

/// Payload of the searchable selector cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_value: Option<String>,
    pub values: Vec<OptionType>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_open: bool,
    /// Free-text search buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl DropdownCell {
    /// The option whose value is currently selected.
    pub fn selected_option(&self) -> Option<&OptionType> {
        let selected = self.selected_value.as_deref()?;
        self.values.iter().find(|o| o.value == selected)
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|o| o.value == value)
    }
}
