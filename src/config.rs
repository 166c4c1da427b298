//! Grid configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! reproduces the stock man-hour sheet.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ColumnId, FixedField, ProjectField};

/// What happens to the rest of a batch when one edit is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchPolicy {
    /// Any rejected edit discards the domain changes of the whole batch.
    #[default]
    Atomic,
    /// Rejected edits are dropped; accepted edits still apply.
    BestEffort,
}

/// How the percentage column of an allocation slot is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PercentageInput {
    /// Numeric cell holding a fraction, formatted as a percent.
    #[default]
    Number,
    /// Selector offering `0, step, 2*step, ..., 100`.
    Dropdown,
}

/// Column widths in pixels, by column kind. `None` leaves the width to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnWidths {
    pub employee: Option<u32>,
    pub department: Option<u32>,
    pub position: Option<u32>,
    pub project_name: Option<u32>,
    pub project_function: Option<u32>,
    pub project_percentage: Option<u32>,
    pub trailing: Option<u32>,
    pub total: Option<u32>,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            employee: Some(120),
            department: None,
            position: Some(120),
            project_name: Some(120),
            project_function: Some(120),
            project_percentage: Some(80),
            trailing: Some(120),
            total: Some(80),
        }
    }
}

impl ColumnWidths {
    pub fn width_of(&self, column: ColumnId) -> Option<u32> {
        match column {
            ColumnId::Fixed(FixedField::Employee) => self.employee,
            ColumnId::Fixed(FixedField::Department) => self.department,
            ColumnId::Fixed(FixedField::Position) => self.position,
            ColumnId::Fixed(_) => self.trailing,
            ColumnId::Project { field, .. } => match field {
                ProjectField::Name => self.project_name,
                ProjectField::Function => self.project_function,
                ProjectField::Percentage => self.project_percentage,
            },
            ColumnId::Total => self.total,
        }
    }
}

/// Configuration for projection and reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub batch_policy: BatchPolicy,
    /// Reject percentage edits that push an employee's total above 100
    /// instead of only warning.
    pub enforce_total_cap: bool,
    pub percentage_input: PercentageInput,
    /// Spacing of the percentage dropdown options. Clamped to `1..=100`.
    pub percentage_step: u8,
    pub row_height: u32,
    pub sticky_top_rows: u32,
    pub sticky_left_columns: u32,
    pub column_widths: ColumnWidths,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            batch_policy: BatchPolicy::default(),
            enforce_total_cap: false,
            percentage_input: PercentageInput::default(),
            percentage_step: 10,
            row_height: 35,
            sticky_top_rows: 1,
            sticky_left_columns: 3,
            column_widths: ColumnWidths::default(),
        }
    }
}

impl GridConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Values offered by the percentage dropdown.
    pub fn percentage_choices(&self) -> Vec<u8> {
        let step = usize::from(self.percentage_step.clamp(1, 100));
        let mut choices: Vec<u8> = (0..=100u8).step_by(step).collect();
        if choices.last() != Some(&100) {
            choices.push(100);
        }
        choices
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(GridConfig::from_json("{}").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let cfg = GridConfig::from_json(
            r#"{"batchPolicy":"bestEffort","percentageInput":"dropdown","columnWidths":{"total":100}}"#,
        )
        .unwrap();
        assert_eq!(cfg.batch_policy, BatchPolicy::BestEffort);
        assert_eq!(cfg.percentage_input, PercentageInput::Dropdown);
        assert_eq!(cfg.column_widths.total, Some(100));
        assert_eq!(cfg.column_widths.employee, Some(120));
        assert_eq!(cfg.row_height, 35);
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        assert!(GridConfig::from_json(r#"{"batchPolicy":"sometimes"}"#).is_err());
    }

    #[test]
    fn test_percentage_choices() {
        let cfg = GridConfig::default();
        assert_eq!(
            cfg.percentage_choices(),
            vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]
        );

        let odd = GridConfig {
            percentage_step: 30,
            ..GridConfig::default()
        };
        assert_eq!(odd.percentage_choices(), vec![0, 30, 60, 90, 100]);

        let zero = GridConfig {
            percentage_step: 0,
            ..GridConfig::default()
        };
        assert_eq!(zero.percentage_choices().len(), 101);
    }
}
