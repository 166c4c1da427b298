//! Projection of the domain state into a rectangular grid.
//!
//! The grid is a pure function of `(ManHourState, TransientUiState,
//! GridConfig)`: one header row, one row per employee, columns from
//! [`ColumnLayout`]. Derived values (function labels, totals) are computed
//! here on every call and never written back.

use serde::{Deserialize, Serialize};

use crate::color;
use crate::config::{GridConfig, PercentageInput};
use crate::layout::{ColumnLayout, GridColumn};
use crate::numfmt::{format_whole_percent, PercentFormat};
use crate::types::{
    CellStyle, ColumnId, DropdownCell, DropdownKey, EmployeeRecord, FixedField, GridCell,
    HeaderCell, ManHourState, NumberCell, OptionType, ProjectAllocation, ProjectField,
    ProjectOption, RowId, SelectorField, TextCell, TransientUiState,
};

/// Text shown in the function column of a placeholder slot.
pub const PLACEHOLDER_TEXT: &str = "-";

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub row_id: RowId,
    pub height: u32,
    pub cells: Vec<GridCell>,
}

/// The complete grid handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub sticky_top_rows: u32,
    pub sticky_left_columns: u32,
}

impl Grid {
    /// Number of allocation slot groups in the layout.
    pub fn slots(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| {
                matches!(
                    c.column_id,
                    ColumnId::Project {
                        field: ProjectField::Name,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn row(&self, row_id: RowId) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.row_id == row_id)
    }

    pub fn cell(&self, row_id: RowId, column: ColumnId) -> Option<&GridCell> {
        let col = self.columns.iter().position(|c| c.column_id == column)?;
        self.row(row_id)?.cells.get(col)
    }
}

/// Whether an employee's allocations add up to a full workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalStatus {
    Complete,
    Incomplete,
}

impl TotalStatus {
    pub fn of(total: u32) -> Self {
        if total == 100 {
            Self::Complete
        } else {
            Self::Incomplete
        }
    }

    pub fn style(self) -> CellStyle {
        color::total_style(self == Self::Complete)
    }
}

/// Project the whole state.
pub fn project(state: &ManHourState, ui: &TransientUiState, config: &GridConfig) -> Grid {
    let slots = state.max_slots();
    let layout = ColumnLayout::new(slots, config);

    let mut rows = Vec::with_capacity(state.len() + 1);
    rows.push(header_row(&layout, config));
    for (index, employee) in state.employees.iter().enumerate() {
        let options = state.options_for(&employee.id);
        rows.push(employee_row(index, employee, options, ui, slots, config));
    }

    tracing::debug!(rows = rows.len(), columns = layout.len(), slots, "projected grid");

    Grid {
        columns: layout.into_columns(),
        rows,
        sticky_top_rows: config.sticky_top_rows,
        sticky_left_columns: config.sticky_left_columns,
    }
}

/// Header label of a column.
pub fn header_text(column: ColumnId) -> String {
    match column {
        ColumnId::Fixed(field) => match field {
            FixedField::Employee => "员工",
            FixedField::Department => "所属部门",
            FixedField::Position => "岗位",
            FixedField::Assignee => "填写人",
            FixedField::Status => "填写状态",
            FixedField::UpdatedAt => "更新时间",
        }
        .to_string(),
        ColumnId::Project { field, slot } => match field {
            ProjectField::Name => format!("项目{}", slot + 1),
            ProjectField::Function => "职能".to_string(),
            ProjectField::Percentage => "占比".to_string(),
        },
        ColumnId::Total => "合计".to_string(),
    }
}

fn header_row(layout: &ColumnLayout, config: &GridConfig) -> GridRow {
    let cells = layout
        .columns()
        .iter()
        .map(|column| {
            let style = column.column_id.slot().map(color::slot_header_style);
            GridCell::Header(HeaderCell {
                text: header_text(column.column_id),
                style,
            })
        })
        .collect();
    GridRow {
        row_id: RowId::Header,
        height: config.row_height,
        cells,
    }
}

/// Project one employee into a row with `slots` allocation groups.
pub fn employee_row(
    index: usize,
    employee: &EmployeeRecord,
    options: &[ProjectOption],
    ui: &TransientUiState,
    slots: usize,
    config: &GridConfig,
) -> GridRow {
    let mut cells = Vec::with_capacity(slots * 3 + 7);

    for value in [&employee.employee, &employee.department, &employee.position] {
        cells.push(GridCell::Text(TextCell {
            text: value.clone(),
            non_editable: true,
            style: Some(color::non_editable_style()),
        }));
    }

    for slot in 0..slots {
        match employee.allocation(slot) {
            Some(allocation) => {
                let state_of = |field| {
                    let key = DropdownKey::new(employee.id.clone(), slot, field);
                    SelectorState {
                        is_open: ui.is_open(&key),
                        input_value: ui.search(&key).map(str::to_string),
                    }
                };
                cells.extend(allocation_cells(
                    allocation,
                    options,
                    state_of(SelectorField::Project),
                    state_of(SelectorField::Percentage),
                    config,
                ));
            }
            None => cells.extend(placeholder_cells(config)),
        }
    }

    for value in [&employee.assignee, &employee.status, &employee.updated_at] {
        cells.push(GridCell::Text(TextCell {
            text: value.clone(),
            non_editable: false,
            style: None,
        }));
    }

    cells.push(total_cell(employee));

    GridRow {
        row_id: RowId::Employee(index),
        height: config.row_height,
        cells,
    }
}

/// Transient state of one selector cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorState {
    pub is_open: bool,
    pub input_value: Option<String>,
}

/// Selector, function label and percentage cells of a real allocation.
pub fn allocation_cells(
    allocation: &ProjectAllocation,
    options: &[ProjectOption],
    project: SelectorState,
    percentage: SelectorState,
    config: &GridConfig,
) -> [GridCell; 3] {
    let selected = allocation
        .project_id
        .as_deref()
        .and_then(|id| options.iter().find(|o| o.id == id));

    let selector = GridCell::Dropdown(DropdownCell {
        selected_value: allocation.project_id.clone(),
        values: options
            .iter()
            .map(|o| OptionType::new(o.id.clone(), o.name.clone()))
            .collect(),
        is_disabled: false,
        is_open: project.is_open,
        input_value: project.input_value,
        ..DropdownCell::default()
    });

    let function = GridCell::Text(TextCell {
        text: selected.map(|o| o.function.clone()).unwrap_or_default(),
        non_editable: true,
        style: Some(color::non_editable_style()),
    });

    let percentage_cell = match config.percentage_input {
        PercentageInput::Number => {
            let format = PercentFormat::default();
            let value = f64::from(allocation.percentage) / 100.0;
            GridCell::Number(NumberCell {
                value,
                text: format.format(value),
                format: Some(format),
                non_editable: false,
                nan_to_zero: true,
                style: None,
            })
        }
        PercentageInput::Dropdown => GridCell::Dropdown(DropdownCell {
            selected_value: Some(allocation.percentage.to_string()),
            values: percentage_options(config, allocation.percentage),
            is_disabled: false,
            is_open: percentage.is_open,
            input_value: percentage.input_value,
            ..DropdownCell::default()
        }),
    };

    [selector, function, percentage_cell]
}

/// Dropdown choices for a stored percentage. A value off the step grid is
/// listed too, so the selection always names an option.
fn percentage_options(config: &GridConfig, current: u8) -> Vec<OptionType> {
    let mut choices = config.percentage_choices();
    if let Err(at) = choices.binary_search(&current) {
        choices.insert(at, current);
    }
    choices
        .into_iter()
        .map(|p| OptionType::new(p.to_string(), format_whole_percent(u32::from(p))))
        .collect()
}

/// Disabled stand-ins for a slot the employee does not have.
pub fn placeholder_cells(config: &GridConfig) -> [GridCell; 3] {
    let style = color::disabled_style();
    let percentage = match config.percentage_input {
        PercentageInput::Number => {
            let format = PercentFormat::default();
            GridCell::Number(NumberCell {
                value: 0.0,
                text: format.format(0.0),
                format: Some(format),
                non_editable: true,
                nan_to_zero: false,
                style: Some(style.clone()),
            })
        }
        PercentageInput::Dropdown => GridCell::Dropdown(DropdownCell {
            is_disabled: true,
            style: Some(style.clone()),
            ..DropdownCell::default()
        }),
    };
    [
        GridCell::Dropdown(DropdownCell {
            is_disabled: true,
            style: Some(style.clone()),
            ..DropdownCell::default()
        }),
        GridCell::Text(TextCell {
            text: PLACEHOLDER_TEXT.to_string(),
            non_editable: true,
            style: Some(style),
        }),
        percentage,
    ]
}

/// Read-only sum of the employee's allocation percentages.
pub fn total_cell(employee: &EmployeeRecord) -> GridCell {
    let total = employee.total_percentage();
    let format = PercentFormat::default();
    let value = f64::from(total) / 100.0;
    GridCell::Number(NumberCell {
        value,
        text: format.format(value),
        format: Some(format),
        non_editable: true,
        nan_to_zero: false,
        style: Some(TotalStatus::of(total).style()),
    })
}
