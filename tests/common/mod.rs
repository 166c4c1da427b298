//! Common test utilities for the man-hour grid.
//!
//! Builds the sample sheet and the cell changes a grid would report for
//! typical interactions.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use futures::executor::block_on;

use hourgrid::config::GridConfig;
use hourgrid::editor::ManHourEditor;
use hourgrid::projection::{project, Grid};
use hourgrid::source::JsonSource;
use hourgrid::types::{
    CellChange, ColumnId, DropdownCell, GridCell, ManHourState, ProjectField, RowId, TextCell,
    TransientUiState,
};

/// The built-in three-employee sheet.
///
/// | row | id | allocations                                     | total |
/// |-----|----|-------------------------------------------------|-------|
/// | 0   | 1  | general 30, userGrowth 40, manHourManagement 30 | 100   |
/// | 1   | 2  | general 30, userGrowth 40                       | 70    |
/// | 2   | 3  | userGrowth 40                                   | 40    |
pub fn fixture_state() -> ManHourState {
    block_on(JsonSource::fixture().load()).expect("fixture should load")
}

pub fn fixture_editor(config: GridConfig) -> ManHourEditor {
    ManHourEditor::with_state(fixture_state(), config)
}

pub fn fixture_grid(state: &ManHourState) -> Grid {
    project(state, &TransientUiState::new(), &GridConfig::default())
}

pub fn name_col(slot: usize) -> ColumnId {
    ColumnId::project(ProjectField::Name, slot)
}

pub fn function_col(slot: usize) -> ColumnId {
    ColumnId::project(ProjectField::Function, slot)
}

pub fn percentage_col(slot: usize) -> ColumnId {
    ColumnId::project(ProjectField::Percentage, slot)
}

pub fn cell(grid: &Grid, row: usize, column: ColumnId) -> GridCell {
    grid.cell(RowId::Employee(row), column)
        .cloned()
        .unwrap_or_else(|| panic!("no cell at row {row} column {column}"))
}

pub fn selector(grid: &Grid, row: usize, slot: usize) -> DropdownCell {
    cell(grid, row, name_col(slot))
        .as_dropdown()
        .cloned()
        .expect("selector cell")
}

/// The user opened the project selector.
pub fn open_selector(grid: &Grid, row: usize, slot: usize) -> CellChange {
    let previous = selector(grid, row, slot);
    let next = DropdownCell {
        is_open: true,
        ..previous.clone()
    };
    CellChange::new(
        RowId::Employee(row),
        name_col(slot),
        GridCell::Dropdown(previous),
        GridCell::Dropdown(next),
    )
}

/// The user picked `project` and the selector closed.
pub fn select_project(grid: &Grid, row: usize, slot: usize, project: &str) -> CellChange {
    let previous = selector(grid, row, slot);
    let next = DropdownCell {
        selected_value: Some(project.to_string()),
        is_open: false,
        input_value: None,
        ..previous.clone()
    };
    CellChange::new(
        RowId::Employee(row),
        name_col(slot),
        GridCell::Dropdown(previous),
        GridCell::Dropdown(next),
    )
}

/// The user typed a fraction into the percentage cell.
pub fn set_percentage(grid: &Grid, row: usize, slot: usize, fraction: f64) -> CellChange {
    let previous = cell(grid, row, percentage_col(slot));
    let mut next = previous.as_number().cloned().expect("percentage cell");
    next.value = fraction;
    CellChange::new(
        RowId::Employee(row),
        percentage_col(slot),
        previous,
        GridCell::Number(next),
    )
}

/// A text edit on any column.
pub fn text_edit(grid: &Grid, row: usize, column: ColumnId, text: &str) -> CellChange {
    let previous = cell(grid, row, column);
    CellChange::new(
        RowId::Employee(row),
        column,
        previous,
        GridCell::Text(TextCell {
            text: text.to_string(),
            non_editable: false,
            style: None,
        }),
    )
}

pub fn percentages(state: &ManHourState, row: usize) -> Vec<u8> {
    state
        .employee(row)
        .expect("employee")
        .allocations
        .iter()
        .map(|a| a.percentage)
        .collect()
}

pub fn project_ids(state: &ManHourState, row: usize) -> Vec<Option<String>> {
    state
        .employee(row)
        .expect("employee")
        .allocations
        .iter()
        .map(|a| a.project_id.clone())
        .collect()
}
