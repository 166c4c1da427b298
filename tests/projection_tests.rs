//! Grid projection tests for hourgrid
//!
//! Shape of the grid, slot placeholders, derived function labels, totals and
//! header colors, all checked against the sample sheet.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

use hourgrid::color;
use hourgrid::config::{GridConfig, PercentageInput};
use hourgrid::projection::{header_text, project, TotalStatus, PLACEHOLDER_TEXT};
use hourgrid::types::{
    ColumnId, DropdownKey, EmployeeId, EmployeeRecord, FixedField, GridCell, ManHourState,
    ProjectAllocation, RowId, SelectorField, TransientUiState,
};

fn record(id: &str, allocations: Vec<ProjectAllocation>) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::from(id),
        employee: format!("employee {id}"),
        department: "dept".to_string(),
        position: "dev".to_string(),
        allocations,
        assignee: "admin".to_string(),
        status: "draft".to_string(),
        updated_at: "2021-01-01".to_string(),
    }
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_columns_follow_longest_allocation_list() {
    let state = fixture_state();
    let grid = fixture_grid(&state);

    assert_eq!(grid.slots(), 3);
    assert_eq!(grid.columns.len(), 3 + 3 * 3 + 3 + 1);
    assert_eq!(grid.rows.len(), 4);
    assert!(grid.rows.iter().all(|r| r.cells.len() == grid.columns.len()));

    let ids: Vec<String> = grid.columns.iter().map(|c| c.column_id.to_string()).collect();
    assert_eq!(
        ids,
        vec![
            "employee",
            "department",
            "position",
            "project-name-1",
            "project-function-1",
            "project-percentage-1",
            "project-name-2",
            "project-function-2",
            "project-percentage-2",
            "project-name-3",
            "project-function-3",
            "project-percentage-3",
            "assignee",
            "status",
            "updatedAt",
            "total",
        ]
    );
}

#[test]
fn test_empty_state_projects_header_only() {
    let grid = project(
        &ManHourState::default(),
        &TransientUiState::new(),
        &GridConfig::default(),
    );
    assert_eq!(grid.slots(), 0);
    assert_eq!(grid.rows.len(), 1);
    assert_eq!(grid.rows[0].row_id, RowId::Header);
    assert_eq!(grid.columns.len(), 7);
}

#[test]
fn test_header_labels() {
    assert_eq!(header_text(ColumnId::Fixed(FixedField::Employee)), "员工");
    assert_eq!(header_text(ColumnId::Fixed(FixedField::Department)), "所属部门");
    assert_eq!(header_text(name_col(0)), "项目1");
    assert_eq!(header_text(name_col(2)), "项目3");
    assert_eq!(header_text(function_col(0)), "职能");
    assert_eq!(header_text(percentage_col(0)), "占比");
    assert_eq!(header_text(ColumnId::Total), "合计");
}

#[test]
fn test_sticky_regions_from_config() {
    let state = fixture_state();
    let grid = fixture_grid(&state);
    assert_eq!(grid.sticky_top_rows, 1);
    assert_eq!(grid.sticky_left_columns, 3);
    assert!(grid.rows.iter().all(|r| r.height == 35));
}

// ============================================================================
// Allocation cells
// ============================================================================

#[test]
fn test_selector_lists_employee_options() {
    let state = fixture_state();
    let grid = fixture_grid(&state);
    let cell = selector(&grid, 0, 1);

    assert_eq!(cell.selected_value.as_deref(), Some("userGrowth"));
    assert!(!cell.is_disabled);
    assert!(!cell.is_open);
    let labels: Vec<&str> = cell.values.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["综合项目", "用户增长", "工时管理"]);
}

#[test]
fn test_function_label_is_derived_from_selection() {
    let state = fixture_state();
    let grid = fixture_grid(&state);

    let function = cell(&grid, 0, function_col(1));
    assert_eq!(function.text(), "运维");
    assert!(!function.is_editable());

    assert_eq!(cell(&grid, 0, function_col(0)).text(), "研发");
}

#[test]
fn test_unselected_slot_has_empty_function() {
    let state = ManHourState::new(
        vec![record("9", vec![ProjectAllocation::new(None, 50)])],
        BTreeMap::new(),
    );
    let grid = fixture_grid(&state);
    assert_eq!(selector(&grid, 0, 0).selected_value, None);
    assert!(selector(&grid, 0, 0).values.is_empty());
    assert_eq!(cell(&grid, 0, function_col(0)).text(), "");
}

#[test]
fn test_percentage_as_fraction() {
    let state = fixture_state();
    let grid = fixture_grid(&state);
    let number = cell(&grid, 1, percentage_col(1));
    let number = number.as_number().unwrap();
    assert_eq!(number.value, 0.4);
    assert_eq!(number.text, "40%");
    assert!(!number.non_editable);
}

#[test]
fn test_percentage_as_dropdown() {
    let config = GridConfig {
        percentage_input: PercentageInput::Dropdown,
        percentage_step: 25,
        ..GridConfig::default()
    };
    let state = fixture_state();
    let grid = project(&state, &TransientUiState::new(), &config);
    let cell = cell(&grid, 0, percentage_col(0));
    let dropdown = cell.as_dropdown().unwrap();

    // 30 is off the 25 grid but still offered, in order.
    assert_eq!(dropdown.selected_value.as_deref(), Some("30"));
    let values: Vec<&str> = dropdown.values.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["0", "25", "30", "50", "75", "100"]);
    assert_eq!(dropdown.values[1].label, "25%");
    assert_eq!(
        dropdown.selected_option().map(|o| o.label.as_str()),
        Some("30%")
    );
}

#[test]
fn test_percentage_dropdown_on_grid_value_is_not_duplicated() {
    let config = GridConfig {
        percentage_input: PercentageInput::Dropdown,
        percentage_step: 20,
        ..GridConfig::default()
    };
    let state = fixture_state();
    let grid = project(&state, &TransientUiState::new(), &config);

    // Employee 1 slot 2 holds 40, which is on the 20 grid.
    let cell = cell(&grid, 0, percentage_col(1));
    let dropdown = cell.as_dropdown().unwrap();
    let values: Vec<&str> = dropdown.values.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["0", "20", "40", "60", "80", "100"]);
}

// ============================================================================
// Placeholders
// ============================================================================

#[test]
fn test_slots_beyond_allocation_count_are_placeholders() {
    let state = fixture_state();
    let grid = fixture_grid(&state);

    // Employee 3 has one allocation; slots 2 and 3 are placeholders.
    for slot in 1..3 {
        let dropdown = selector(&grid, 2, slot);
        assert!(dropdown.is_disabled);
        assert!(dropdown.values.is_empty());
        assert_eq!(
            dropdown.style.as_ref().and_then(|s| s.background_color.as_deref()),
            Some(color::DISABLED_BACKGROUND)
        );

        assert_eq!(cell(&grid, 2, function_col(slot)).text(), PLACEHOLDER_TEXT);

        let pct = cell(&grid, 2, percentage_col(slot));
        assert!(!pct.is_editable());
        assert_eq!(pct.as_number().unwrap().value, 0.0);
    }

    assert!(!selector(&grid, 2, 0).is_disabled);
}

// ============================================================================
// Fixed columns and totals
// ============================================================================

#[test]
fn test_leading_columns_are_read_only() {
    let state = fixture_state();
    let grid = fixture_grid(&state);
    let name = cell(&grid, 0, ColumnId::Fixed(FixedField::Employee));
    assert_eq!(name.text(), "张三");
    assert!(!name.is_editable());
    assert_eq!(
        name.style().and_then(|s| s.background_color.as_deref()),
        Some(color::NON_EDITABLE_BACKGROUND)
    );

    let status = cell(&grid, 0, ColumnId::Fixed(FixedField::Status));
    assert_eq!(status.text(), "进行中");
    assert!(status.is_editable());
}

#[test]
fn test_total_complete_and_incomplete() {
    let state = fixture_state();
    let grid = fixture_grid(&state);

    let full = cell(&grid, 0, ColumnId::Total);
    assert_eq!(full.text(), "100%");
    assert!(!full.is_editable());
    assert_eq!(full.style(), Some(&TotalStatus::Complete.style()));

    let partial = cell(&grid, 1, ColumnId::Total);
    assert_eq!(partial.text(), "70%");
    assert_eq!(partial.style(), Some(&TotalStatus::Incomplete.style()));
}

#[test]
fn test_total_above_hundred_is_incomplete() {
    let state = ManHourState::new(
        vec![record(
            "9",
            vec![
                ProjectAllocation::new(Some("a"), 60),
                ProjectAllocation::new(Some("b"), 60),
            ],
        )],
        BTreeMap::new(),
    );
    let grid = fixture_grid(&state);
    let total = cell(&grid, 0, ColumnId::Total);
    assert_eq!(total.text(), "120%");
    assert_eq!(TotalStatus::of(120), TotalStatus::Incomplete);
    assert_eq!(total.style(), Some(&TotalStatus::Incomplete.style()));
}

// ============================================================================
// Header colors
// ============================================================================

#[test]
fn test_slot_headers_share_group_color() {
    let state = fixture_state();
    let grid = fixture_grid(&state);
    let header = grid.row(RowId::Header).unwrap();

    let background = |column: ColumnId| {
        let idx = grid.columns.iter().position(|c| c.column_id == column).unwrap();
        header.cells[idx]
            .style()
            .and_then(|s| s.background_color.clone())
    };

    for slot in 0..3 {
        let expected = Some(color::slot_group_color(slot));
        assert_eq!(background(name_col(slot)), expected);
        assert_eq!(background(function_col(slot)), expected);
        assert_eq!(background(percentage_col(slot)), expected);
    }
    assert_ne!(background(name_col(0)), background(name_col(1)));
    assert_eq!(background(ColumnId::Fixed(FixedField::Employee)), None);
    assert!(matches!(header.cells[0], GridCell::Header(_)));
}

// ============================================================================
// Transient state
// ============================================================================

#[test]
fn test_open_flag_and_search_are_projected() {
    let state = fixture_state();
    let mut ui = TransientUiState::new();
    let key = DropdownKey::new(EmployeeId::from("2"), 1, SelectorField::Project);
    ui.set_open(key.clone(), true);
    ui.set_search(key, Some("用户".to_string()));

    let grid = project(&state, &ui, &GridConfig::default());
    let open = selector(&grid, 1, 1);
    assert!(open.is_open);
    assert_eq!(open.input_value.as_deref(), Some("用户"));

    assert!(!selector(&grid, 1, 0).is_open);
    assert!(!selector(&grid, 0, 1).is_open);
}

#[test]
fn test_projection_is_pure() {
    let state = fixture_state();
    let before = state.clone();
    let first = fixture_grid(&state);
    let second = fixture_grid(&state);
    assert_eq!(first, second);
    assert_eq!(state, before);
}
