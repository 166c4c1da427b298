//! Man-hour editor.
//!
//! `ManHourEditor` owns the current domain snapshot, the transient UI state
//! and the config. Every user action (a batch from the grid, a key press on
//! a selector, an event from a rendered select control) ends up as a batch
//! of [`CellChange`]s run through [`reconcile`], after which the snapshots
//! are replaced wholesale.

mod dropdown;
mod reconcile;
mod template;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use dropdown::{DropdownCellTemplate, SelectControl, SelectEvent};
pub use reconcile::{reconcile, reconcile_raw, EditOutcome, Reconciliation, RejectReason};
pub use template::{
    get_cell_property, keycodes, CellTemplate, Compatible, KeyDownOutcome, KeyInput,
    PropertyType,
};
#[cfg(target_arch = "wasm32")]
pub use wasm::HourGrid;

use serde_json::Value;

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::ColumnLayout;
use crate::projection::{employee_row, project, Grid};
use crate::source::{load_state, ManHourSource};
use crate::types::{
    CellChange, ColumnId, DropdownCell, EmployeeId, GridCell, ManHourState, RawCellChange, RowId,
    TransientUiState,
};

/// Editor state for one page session.
#[derive(Debug, Clone, Default)]
pub struct ManHourEditor {
    state: ManHourState,
    ui: TransientUiState,
    config: GridConfig,
    template: DropdownCellTemplate,
}

impl ManHourEditor {
    /// An editor with no data; projects to a header-only grid.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_state(state: ManHourState, config: GridConfig) -> Self {
        Self {
            state,
            config,
            ..Self::default()
        }
    }

    /// Load roster and options from `source`, replacing the current state.
    pub async fn load<S: ManHourSource>(&mut self, source: &S, scope: &[EmployeeId]) -> Result<()> {
        let state = load_state(source, scope).await?;
        self.replace_state(state);
        Ok(())
    }

    /// Swap in a new domain state. Transient UI state is discarded.
    pub fn replace_state(&mut self, state: ManHourState) {
        self.state = state;
        self.ui.clear();
    }

    pub fn state(&self) -> &ManHourState {
        &self.state
    }

    pub fn ui_state(&self) -> &TransientUiState {
        &self.ui
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
    }

    /// Project the current snapshots.
    pub fn grid(&self) -> Grid {
        project(&self.state, &self.ui, &self.config)
    }

    /// Apply a batch of edits reported by the grid.
    pub fn handle_changes(&mut self, changes: &[CellChange]) -> Vec<EditOutcome> {
        let result = reconcile(&self.state, &self.ui, changes, &self.config);
        self.commit(result)
    }

    /// Apply a batch whose coordinates have not been validated yet.
    pub fn handle_raw_changes(&mut self, changes: Vec<RawCellChange>) -> Vec<EditOutcome> {
        let result = reconcile_raw(&self.state, &self.ui, changes, &self.config);
        self.commit(result)
    }

    fn commit(&mut self, result: Reconciliation) -> Vec<EditOutcome> {
        self.state = result.state;
        self.ui = result.ui;
        result.outcomes
    }

    /// The selector cell at a grid position, if that cell is an enabled
    /// dropdown.
    pub fn dropdown_cell(&self, row: RowId, column: ColumnId) -> Option<Compatible<DropdownCell>> {
        let RowId::Employee(index) = row else {
            return None;
        };
        let employee = self.state.employees.get(index)?;
        let slots = self.state.max_slots();
        let position = ColumnLayout::column_ids(slots).position(|c| c == column)?;
        let options = self.state.options_for(&employee.id);
        let projected = employee_row(index, employee, options, &self.ui, slots, &self.config);
        let cell = projected.cells.get(position)?.as_dropdown()?.clone();
        if cell.is_disabled {
            return None;
        }
        Some(self.template.compatible(cell))
    }

    /// Select-control props for the dropdown at a grid position.
    pub fn render_dropdown(&self, row: RowId, column: ColumnId) -> Option<SelectControl> {
        let cell = self.dropdown_cell(row, column)?;
        Some(self.template.render(&cell, false))
    }

    /// Key press on a focused selector cell. `None` when the cell is not an
    /// enabled dropdown or the key changed nothing.
    pub fn key_down(
        &mut self,
        row: RowId,
        column: ColumnId,
        key: &KeyInput,
    ) -> Option<Vec<EditOutcome>> {
        let previous = self.dropdown_cell(row, column)?;
        let outcome = self.template.handle_key_down(&previous, key);
        self.commit_dropdown(row, column, previous.cell, outcome.cell.cell)
    }

    /// IME composition finished on a focused selector cell.
    pub fn composition_end(
        &mut self,
        row: RowId,
        column: ColumnId,
        data: &str,
    ) -> Option<Vec<EditOutcome>> {
        let previous = self.dropdown_cell(row, column)?;
        let outcome = self.template.handle_composition_end(&previous, data);
        self.commit_dropdown(row, column, previous.cell, outcome.cell.cell)
    }

    /// Event from the select control rendered for a selector cell.
    pub fn select_event(
        &mut self,
        row: RowId,
        column: ColumnId,
        event: &SelectEvent,
    ) -> Option<Vec<EditOutcome>> {
        let previous = self.dropdown_cell(row, column)?;
        let control = self.template.render(&previous, false);
        let next = control.on_event(&self.template, &previous, event)?;
        self.commit_dropdown(row, column, previous.cell, next.cell)
    }

    /// Merge an externally produced cell (paste, fill handle) into the
    /// selector at a grid position.
    pub fn merge_cell(
        &mut self,
        row: RowId,
        column: ColumnId,
        cell_to_merge: &Value,
    ) -> Result<Option<Vec<EditOutcome>>> {
        let Some(previous) = self.dropdown_cell(row, column) else {
            return Ok(None);
        };
        let next = self.template.update(&previous, cell_to_merge)?;
        Ok(self.commit_dropdown(row, column, previous.cell, next.cell))
    }

    fn commit_dropdown(
        &mut self,
        row: RowId,
        column: ColumnId,
        previous: DropdownCell,
        next: DropdownCell,
    ) -> Option<Vec<EditOutcome>> {
        if previous == next {
            return None;
        }
        let change = CellChange::new(
            row,
            column,
            GridCell::Dropdown(previous),
            GridCell::Dropdown(next),
        );
        Some(self.handle_changes(&[change]))
    }
}
