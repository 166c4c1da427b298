//! Change reconciliation.
//!
//! Maps a batch of grid edits back onto the domain model. Edits are applied
//! in order to a working copy, each seeing the effect of the ones before it.
//! Every edit gets an [`EditOutcome`]; whether a rejected edit sinks the
//! whole batch is decided once, by [`BatchPolicy`].
//!
//! Open/closed flags of dropdowns live in [`TransientUiState`] and are
//! updated as edits are seen, independently of the domain outcome.

use serde::Serialize;
use std::sync::Arc;

use crate::config::{BatchPolicy, GridConfig};
use crate::error::HourgridError;
use crate::numfmt::{checked_percentage, fraction_to_percent, parse_percent_value};
use crate::types::{
    CellChange, CellKind, ColumnId, DropdownCell, DropdownKey, EmployeeId, GridCell,
    ManHourState, NumberCell, OptionField, ProjectAllocation, ProjectField, RawCellChange, RowId,
    SelectorField, TransientUiState,
};

/// Why an edit was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum RejectReason {
    /// The row is the header or past the last employee.
    InvalidRow(String),
    /// The column id is not a known column.
    InvalidColumn(String),
    /// The slot is a placeholder for this employee.
    SlotOutOfRange {
        employee: EmployeeId,
        slot: usize,
        count: usize,
    },
    /// Not a whole number in `0..=100` (after rounding numeric input).
    InvalidPercentage { employee: EmployeeId, value: String },
    /// Total above 100 while the cap is enforced.
    TotalExceeded { employee: EmployeeId, total: u32 },
    /// A read-only column.
    NotEditable(ColumnId),
    /// Cell kind that the column does not accept.
    UnsupportedEdit { column: ColumnId, kind: CellKind },
}

impl From<RejectReason> for HourgridError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InvalidRow(row) => Self::InvalidRow(row),
            RejectReason::InvalidColumn(col) => Self::InvalidColumn(col),
            RejectReason::SlotOutOfRange {
                employee,
                slot,
                count,
            } => Self::SlotOutOfRange {
                employee,
                slot,
                count,
            },
            RejectReason::InvalidPercentage { employee, value } => {
                Self::PercentageOutOfRange(format!("{value} for employee {employee}"))
            }
            RejectReason::TotalExceeded { employee, total } => {
                Self::PercentageOutOfRange(format!("total {total} for employee {employee}"))
            }
            RejectReason::NotEditable(column) => {
                Self::Other(format!("column {column} is not editable"))
            }
            RejectReason::UnsupportedEdit { column, kind } => {
                Self::Other(format!("{kind:?} edit not supported on column {column}"))
            }
        }
    }
}

/// What happened to one edit of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "camelCase")]
pub enum EditOutcome {
    /// The domain state changed.
    Applied,
    /// Accepted without a domain change (open/close, same value, nothing
    /// selected to write through to).
    Unchanged,
    /// Not a project column; left to other collaborators.
    PassedThrough,
    Rejected(RejectReason),
}

impl EditOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result of reconciling one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: ManHourState,
    pub ui: TransientUiState,
    /// One entry per edit, in batch order. After a rollback no entry
    /// reads `Applied`; rejected edits keep their reason.
    pub outcomes: Vec<EditOutcome>,
    /// The domain part of the batch was discarded.
    pub rolled_back: bool,
}

impl Reconciliation {
    pub fn rejected(&self) -> impl Iterator<Item = &RejectReason> {
        self.outcomes.iter().filter_map(|o| match o {
            EditOutcome::Rejected(reason) => Some(reason),
            _ => None,
        })
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == EditOutcome::Applied)
            .count()
    }
}

/// Reconcile a batch of typed edits.
pub fn reconcile(
    state: &ManHourState,
    ui: &TransientUiState,
    changes: &[CellChange],
    config: &GridConfig,
) -> Reconciliation {
    let mut reconciler = Reconciler::new(state, ui, config);
    for change in changes {
        reconciler.apply(change);
    }
    reconciler.finish(state)
}

/// Reconcile a batch as decoded from the grid, validating coordinates per
/// edit. A malformed row or column rejects that edit only; the batch policy
/// decides the rest.
pub fn reconcile_raw(
    state: &ManHourState,
    ui: &TransientUiState,
    changes: Vec<RawCellChange>,
    config: &GridConfig,
) -> Reconciliation {
    let mut reconciler = Reconciler::new(state, ui, config);
    for raw in changes {
        match raw.resolve() {
            Ok(change) => reconciler.apply(&change),
            Err(err) => reconciler.reject(location_reason(err)),
        }
    }
    reconciler.finish(state)
}

fn location_reason(err: HourgridError) -> RejectReason {
    match err {
        HourgridError::InvalidRow(row) => RejectReason::InvalidRow(row),
        HourgridError::InvalidColumn(col) => RejectReason::InvalidColumn(col),
        other => RejectReason::InvalidColumn(other.to_string()),
    }
}

struct Reconciler<'a> {
    config: &'a GridConfig,
    state: ManHourState,
    ui: TransientUiState,
    outcomes: Vec<EditOutcome>,
}

impl<'a> Reconciler<'a> {
    fn new(state: &ManHourState, ui: &TransientUiState, config: &'a GridConfig) -> Self {
        Self {
            config,
            state: state.clone(),
            ui: ui.clone(),
            outcomes: Vec::new(),
        }
    }

    fn finish(self, prior: &ManHourState) -> Reconciliation {
        let mut outcomes = self.outcomes;
        let any_rejected = outcomes.iter().any(EditOutcome::is_rejected);
        let rolled_back = any_rejected && self.config.batch_policy == BatchPolicy::Atomic;
        if rolled_back {
            tracing::warn!(
                edits = outcomes.len(),
                "rejected edit in batch; discarding the batch"
            );
            for outcome in &mut outcomes {
                if *outcome == EditOutcome::Applied {
                    *outcome = EditOutcome::Unchanged;
                }
            }
        }
        Reconciliation {
            state: if rolled_back {
                prior.clone()
            } else {
                self.state
            },
            ui: self.ui,
            outcomes,
            rolled_back,
        }
    }

    fn reject(&mut self, reason: RejectReason) {
        tracing::warn!(?reason, "edit rejected");
        self.outcomes.push(EditOutcome::Rejected(reason));
    }

    fn apply(&mut self, change: &CellChange) {
        match self.dispatch(change) {
            Ok(outcome) => {
                if outcome == EditOutcome::Applied {
                    tracing::debug!(
                        row = ?change.row_id,
                        column = %change.column_id,
                        "edit applied"
                    );
                }
                self.outcomes.push(outcome);
            }
            Err(reason) => self.reject(reason),
        }
    }

    fn dispatch(&mut self, change: &CellChange) -> Result<EditOutcome, RejectReason> {
        let index = match change.row_id {
            RowId::Employee(index) if index < self.state.len() => index,
            RowId::Employee(index) => return Err(RejectReason::InvalidRow(index.to_string())),
            RowId::Header => return Err(RejectReason::InvalidRow("header".to_string())),
        };

        let (field, slot) = match change.column_id {
            ColumnId::Project { field, slot } => (field, slot),
            ColumnId::Fixed(_) => return Ok(EditOutcome::PassedThrough),
            ColumnId::Total => return Err(RejectReason::NotEditable(change.column_id)),
        };

        let (employee, count) = self
            .state
            .employee(index)
            .map(|e| (e.id.clone(), e.allocations.len()))
            .ok_or_else(|| RejectReason::InvalidRow(index.to_string()))?;
        if slot >= count {
            return Err(RejectReason::SlotOutOfRange {
                employee,
                slot,
                count,
            });
        }

        let target = Target {
            index,
            employee,
            slot,
        };
        match (field, &change.previous_cell, &change.new_cell) {
            (ProjectField::Name, previous, GridCell::Dropdown(new)) => {
                Ok(self.selector_edit(&target, previous.as_dropdown(), new))
            }
            (ProjectField::Percentage, previous, GridCell::Dropdown(new)) => {
                self.percentage_dropdown_edit(&target, previous.as_dropdown(), new)
            }
            (ProjectField::Percentage, _, GridCell::Number(new)) => {
                self.percentage_number_edit(&target, new)
            }
            (ProjectField::Name, _, GridCell::Text(new)) => {
                Ok(self.option_text_edit(&target, OptionField::Name, &new.text))
            }
            (ProjectField::Function, _, GridCell::Text(new)) => {
                Ok(self.option_text_edit(&target, OptionField::Function, &new.text))
            }
            (_, _, new) => Err(RejectReason::UnsupportedEdit {
                column: change.column_id,
                kind: new.kind(),
            }),
        }
    }

    /// Track the open flag and search buffer of a dropdown.
    fn track_dropdown(&mut self, target: &Target, field: SelectorField, new: &DropdownCell) {
        let key = DropdownKey::new(target.employee.clone(), target.slot, field);
        self.ui.set_open(key.clone(), new.is_open);
        self.ui.set_search(key, new.input_value.clone());
    }

    fn selector_edit(
        &mut self,
        target: &Target,
        previous: Option<&DropdownCell>,
        new: &DropdownCell,
    ) -> EditOutcome {
        self.track_dropdown(target, SelectorField::Project, new);

        let Some(value) = committed_value(previous, new) else {
            return EditOutcome::Unchanged;
        };
        let current = self
            .allocation(target)
            .and_then(|a| a.project_id.as_deref());
        if current == Some(value) {
            return EditOutcome::Unchanged;
        }
        let value = value.to_string();
        self.update_allocation(target, |a| a.project_id = Some(value));
        EditOutcome::Applied
    }

    fn percentage_dropdown_edit(
        &mut self,
        target: &Target,
        previous: Option<&DropdownCell>,
        new: &DropdownCell,
    ) -> Result<EditOutcome, RejectReason> {
        self.track_dropdown(target, SelectorField::Percentage, new);

        let Some(raw) = committed_value(previous, new) else {
            return Ok(EditOutcome::Unchanged);
        };
        let value = parse_percent_value(raw).ok_or_else(|| RejectReason::InvalidPercentage {
            employee: target.employee.clone(),
            value: raw.to_string(),
        })?;
        self.set_percentage(target, value)
    }

    fn percentage_number_edit(
        &mut self,
        target: &Target,
        new: &NumberCell,
    ) -> Result<EditOutcome, RejectReason> {
        let value = fraction_to_percent(new.value, new.nan_to_zero).ok_or_else(|| {
            RejectReason::InvalidPercentage {
                employee: target.employee.clone(),
                value: new.value.to_string(),
            }
        })?;
        self.set_percentage(target, value)
    }

    fn set_percentage(
        &mut self,
        target: &Target,
        value: i64,
    ) -> Result<EditOutcome, RejectReason> {
        let percentage =
            checked_percentage(value).ok_or_else(|| RejectReason::InvalidPercentage {
                employee: target.employee.clone(),
                value: value.to_string(),
            })?;

        let Some(employee) = self.state.employee(target.index) else {
            return Err(RejectReason::InvalidRow(target.index.to_string()));
        };
        let current = employee
            .allocation(target.slot)
            .map_or(0, |a| a.percentage);
        if current == percentage {
            return Ok(EditOutcome::Unchanged);
        }

        let total = employee.total_percentage() - u32::from(current) + u32::from(percentage);
        if total > 100 {
            if self.config.enforce_total_cap {
                return Err(RejectReason::TotalExceeded {
                    employee: target.employee.clone(),
                    total,
                });
            }
            tracing::warn!(
                employee = %target.employee,
                total,
                "allocations exceed 100%"
            );
        }

        self.update_allocation(target, |a| a.percentage = percentage);
        Ok(EditOutcome::Applied)
    }

    /// Write a text edit through to the selected option, replacing it in
    /// this employee's own copy of the option list.
    fn option_text_edit(
        &mut self,
        target: &Target,
        field: OptionField,
        text: &str,
    ) -> EditOutcome {
        let Some(project_id) = self
            .allocation(target)
            .and_then(|a| a.project_id.clone())
        else {
            return EditOutcome::Unchanged;
        };
        let Some(list) = self.state.options.get_mut(&target.employee) else {
            return EditOutcome::Unchanged;
        };
        let Some(position) = list.iter().position(|o| o.id == project_id) else {
            return EditOutcome::Unchanged;
        };
        let replacement = match list.get(position) {
            Some(option) if option.field(field) != text => option.with_field(field, text),
            _ => return EditOutcome::Unchanged,
        };
        if let Some(slot) = Arc::make_mut(list).get_mut(position) {
            *slot = replacement;
        }
        EditOutcome::Applied
    }

    fn allocation(&self, target: &Target) -> Option<&ProjectAllocation> {
        self.state.employee(target.index)?.allocation(target.slot)
    }

    fn update_allocation(&mut self, target: &Target, f: impl FnOnce(&mut ProjectAllocation)) {
        if let Some(record) = self.state.employees.get_mut(target.index) {
            if let Some(allocation) = Arc::make_mut(record).allocations.get_mut(target.slot) {
                f(allocation);
            }
        }
    }
}

/// The allocation an edit resolved to.
struct Target {
    index: usize,
    employee: EmployeeId,
    slot: usize,
}

/// The value a dropdown edit commits: a non-empty selection that differs
/// from the previous one, made as the dropdown closes.
fn committed_value<'c>(
    previous: Option<&DropdownCell>,
    new: &'c DropdownCell,
) -> Option<&'c str> {
    if new.is_open {
        return None;
    }
    let value = new.selected_value.as_deref().filter(|v| !v.is_empty())?;
    let previous = previous.and_then(|p| p.selected_value.as_deref());
    (previous != Some(value)).then_some(value)
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

    fn dropdown(selected: Option<&str>, is_open: bool) -> DropdownCell {
        DropdownCell {
            selected_value: selected.map(str::to_string),
            is_open,
            ..DropdownCell::default()
        }
    }

    #[test]
    fn test_committed_value_requires_close_and_change() {
        let prev = dropdown(Some("general"), true);
        assert_eq!(
            committed_value(Some(&prev), &dropdown(Some("userGrowth"), false)),
            Some("userGrowth")
        );
        assert_eq!(
            committed_value(Some(&prev), &dropdown(Some("userGrowth"), true)),
            None
        );
        assert_eq!(
            committed_value(Some(&prev), &dropdown(Some("general"), false)),
            None
        );
        assert_eq!(committed_value(Some(&prev), &dropdown(Some(""), false)), None);
        assert_eq!(
            committed_value(None, &dropdown(Some("general"), false)),
            Some("general")
        );
    }

    #[test]
    fn test_reject_reason_into_error() {
        let err: HourgridError = RejectReason::SlotOutOfRange {
            employee: EmployeeId::from("1"),
            slot: 5,
            count: 3,
        }
        .into();
        assert!(matches!(err, HourgridError::SlotOutOfRange { slot: 5, .. }));
        assert!(err.to_string().contains("employee 1"));
    }
}
