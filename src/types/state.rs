use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{EmployeeId, EmployeeRecord, OptionList, ProjectOption};

/// The canonical in-memory man-hour sheet.
///
/// Snapshots are replaced wholesale by the reconciler. Cloning a snapshot is
/// shallow: records and option lists are reference-counted and only the ones
/// an edit touches get copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManHourState {
    pub employees: Vec<Arc<EmployeeRecord>>,
    /// Assignable projects per employee. Employees without an entry get an
    /// empty selector.
    pub options: BTreeMap<EmployeeId, OptionList>,
}

impl ManHourState {
    pub fn new(
        employees: Vec<EmployeeRecord>,
        options: BTreeMap<EmployeeId, Vec<ProjectOption>>,
    ) -> Self {
        Self {
            employees: employees.into_iter().map(Arc::new).collect(),
            options: options
                .into_iter()
                .map(|(id, list)| (id, Arc::new(list)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Number of allocation slot groups the grid needs: the longest
    /// allocation sequence across all employees.
    pub fn max_slots(&self) -> usize {
        self.employees
            .iter()
            .map(|e| e.allocations.len())
            .max()
            .unwrap_or(0)
    }

    pub fn employee(&self, index: usize) -> Option<&EmployeeRecord> {
        self.employees.get(index).map(AsRef::as_ref)
    }

    pub fn options_for(&self, id: &EmployeeId) -> &[ProjectOption] {
        self.options.get(id).map_or(&[], |list| list.as_slice())
    }

    /// The option currently selected in `slot` of the employee at `index`.
    pub fn selected_option(&self, index: usize, slot: usize) -> Option<&ProjectOption> {
        let employee = self.employee(index)?;
        let project_id = employee.allocation(slot)?.project_id.as_deref()?;
        self.options_for(&employee.id)
            .iter()
            .find(|o| o.id == project_id)
    }
}
