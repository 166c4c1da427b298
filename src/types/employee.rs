use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identity of an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One employee's row in the man-hour sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub employee: String,
    pub department: String,
    pub position: String,
    /// Ordered allocations; index `i` is rendered in slot group `i`.
    #[serde(default)]
    pub allocations: Vec<ProjectAllocation>,
    pub assignee: String,
    pub status: String,
    pub updated_at: String,
}

impl EmployeeRecord {
    /// Sum of this employee's allocation percentages.
    ///
    /// Computed on demand; never stored on the record.
    pub fn total_percentage(&self) -> u32 {
        self.allocations
            .iter()
            .map(|a| u32::from(a.percentage))
            .sum()
    }

    pub fn allocation(&self, slot: usize) -> Option<&ProjectAllocation> {
        self.allocations.get(slot)
    }
}

/// Share of an employee's time booked against one project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAllocation {
    /// Selected project, unset until the user picks one.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Whole percent in `0..=100`, checked on load and on every edit.
    pub percentage: u8,
}

impl ProjectAllocation {
    pub fn new(project_id: Option<&str>, percentage: u8) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            percentage,
        }
    }
}

/// An assignable project as offered to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOption {
    pub id: String,
    pub name: String,
    /// Functional category label (研发, 运维, ...).
    pub function: String,
}

/// String-typed fields of a [`ProjectOption`] that a text edit may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    Name,
    Function,
}

impl ProjectOption {
    pub fn field(&self, field: OptionField) -> &str {
        match field {
            OptionField::Name => &self.name,
            OptionField::Function => &self.function,
        }
    }

    /// Copy of this option with one field replaced.
    #[must_use]
    pub fn with_field(&self, field: OptionField, value: &str) -> Self {
        let mut next = self.clone();
        match field {
            OptionField::Name => next.name = value.to_string(),
            OptionField::Function => next.function = value.to_string(),
        }
        next
    }
}

/// Option list attached to one employee.
///
/// Lists start out shared between employees; an edit clones the list for the
/// edited employee only (`Arc::make_mut`).
pub type OptionList = Arc<Vec<ProjectOption>>;
