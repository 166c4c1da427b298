//! Structured error types for hourgrid.

use crate::types::EmployeeId;

/// All errors that can occur while loading, projecting or editing the grid.
#[derive(Debug, thiserror::Error)]
pub enum HourgridError {
    /// The row of an edit does not address an employee.
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// A column identifier that is not one of the known column kinds.
    #[error("Invalid column identifier: {0}")]
    InvalidColumn(String),

    /// An allocation slot beyond the employee's own allocation count.
    #[error("Allocation slot {slot} out of range for employee {employee} ({count} allocations)")]
    SlotOutOfRange {
        employee: EmployeeId,
        slot: usize,
        count: usize,
    },

    /// A percentage that does not fit in `0..=100`.
    #[error("Percentage out of range: {0}")]
    PercentageOutOfRange(String),

    /// A required property is missing or has the wrong type on a cell payload.
    #[error("Cell property `{property}`: {reason}")]
    CellProperty {
        property: &'static str,
        reason: String,
    },

    /// The data source failed to produce the roster or option lists.
    #[error("Data source: {0}")]
    Source(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HourgridError>;

impl From<String> for HourgridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for HourgridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<HourgridError> for wasm_bindgen::JsValue {
    fn from(e: HourgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
