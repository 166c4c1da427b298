use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ColumnId, GridCell};
use crate::error::{HourgridError, Result};

const HEADER_ROW_ID: &str = "header";

/// A grid row: the header, or the employee at a position in the state.
///
/// On the wire the header is `"header"` and employee rows are their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum RowId {
    Header,
    Employee(usize),
}

impl TryFrom<Value> for RowId {
    type Error = HourgridError;

    fn try_from(value: Value) -> Result<Self> {
        match &value {
            Value::String(s) if s == HEADER_ROW_ID => Ok(Self::Header),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Self::Employee)
                .ok_or_else(|| HourgridError::InvalidRow(value.to_string())),
            _ => Err(HourgridError::InvalidRow(value.to_string())),
        }
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Header => Value::String(HEADER_ROW_ID.to_string()),
            RowId::Employee(idx) => Value::from(idx),
        }
    }
}

/// One cell-level edit reported by the grid.
///
/// The edit kind is the kind of `new_cell`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row_id: RowId,
    pub column_id: ColumnId,
    pub previous_cell: GridCell,
    pub new_cell: GridCell,
}

impl CellChange {
    pub fn new(
        row_id: RowId,
        column_id: ColumnId,
        previous_cell: GridCell,
        new_cell: GridCell,
    ) -> Self {
        Self {
            row_id,
            column_id,
            previous_cell,
            new_cell,
        }
    }
}

/// A change as it arrives from JavaScript, before its coordinates are
/// validated.
///
/// Decoding never fails on bad coordinates so that one malformed edit can be
/// rejected without losing the rest of its batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCellChange {
    pub row_id: Value,
    pub column_id: Value,
    pub previous_cell: GridCell,
    pub new_cell: GridCell,
}

impl RawCellChange {
    /// Validate the coordinates into a typed [`CellChange`].
    pub fn resolve(self) -> Result<CellChange> {
        let row_id = RowId::try_from(self.row_id)?;
        let column_id = match self.column_id {
            Value::String(s) => s.parse()?,
            other => return Err(HourgridError::InvalidColumn(other.to_string())),
        };
        Ok(CellChange {
            row_id,
            column_id,
            previous_cell: self.previous_cell,
            new_cell: self.new_cell,
        })
    }
}

impl From<CellChange> for RawCellChange {
    fn from(change: CellChange) -> Self {
        Self {
            row_id: change.row_id.into(),
            column_id: Value::String(change.column_id.to_string()),
            previous_cell: change.previous_cell,
            new_cell: change.new_cell,
        }
    }
}
