//! Column layout of the man-hour grid.
//!
//! Three leading employee columns, one `name/function/percentage` triple per
//! allocation slot, three trailing columns and the total. The slot count is
//! the only input that changes with the data.

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::types::{ColumnId, FixedField, ProjectField};

/// One column as handed to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub column_id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// Ordered columns for a given slot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<GridColumn>,
    slots: usize,
}

impl ColumnLayout {
    pub fn new(slots: usize, config: &GridConfig) -> Self {
        let widths = &config.column_widths;
        let columns = Self::column_ids(slots)
            .map(|column_id| GridColumn {
                column_id,
                width: widths.width_of(column_id),
            })
            .collect();
        Self { columns, slots }
    }

    /// Column ids in display order.
    pub fn column_ids(slots: usize) -> impl Iterator<Item = ColumnId> {
        let leading = FixedField::LEADING.into_iter().map(ColumnId::Fixed);
        let projects = (0..slots).flat_map(|slot| {
            ProjectField::ALL
                .into_iter()
                .map(move |field| ColumnId::project(field, slot))
        });
        let trailing = FixedField::TRAILING.into_iter().map(ColumnId::Fixed);
        leading
            .chain(projects)
            .chain(trailing)
            .chain(std::iter::once(ColumnId::Total))
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `column` in the layout.
    pub fn index_of(&self, column: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.column_id == column)
    }

    pub fn column_at(&self, index: usize) -> Option<ColumnId> {
        self.columns.get(index).map(|c| c.column_id)
    }

    pub fn into_columns(self) -> Vec<GridColumn> {
        self.columns
    }
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

    #[test]
    fn test_layout_without_slots() {
        let layout = ColumnLayout::new(0, &GridConfig::default());
        let ids: Vec<String> = layout
            .columns()
            .iter()
            .map(|c| c.column_id.to_string())
            .collect();
        assert_eq!(
            ids,
            [
                "employee",
                "department",
                "position",
                "assignee",
                "status",
                "updatedAt",
                "total"
            ]
        );
    }

    #[test]
    fn test_layout_with_slots() {
        let layout = ColumnLayout::new(2, &GridConfig::default());
        assert_eq!(layout.len(), 3 + 2 * 3 + 4);
        assert_eq!(
            layout.column_at(3),
            Some(ColumnId::project(ProjectField::Name, 0))
        );
        assert_eq!(
            layout.column_at(8),
            Some(ColumnId::project(ProjectField::Percentage, 1))
        );
        assert_eq!(layout.index_of(ColumnId::Total), Some(12));
    }

    #[test]
    fn test_layout_widths() {
        let layout = ColumnLayout::new(1, &GridConfig::default());
        let widths: Vec<Option<u32>> = layout.columns().iter().map(|c| c.width).collect();
        assert_eq!(
            widths,
            [
                Some(120),
                None,
                Some(120),
                Some(120),
                Some(120),
                Some(80),
                Some(120),
                Some(120),
                Some(120),
                Some(80)
            ]
        );
    }
}
