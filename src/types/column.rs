//! Typed column identifiers.
//!
//! The grid addresses columns by string ids (`employee`, `project-name-1`,
//! `total`, ...). Inside the crate every id is a [`ColumnId`], produced once
//! by the layout and parsed back exactly once when an edit arrives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HourgridError;

const PROJECT_PREFIX: &str = "project";

/// Non-allocation columns carrying a plain employee field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Employee,
    Department,
    Position,
    Assignee,
    Status,
    UpdatedAt,
}

impl FixedField {
    pub const LEADING: [Self; 3] = [Self::Employee, Self::Department, Self::Position];
    pub const TRAILING: [Self; 3] = [Self::Assignee, Self::Status, Self::UpdatedAt];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Department => "department",
            Self::Position => "position",
            Self::Assignee => "assignee",
            Self::Status => "status",
            Self::UpdatedAt => "updatedAt",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "employee" => Self::Employee,
            "department" => Self::Department,
            "position" => Self::Position,
            "assignee" => Self::Assignee,
            "status" => Self::Status,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        })
    }
}

/// The three columns of one allocation slot group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Name,
    Function,
    Percentage,
}

impl ProjectField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Function, Self::Percentage];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Function => "function",
            Self::Percentage => "percentage",
        }
    }
}

/// A grid column.
///
/// `slot` is 0-based; the string form is 1-based (`project-name-1` is slot 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnId {
    Fixed(FixedField),
    Project { field: ProjectField, slot: usize },
    Total,
}

impl ColumnId {
    pub const fn project(field: ProjectField, slot: usize) -> Self {
        Self::Project { field, slot }
    }

    pub fn is_project(self) -> bool {
        matches!(self, Self::Project { .. })
    }

    pub fn slot(self) -> Option<usize> {
        match self {
            Self::Project { slot, .. } => Some(slot),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(field) => f.write_str(field.as_str()),
            Self::Project { field, slot } => {
                write!(f, "{PROJECT_PREFIX}-{}-{}", field.as_str(), slot + 1)
            }
            Self::Total => f.write_str("total"),
        }
    }
}

impl FromStr for ColumnId {
    type Err = HourgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "total" {
            return Ok(Self::Total);
        }
        if let Some(field) = FixedField::parse(s) {
            return Ok(Self::Fixed(field));
        }

        let invalid = || HourgridError::InvalidColumn(s.to_string());
        let mut parts = s.split('-');
        if parts.next() != Some(PROJECT_PREFIX) {
            return Err(invalid());
        }
        let field = match parts.next() {
            Some("name") => ProjectField::Name,
            Some("function") => ProjectField::Function,
            Some("percentage") => ProjectField::Percentage,
            _ => return Err(invalid()),
        };
        let ordinal: usize = parts
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;
        if ordinal == 0 || parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::Project {
            field,
            slot: ordinal - 1,
        })
    }
}

impl TryFrom<String> for ColumnId {
    type Error = HourgridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColumnId> for String {
    fn from(id: ColumnId) -> Self {
        id.to_string()
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
    use test_case::test_case;

    #[test_case("employee", ColumnId::Fixed(FixedField::Employee) ; "leading fixed")]
    #[test_case("updatedAt", ColumnId::Fixed(FixedField::UpdatedAt) ; "trailing fixed")]
    #[test_case("project-name-1", ColumnId::project(ProjectField::Name, 0) ; "first name")]
    #[test_case("project-function-2", ColumnId::project(ProjectField::Function, 1) ; "second function")]
    #[test_case("project-percentage-12", ColumnId::project(ProjectField::Percentage, 11) ; "two digit slot")]
    #[test_case("total", ColumnId::Total ; "total")]
    fn test_parse_column_id(input: &str, expected: ColumnId) {
        let parsed: ColumnId = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input);
    }

    #[test_case("project-name" ; "missing slot")]
    #[test_case("project-name-0" ; "zero ordinal")]
    #[test_case("project-name-x" ; "non numeric slot")]
    #[test_case("project-owner-1" ; "unknown field")]
    #[test_case("project-name-1-2" ; "extra part")]
    #[test_case("projects-name-1" ; "bad prefix")]
    #[test_case("" ; "empty")]
    fn test_reject_malformed_column_id(input: &str) {
        let err = input.parse::<ColumnId>().unwrap_err();
        assert!(matches!(err, HourgridError::InvalidColumn(ref s) if s == input));
    }

    #[test]
    fn test_column_id_serde_uses_string_form() {
        let id = ColumnId::project(ProjectField::Percentage, 2);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"project-percentage-3\"");
        let back: ColumnId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
