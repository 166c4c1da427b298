//! Data sources for the man-hour sheet.
//!
//! A source answers two questions: who is on the roster, and which projects
//! each employee may book against. Both are asked at once when the sheet
//! loads; the state is only built after both answers are in.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{HourgridError, Result};
use crate::numfmt::checked_percentage;
use crate::types::{EmployeeId, EmployeeRecord, ManHourState, ProjectOption};

const FIXTURE_ROSTER: &str = include_str!("../data/man_hours.json");
const FIXTURE_OPTIONS: &str = include_str!("../data/project_options.json");

/// Backend seam for the roster and the per-employee project options.
#[allow(async_fn_in_trait)]
pub trait ManHourSource {
    /// The full roster, in display order.
    async fn man_hours(&self) -> Result<Vec<EmployeeRecord>>;

    /// Option lists for the given employees. Unknown ids are left out of
    /// the result rather than failing the call.
    async fn project_options(
        &self,
        employees: &[EmployeeId],
    ) -> Result<BTreeMap<EmployeeId, Vec<ProjectOption>>>;
}

/// Fetch roster and options concurrently and build the domain state.
///
/// `scope` is the set of employees to request options for. Options for
/// employees that are not on the roster are dropped; roster entries without
/// options get an empty selector. A stored percentage above 100 fails the
/// load.
pub async fn load_state<S: ManHourSource>(
    source: &S,
    scope: &[EmployeeId],
) -> Result<ManHourState> {
    let (roster, options) =
        futures::future::join(source.man_hours(), source.project_options(scope)).await;
    build_state(roster?, options?)
}

fn build_state(
    roster: Vec<EmployeeRecord>,
    mut options: BTreeMap<EmployeeId, Vec<ProjectOption>>,
) -> Result<ManHourState> {
    check_allocations(&roster)?;
    options.retain(|id, _| roster.iter().any(|e| &e.id == id));
    let state = ManHourState::new(roster, options);

    tracing::info!(
        employees = state.len(),
        slots = state.max_slots(),
        "man-hour state loaded"
    );
    Ok(state)
}

fn check_allocations(roster: &[EmployeeRecord]) -> Result<()> {
    for employee in roster {
        for (slot, allocation) in employee.allocations.iter().enumerate() {
            if checked_percentage(i64::from(allocation.percentage)).is_none() {
                tracing::warn!(
                    employee = %employee.id,
                    slot,
                    percentage = allocation.percentage,
                    "stored percentage out of range"
                );
                return Err(HourgridError::PercentageOutOfRange(format!(
                    "{} for employee {} in slot {}",
                    allocation.percentage,
                    employee.id,
                    slot + 1
                )));
            }
        }
    }
    Ok(())
}

/// Options document: a project catalog plus the project ids each employee
/// may choose from.
#[derive(Debug, Deserialize)]
struct OptionsDocument {
    catalog: Vec<ProjectOption>,
    employees: BTreeMap<EmployeeId, Vec<String>>,
}

/// A source backed by two JSON documents held in memory.
#[derive(Debug, Clone)]
pub struct JsonSource {
    roster: String,
    options: String,
}

impl JsonSource {
    pub fn new(roster: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            roster: roster.into(),
            options: options.into(),
        }
    }

    /// The built-in three-employee sheet.
    pub fn fixture() -> Self {
        Self::new(FIXTURE_ROSTER, FIXTURE_OPTIONS)
    }

    /// Ids on the roster, used as the options scope of a full load.
    pub fn employee_ids(&self) -> Result<Vec<EmployeeId>> {
        Ok(self.parse_roster()?.into_iter().map(|e| e.id).collect())
    }

    /// Load the whole roster with options for every employee on it.
    pub async fn load(&self) -> Result<ManHourState> {
        let roster = self.parse_roster()?;
        let scope: Vec<EmployeeId> = roster.iter().map(|e| e.id.clone()).collect();
        let options = self.project_options(&scope).await?;
        build_state(roster, options)
    }

    fn parse_roster(&self) -> Result<Vec<EmployeeRecord>> {
        serde_json::from_str(&self.roster)
            .map_err(|e| HourgridError::Source(format!("roster: {e}")))
    }
}

impl ManHourSource for JsonSource {
    async fn man_hours(&self) -> Result<Vec<EmployeeRecord>> {
        self.parse_roster()
    }

    async fn project_options(
        &self,
        employees: &[EmployeeId],
    ) -> Result<BTreeMap<EmployeeId, Vec<ProjectOption>>> {
        let doc: OptionsDocument = serde_json::from_str(&self.options)
            .map_err(|e| HourgridError::Source(format!("project options: {e}")))?;

        let mut result = BTreeMap::new();
        for id in employees {
            let Some(project_ids) = doc.employees.get(id) else {
                continue;
            };
            let list = project_ids
                .iter()
                .filter_map(|pid| {
                    let found = doc.catalog.iter().find(|o| &o.id == pid);
                    if found.is_none() {
                        tracing::warn!(
                            employee = %id,
                            project = %pid,
                            "unknown project in options"
                        );
                    }
                    found.cloned()
                })
                .collect();
            result.insert(id.clone(), list);
        }
        Ok(result)
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
    use futures::executor::block_on;

    #[test]
    fn test_fixture_loads() {
        let state = block_on(JsonSource::fixture().load()).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state.max_slots(), 3);
        assert_eq!(state.options_for(&EmployeeId::from("1")).len(), 3);
    }

    #[test]
    fn test_unknown_ids_are_absent() {
        let source = JsonSource::fixture();
        let ids = [EmployeeId::from("1"), EmployeeId::from("404")];
        let options = block_on(source.project_options(&ids)).unwrap();
        assert!(options.contains_key(&EmployeeId::from("1")));
        assert!(!options.contains_key(&EmployeeId::from("404")));
    }

    #[test]
    fn test_employees_outside_scope_get_no_options() {
        let source = JsonSource::fixture();
        let ids = [EmployeeId::from("1")];
        let state = block_on(load_state(&source, &ids)).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state.options.len(), 1);
        assert!(state.options_for(&EmployeeId::from("2")).is_empty());
    }

    #[test]
    fn test_bad_roster_is_a_source_error() {
        let source = JsonSource::new("{", "{\"catalog\":[],\"employees\":{}}");
        let err = block_on(source.load()).unwrap_err();
        assert!(matches!(err, HourgridError::Source(_)));
    }

    #[test]
    fn test_full_load_scopes_options_to_roster() {
        let roster = r#"[{
            "id": "7", "employee": "王五", "department": "d", "position": "p",
            "allocations": [], "assignee": "a", "status": "s", "updatedAt": "2021-01-01"
        }]"#;
        let options = r#"{
            "catalog": [{"id":"general","name":"综合项目","function":"研发"}],
            "employees": {"7": ["general"], "8": ["general"]}
        }"#;
        let state = block_on(JsonSource::new(roster, options).load()).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.options.len(), 1);
        assert_eq!(state.options_for(&EmployeeId::from("7")).len(), 1);
    }
}
