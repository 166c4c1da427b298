//! Data source tests for hourgrid
//!
//! A custom `ManHourSource` checks how roster and option answers are joined
//! into the domain state.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use futures::executor::block_on;
use std::cell::Cell;
use std::collections::BTreeMap;

use hourgrid::error::{HourgridError, Result};
use hourgrid::source::{load_state, JsonSource, ManHourSource};
use hourgrid::types::{EmployeeId, EmployeeRecord, ProjectAllocation, ProjectOption};

#[derive(Default)]
struct StubSource {
    fail_options: bool,
    over_allocated: bool,
    option_calls: Cell<usize>,
}

fn record(id: &str, percentage: u8) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::from(id),
        employee: format!("employee {id}"),
        department: String::new(),
        position: String::new(),
        allocations: vec![ProjectAllocation::new(Some("p"), percentage)],
        assignee: String::new(),
        status: String::new(),
        updated_at: String::new(),
    }
}

impl ManHourSource for StubSource {
    async fn man_hours(&self) -> Result<Vec<EmployeeRecord>> {
        let b = if self.over_allocated { 150 } else { 100 };
        Ok(vec![record("a", 100), record("b", b)])
    }

    async fn project_options(
        &self,
        employees: &[EmployeeId],
    ) -> Result<BTreeMap<EmployeeId, Vec<ProjectOption>>> {
        self.option_calls.set(self.option_calls.get() + 1);
        if self.fail_options {
            return Err(HourgridError::Source("options unavailable".to_string()));
        }
        Ok(employees
            .iter()
            .map(|id| {
                let option = ProjectOption {
                    id: "p".to_string(),
                    name: format!("project for {id}"),
                    function: "研发".to_string(),
                };
                (id.clone(), vec![option])
            })
            .collect())
    }
}

#[test]
fn test_options_for_unknown_employees_are_dropped() {
    let source = StubSource::default();
    let scope = [EmployeeId::from("a"), EmployeeId::from("ghost")];
    let state = block_on(load_state(&source, &scope)).unwrap();

    assert_eq!(source.option_calls.get(), 1);
    assert_eq!(state.len(), 2);
    assert_eq!(state.options.len(), 1);
    assert_eq!(
        state.selected_option(0, 0).unwrap().name,
        "project for a"
    );
    assert!(state.selected_option(1, 0).is_none());
}

#[test]
fn test_failed_options_fail_the_load() {
    let source = StubSource {
        fail_options: true,
        ..StubSource::default()
    };
    let err = block_on(load_state(&source, &[EmployeeId::from("a")])).unwrap_err();
    assert!(matches!(err, HourgridError::Source(_)));
}

#[test]
fn test_out_of_range_percentage_fails_the_load() {
    let source = StubSource {
        over_allocated: true,
        ..StubSource::default()
    };
    let err = block_on(load_state(&source, &[EmployeeId::from("a")])).unwrap_err();
    match err {
        HourgridError::PercentageOutOfRange(detail) => {
            assert_eq!(detail, "150 for employee b in slot 1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_json_roster_above_hundred_is_rejected() {
    let roster = r#"[{
        "id": "1", "employee": "张三", "department": "d", "position": "p",
        "allocations": [
            { "projectId": "general", "percentage": 100 },
            { "projectId": "userGrowth", "percentage": 150 }
        ],
        "assignee": "a", "status": "s", "updatedAt": "2021-01-01"
    }]"#;
    let options = r#"{ "catalog": [], "employees": {} }"#;
    let err = block_on(JsonSource::new(roster, options).load()).unwrap_err();
    assert!(matches!(err, HourgridError::PercentageOutOfRange(_)));
    assert!(err.to_string().contains("150"));
}
