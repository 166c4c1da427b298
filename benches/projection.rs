//! Benchmarks for grid projection and change reconciliation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeMap;

use hourgrid::config::GridConfig;
use hourgrid::editor::reconcile;
use hourgrid::projection::project;
use hourgrid::types::{
    CellChange, ColumnId, DropdownCell, EmployeeId, EmployeeRecord, GridCell, ManHourState,
    ProjectAllocation, ProjectField, ProjectOption, RowId, TransientUiState,
};

const PROJECTS: [&str; 5] = ["general", "userGrowth", "manHourManagement", "billing", "search"];

/// A sheet of `employees` rows with one to five allocations each.
fn synthetic_state(employees: usize) -> ManHourState {
    let catalog: Vec<ProjectOption> = PROJECTS
        .iter()
        .map(|id| ProjectOption {
            id: (*id).to_string(),
            name: format!("Project {id}"),
            function: "研发".to_string(),
        })
        .collect();

    let mut roster = Vec::with_capacity(employees);
    let mut options = BTreeMap::new();
    for i in 0..employees {
        let id = EmployeeId::new(i.to_string());
        let slots = i % PROJECTS.len() + 1;
        let allocations = PROJECTS
            .iter()
            .take(slots)
            .map(|p| ProjectAllocation::new(Some(*p), (100 / slots) as u8))
            .collect();
        roster.push(EmployeeRecord {
            id: id.clone(),
            employee: format!("Employee {i}"),
            department: "Engineering".to_string(),
            position: "Developer".to_string(),
            allocations,
            assignee: "admin".to_string(),
            status: "submitted".to_string(),
            updated_at: "2024-01-01 12:00".to_string(),
        });
        options.insert(id, catalog.clone());
    }
    ManHourState::new(roster, options)
}

fn bench_project(c: &mut Criterion) {
    let config = GridConfig::default();
    let ui = TransientUiState::new();

    let mut group = c.benchmark_group("project");
    for employees in [10usize, 100, 1000] {
        let state = synthetic_state(employees);
        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(BenchmarkId::from_parameter(employees), &state, |b, state| {
            b.iter(|| project(black_box(state), &ui, &config))
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let config = GridConfig::default();
    let ui = TransientUiState::new();
    let state = synthetic_state(1000);
    let grid = project(&state, &ui, &config);

    // Re-select the last project in slot 0 of every row.
    let column = ColumnId::project(ProjectField::Name, 0);
    let changes: Vec<CellChange> = (0..state.len())
        .map(|row| {
            let previous = grid
                .cell(RowId::Employee(row), column)
                .and_then(GridCell::as_dropdown)
                .cloned()
                .expect("selector cell");
            let next = DropdownCell {
                selected_value: PROJECTS.last().map(|p| (*p).to_string()),
                ..previous.clone()
            };
            CellChange::new(
                RowId::Employee(row),
                column,
                GridCell::Dropdown(previous),
                GridCell::Dropdown(next),
            )
        })
        .collect();

    let mut group = c.benchmark_group("reconcile");
    group.throughput(Throughput::Elements(changes.len() as u64));
    group.bench_function("select_1000", |b| {
        b.iter(|| reconcile(black_box(&state), &ui, black_box(&changes), &config))
    });
    group.finish();
}

criterion_group!(benches, bench_project, bench_reconcile);

criterion_main!(benches);
