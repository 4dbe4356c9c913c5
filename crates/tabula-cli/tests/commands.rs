//! Integration tests running CLI commands against a temporary state directory.

use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use tabula_cli::cli::Cli;
use tabula_cli::commands::{Outcome, Output, Workspace, run};
use tabula_cli::render::{RenderOptions, render_columns, render_view};
use tabula_core::{EngineConfig, View};

fn tabula(dir: &Path, args: &[&str]) -> anyhow::Result<Outcome> {
    let state_dir = dir.join("state");
    let mut argv = vec!["tabula", "--state-dir", state_dir.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    let config = EngineConfig::default().with_page_size(cli.page_size);
    let mut workspace = Workspace::open(&cli.state_dir(), config);
    run(&mut workspace, &cli.command)
}

fn view(outcome: Outcome) -> View {
    match outcome.output {
        Output::View(view) => view,
        other => panic!("expected a table view, got {other:?}"),
    }
}

fn write_csv(dir: &Path, text: &str) -> String {
    let path = dir.join("people.csv");
    fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn demo_survives_between_invocations() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    let shown = view(tabula(dir.path(), &["show"]).unwrap());
    assert_eq!(shown.total_rows, 10);
    assert_eq!(shown.rows[0].display("name"), "Sandeep");
    assert!(dir.path().join("state/tabula-table.snapshot").exists());
}

#[test]
fn import_and_sort_render_as_markdown() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(dir.path(), "id,name,age\n1,A,30\n2,B,25\n");
    tabula(dir.path(), &["import", &csv]).unwrap();

    let sorted = view(tabula(dir.path(), &["sort", "age"]).unwrap());
    insta::assert_snapshot!(render_view(&sorted, RenderOptions::plain()), @r"
| id | name | age ^ |
|----|------|-------|
| 2  | B    | 25    |
| 1  | A    | 30    |
Showing 1-2 of 2 rows (page 1 of 1)
Sorted by age (ascending).
");
}

#[test]
fn search_is_remembered_and_cleared() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    tabula(dir.path(), &["search", "ravi"]).unwrap();

    let shown = view(tabula(dir.path(), &["show"]).unwrap());
    assert_eq!(shown.total_count, 1);
    assert_eq!(shown.search_term, "ravi");

    let cleared = view(tabula(dir.path(), &["search"]).unwrap());
    assert_eq!(cleared.total_count, 10);
}

#[test]
fn paging_uses_one_based_page_numbers() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    let page = view(tabula(dir.path(), &["--page-size", "4", "show", "--page", "3"]).unwrap());
    assert_eq!(page.page, 2);
    let ids: Vec<&str> = page.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["9", "10"]);
}

#[test]
fn delete_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    let error = tabula(dir.path(), &["delete", "1"]).unwrap_err();
    assert!(error.to_string().contains("--yes"));
    assert_eq!(view(tabula(dir.path(), &["show"]).unwrap()).total_rows, 10);

    let deleted = view(tabula(dir.path(), &["delete", "1", "--yes"]).unwrap());
    assert_eq!(deleted.total_rows, 9);
}

#[test]
fn deleting_a_missing_row_only_warns() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    let outcome = tabula(dir.path(), &["delete", "99", "--yes"]).unwrap();
    assert_eq!(outcome.warnings, ["row '99' not found"]);
    assert_eq!(view(outcome).total_rows, 10);
}

#[test]
fn edit_saves_one_row() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    tabula(dir.path(), &["edit", "2", "role=Lead", "age=31"]).unwrap();

    let shown = view(tabula(dir.path(), &["show"]).unwrap());
    let ravi = shown.rows.iter().find(|row| row.id == "2").unwrap();
    assert_eq!(ravi.display("role"), "Lead");
    assert_eq!(ravi.display("age"), "31");
}

#[test]
fn edit_with_unknown_column_changes_nothing() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    assert!(tabula(dir.path(), &["edit", "2", "role=Lead", "score=9"]).is_err());
    let shown = view(tabula(dir.path(), &["show"]).unwrap());
    assert_eq!(shown.rows[1].display("role"), "Manager");
}

#[test]
fn edit_all_skips_missing_rows_with_a_warning() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();

    let outcome = tabula(dir.path(), &["edit-all", "1:role=Lead", "42:role=Ghost"]).unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    let edited = view(outcome);
    assert_eq!(edited.rows[0].display("role"), "Lead");
}

#[test]
fn add_row_fills_missing_columns() {
    let dir = TempDir::new().unwrap();
    let added = view(tabula(dir.path(), &["add-row", "name=Zoe", "age=22"]).unwrap());
    assert_eq!(added.total_rows, 1);
    assert_eq!(added.rows[0].display("email"), "");
    assert_eq!(added.rows[0].display("name"), "Zoe");
}

#[test]
fn columns_list_reflects_changes() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    tabula(dir.path(), &["columns", "add", "score"]).unwrap();
    tabula(dir.path(), &["columns", "toggle", "email"]).unwrap();
    tabula(dir.path(), &["sort", "age"]).unwrap();
    tabula(dir.path(), &["sort", "age"]).unwrap();

    let Output::Columns(columns) = tabula(dir.path(), &["columns", "list"]).unwrap().output else {
        panic!("expected column list");
    };
    insta::assert_snapshot!(render_columns(&columns, RenderOptions::plain()), @r"
| Column | Visible | Sort       |
|--------|---------|------------|
| name   | yes     | -          |
| email  | no      | -          |
| age    | yes     | descending |
| role   | yes     | -          |
| score  | yes     | -          |
");
}

#[test]
fn export_writes_visible_columns() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(dir.path(), "name,note\nA,\"x, y\"\nB,plain\n");
    tabula(dir.path(), &["import", &csv]).unwrap();
    tabula(dir.path(), &["columns", "toggle", "name"]).unwrap();

    let target = dir.path().join("out.csv");
    let outcome = tabula(dir.path(), &["export", "-o", target.to_str().unwrap()]).unwrap();
    assert!(matches!(outcome.output, Output::Exported { .. }));
    assert_eq!(fs::read_to_string(&target).unwrap(), "note\n\"x, y\"\nplain\n");
}

#[test]
fn export_to_stdout_returns_csv() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    let Output::Csv(csv) = tabula(dir.path(), &["export"]).unwrap().output else {
        panic!("expected csv output");
    };
    assert!(csv.starts_with("name,email,age,role\nSandeep,sandeep@example.com,25,Developer\n"));
}

#[test]
fn malformed_import_keeps_the_saved_table() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    let csv = write_csv(dir.path(), "name,age\nA,1,extra\n");

    let error = tabula(dir.path(), &["import", &csv]).unwrap_err();
    assert!(format!("{error:#}").contains("malformed CSV"));
    assert_eq!(view(tabula(dir.path(), &["show"]).unwrap()).total_rows, 10);
}

#[test]
fn corrupt_snapshot_starts_fresh() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    let workspace = Workspace::open(&dir.path().join("state"), EngineConfig::default());
    fs::write(workspace.snapshot_path(), "garbage").unwrap();

    let shown = view(tabula(dir.path(), &["show"]).unwrap());
    assert_eq!(shown.total_rows, 0);
    assert_eq!(shown.columns.len(), 4);
}

#[test]
fn clear_keeps_columns() {
    let dir = TempDir::new().unwrap();
    tabula(dir.path(), &["demo"]).unwrap();
    let cleared = view(tabula(dir.path(), &["clear"]).unwrap());
    assert_eq!(cleared.total_rows, 0);
    assert_eq!(cleared.visible_columns.len(), 4);
    assert!(tabula(dir.path(), &["export"]).is_err());
}
