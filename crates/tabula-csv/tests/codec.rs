//! Integration tests for CSV import/export.

use proptest::prelude::*;

use tabula_csv::{ExportError, ImportError, parse, serialize};
use tabula_model::{CellValue, ColumnName, Row};

fn col(name: &str) -> ColumnName {
    ColumnName::new(name).expect("valid column")
}

#[test]
fn parses_quoted_fields() {
    let text = "name,note\nA,\"x, y\"\nB,\"say \"\"hi\"\"\"\nC,\"two\nlines\"\n";
    let parsed = parse(text).expect("parse csv");
    assert_eq!(parsed.rows.len(), 3);
    assert_eq!(parsed.rows[0].display("note"), "x, y");
    assert_eq!(parsed.rows[1].display("note"), "say \"hi\"");
    assert_eq!(parsed.rows[2].display("note"), "two\nlines");
}

#[test]
fn skips_blank_lines() {
    let parsed = parse("name,age\nA,30\n\nB,25\n\n").expect("parse csv");
    assert_eq!(parsed.rows.len(), 2);
    assert_eq!(parsed.rows[1].id, "1");
}

#[test]
fn empty_cells_become_empty_values() {
    let parsed = parse("name,age\nA,\n").expect("parse csv");
    assert_eq!(parsed.rows[0].get("age"), Some(&CellValue::Empty));
}

#[test]
fn rejects_header_only_input() {
    let err = parse("name,age\n").unwrap_err();
    assert!(matches!(err, ImportError::MalformedCsv { .. }));
    assert!(parse("").is_err());
}

#[test]
fn rejects_ragged_records() {
    let err = parse("name,age\nA,30\nB\n").unwrap_err();
    match err {
        ImportError::MalformedCsv { line, .. } => assert_eq!(line, Some(3)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_bad_headers() {
    assert!(parse("name,,age\nA,B,C\n").is_err());
    assert!(parse("name,name\nA,B\n").is_err());
    assert!(parse("id,name,id\n1,A,1\n").is_err());
}

#[test]
fn serialize_quotes_only_when_needed() {
    let rows = vec![
        Row::new("1")
            .with(col("name"), "A")
            .with(col("note"), "x, y"),
        Row::new("2")
            .with(col("name"), "B")
            .with(col("note"), "say \"hi\""),
        Row::new("3").with(col("name"), "C"),
        Row::new("4")
            .with(col("name"), "D")
            .with(col("note"), "two\nlines"),
    ];
    let text = serialize(&rows, &["name", "note"]).expect("serialize");
    insta::assert_snapshot!(text, @r#"
name,note
A,"x, y"
B,"say ""hi"""
C,
D,"two
lines"
"#);
}

#[test]
fn serialize_projects_columns_in_given_order() {
    let rows = vec![
        Row::new("7")
            .with(col("name"), "A")
            .with(col("age"), 30_i64)
            .with(col("role"), "Dev"),
    ];
    let text = serialize(&rows, &["role", "id", "age"]).expect("serialize");
    assert_eq!(text, "role,id,age\nDev,7,30\n");
}

#[test]
fn serialize_without_columns_fails() {
    let columns: [&str; 0] = [];
    let err = serialize(&[Row::new("1")], &columns).unwrap_err();
    assert!(matches!(err, ExportError::NoColumns));
}

#[test]
fn id_column_survives_round_trip() {
    let rows = vec![
        Row::new("a-1").with(col("name"), "A"),
        Row::new("b-2").with(col("name"), "B"),
    ];
    let text = serialize(&rows, &["id", "name"]).expect("serialize");
    let parsed = parse(&text).expect("parse");
    let ids: Vec<_> = parsed.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["a-1", "b-2"]);
}

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ -~]{0,12}",
        "[a-z,\" \r\n]{0,8}",
        any::<String>(),
    ]
}

fn table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 1..5)
        .prop_map(|names| {
            names
                .into_iter()
                .filter(|name| name != "id")
                .collect::<Vec<_>>()
        })
        .prop_filter("at least one column", |names| !names.is_empty())
        .prop_flat_map(|names| {
            let width = names.len();
            (
                Just(names),
                prop::collection::vec(prop::collection::vec(cell(), width), 1..16),
            )
        })
}

proptest! {
    #[test]
    fn serialize_then_parse_preserves_values((columns, cells) in table()) {
        let rows: Vec<Row> = cells
            .iter()
            .enumerate()
            .map(|(index, values)| {
                columns
                    .iter()
                    .zip(values)
                    .fold(Row::new(index.to_string()), |row, (name, value)| {
                        row.with(col(name), CellValue::text(value.as_str()))
                    })
            })
            .collect();

        let text = serialize(&rows, &columns).expect("serialize");
        let parsed = parse(&text).expect("parse");

        let header: Vec<&str> = parsed.header_columns.iter().map(ColumnName::as_str).collect();
        prop_assert_eq!(header, columns.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(parsed.rows.len(), rows.len());
        for (original, restored) in rows.iter().zip(&parsed.rows) {
            prop_assert_eq!(&original.id, &restored.id);
            for column in &columns {
                prop_assert_eq!(original.display(column), restored.display(column));
            }
        }
    }
}
