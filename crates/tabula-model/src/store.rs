//! Canonical row collection.

#![deny(unsafe_code)]

use std::collections::BTreeSet;

use tracing::debug;

use crate::{CellValue, ColumnName, FieldEdits, Row, RowError, RowId};

/// Ordered rows with unique identifiers.
///
/// The store remembers every identifier it has held during its lifetime so
/// that generated identifiers are never reused, even after deletion.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    issued: BTreeSet<RowId>,
    next_seq: u64,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces every row. Rejects the whole batch on a duplicate id.
    pub fn replace_all(&mut self, rows: Vec<Row>) -> Result<(), RowError> {
        let mut seen = BTreeSet::new();
        for row in &rows {
            if !seen.insert(&row.id) {
                return Err(RowError::DuplicateId(row.id.to_string()));
            }
        }
        self.issued.extend(rows.iter().map(|row| row.id.clone()));
        debug!(rows = rows.len(), "rows replaced");
        self.rows = rows;
        Ok(())
    }

    /// Applies a partial field update to the row with `id`.
    pub fn merge_edit(&mut self, id: &str, edits: FieldEdits) -> Result<(), RowError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id.as_str() == id)
            .ok_or_else(|| RowError::NotFound(id.to_string()))?;
        debug!(row = id, fields = edits.len(), "row merged");
        row.merge(edits);
        Ok(())
    }

    /// Removes and returns the row with `id`.
    pub fn delete(&mut self, id: &str) -> Result<Row, RowError> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id.as_str() == id)
            .ok_or_else(|| RowError::NotFound(id.to_string()))?;
        debug!(row = id, "row deleted");
        Ok(self.rows.remove(index))
    }

    /// Appends a row under a freshly generated identifier.
    pub fn insert(&mut self, fields: FieldEdits) -> RowId {
        let id = self.next_id();
        self.issued.insert(id.clone());
        self.rows.push(Row {
            id: id.clone(),
            fields,
        });
        debug!(row = %id, "row inserted");
        id
    }

    /// Sets `column` to empty on every row that lacks it.
    pub fn backfill_column(&mut self, column: &ColumnName) {
        for row in &mut self.rows {
            row.fields
                .entry(column.clone())
                .or_insert(CellValue::Empty);
        }
    }

    /// Removes `column` from every row.
    pub fn strip_column(&mut self, column: &str) {
        for row in &mut self.rows {
            row.remove(column);
        }
    }

    /// Drops every field whose column fails `keep`.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(&ColumnName) -> bool) {
        for row in &mut self.rows {
            row.fields.retain(|column, _| keep(column));
        }
    }

    pub fn clear(&mut self) {
        debug!(rows = self.rows.len(), "rows cleared");
        self.rows.clear();
    }

    fn next_id(&mut self) -> RowId {
        loop {
            self.next_seq += 1;
            let candidate = RowId::new(self.next_seq.to_string());
            if !self.issued.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> ColumnName {
        ColumnName::new(name).unwrap()
    }

    fn store() -> RowStore {
        let mut store = RowStore::new();
        store
            .replace_all(vec![
                Row::new("1").with(col("name"), "A").with(col("role"), "Dev"),
                Row::new("2").with(col("name"), "B").with(col("role"), "QA"),
            ])
            .unwrap();
        store
    }

    #[test]
    fn replace_all_rejects_duplicates_without_change() {
        let mut store = store();
        let err = store
            .replace_all(vec![Row::new("9"), Row::new("9")])
            .unwrap_err();
        assert_eq!(err, RowError::DuplicateId("9".to_string()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_edit_then_delete_leaves_others_alone() {
        let mut store = store();
        let mut edits = FieldEdits::new();
        edits.insert(col("role"), CellValue::text("Lead"));
        store.merge_edit("1", edits).unwrap();
        assert_eq!(store.get("1").unwrap().display("role"), "Lead");

        let removed = store.delete("1").unwrap();
        assert_eq!(removed.display("role"), "Lead");
        assert!(!store.contains("1"));
        let other = store.get("2").unwrap();
        assert_eq!(other.display("name"), "B");
        assert_eq!(other.display("role"), "QA");
    }

    #[test]
    fn missing_rows_report_not_found() {
        let mut store = store();
        assert_eq!(
            store.merge_edit("42", FieldEdits::new()),
            Err(RowError::NotFound("42".to_string()))
        );
        assert_eq!(
            store.delete("42").unwrap_err(),
            RowError::NotFound("42".to_string())
        );
    }

    #[test]
    fn generated_ids_are_never_reused() {
        let mut store = store();
        let first = store.insert(FieldEdits::new());
        assert_eq!(first, "3");
        store.delete(first.as_str()).unwrap();
        let second = store.insert(FieldEdits::new());
        assert_eq!(second, "4");
    }

    #[test]
    fn column_cascades() {
        let mut store = store();
        store.backfill_column(&col("score"));
        assert!(store.rows().iter().all(|row| row.get("score") == Some(&CellValue::Empty)));
        store.strip_column("score");
        assert!(store.rows().iter().all(|row| row.get("score").is_none()));
        store.retain_columns(|column| column.as_str() == "name");
        assert!(store.rows().iter().all(|row| row.fields.len() == 1));
    }
}
