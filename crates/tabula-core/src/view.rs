//! Render-ready projection of engine state.

use std::borrow::Cow;
use std::collections::BTreeMap;

use tabula_model::{ColumnName, FieldEdits, Row, RowId};
use tabula_query::SortOrder;

use crate::edit::EditMode;

/// What a collaborator needs to draw the table. Owns its data.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Every registered column, in registry order.
    pub columns: Vec<ColumnName>,
    /// Columns to display, in registry order.
    pub visible_columns: Vec<ColumnName>,
    /// Rows on the current page, already filtered and sorted.
    pub rows: Vec<Row>,
    /// Rows matching the search term.
    pub total_count: usize,
    /// Rows in the store.
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub search_term: String,
    pub sort_by: Option<ColumnName>,
    pub sort_order: SortOrder,
    pub edit_mode: EditMode,
    /// Staged edits for the rows on this page.
    pub staged: BTreeMap<RowId, FieldEdits>,
}

impl View {
    /// Display value of a cell, preferring a staged edit over the stored one.
    pub fn cell<'a>(&'a self, row: &'a Row, column: &str) -> Cow<'a, str> {
        match self
            .staged
            .get(row.id.as_str())
            .and_then(|edits| edits.get(column))
        {
            Some(value) => value.display(),
            None => row.display(column),
        }
    }

    /// Whether `row` has staged edits.
    pub fn is_staged(&self, row: &Row) -> bool {
        self.staged.contains_key(row.id.as_str())
    }

    /// 1-based `(first, last)` positions of the page within the matches.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = self.page * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }
}
