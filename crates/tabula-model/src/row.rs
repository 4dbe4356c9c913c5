#![deny(unsafe_code)]

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::{CellValue, ColumnName, ID_COLUMN, RowId};

/// A partial field update keyed by column.
pub type FieldEdits = BTreeMap<ColumnName, CellValue>;

/// A single table row: an identifier plus an open map of fields.
///
/// Fields absent from the map read as empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub fields: BTreeMap<ColumnName, CellValue>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, column: ColumnName, value: impl Into<CellValue>) -> Self {
        self.fields.insert(column, value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Display form of a field; the `id` pseudo-column reads the identifier.
    pub fn display(&self, column: &str) -> Cow<'_, str> {
        if column == ID_COLUMN {
            return Cow::Borrowed(self.id.as_str());
        }
        self.fields
            .get(column)
            .map_or(Cow::Borrowed(""), CellValue::display)
    }

    pub fn set(&mut self, column: ColumnName, value: CellValue) {
        self.fields.insert(column, value);
    }

    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.fields.remove(column)
    }

    /// Applies a partial update, overwriting the named fields only.
    pub fn merge(&mut self, edits: FieldEdits) {
        self.fields.extend(edits);
    }
}
