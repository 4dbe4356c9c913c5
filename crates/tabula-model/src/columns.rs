//! Ordered column registry with a visibility subset.

#![deny(unsafe_code)]

use std::collections::BTreeSet;

use tracing::debug;

use crate::{ColumnError, ColumnName};

/// Known columns in display order plus the subset currently visible.
///
/// `visible` is always a subset of `columns` and always kept in registry
/// order, so it can be used directly as an export projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<ColumnName>,
    visible: Vec<ColumnName>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where every column is visible.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = validate_columns(columns)?;
        Ok(Self {
            visible: columns.clone(),
            columns,
        })
    }

    /// Registry with an explicit visibility list.
    ///
    /// Visible names that are not registered are dropped.
    pub fn with_visibility<I, S, V>(columns: I, visible: V) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        V: IntoIterator<Item = S>,
    {
        let columns = validate_columns(columns)?;
        let wanted: BTreeSet<String> = visible
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();
        let visible = columns
            .iter()
            .filter(|column| wanted.contains(column.as_str()))
            .cloned()
            .collect();
        Ok(Self { columns, visible })
    }

    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    pub fn visible_columns(&self) -> &[ColumnName] {
        &self.visible
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.iter().any(|column| column == name)
    }

    /// Resolves a raw name to the registered column.
    pub fn resolve(&self, name: &str) -> Result<&ColumnName, ColumnError> {
        let trimmed = name.trim();
        self.columns
            .iter()
            .find(|column| *column == trimmed)
            .ok_or_else(|| ColumnError::Unknown(trimmed.to_string()))
    }

    /// Appends a new visible column.
    pub fn add_column(&mut self, name: &str) -> Result<ColumnName, ColumnError> {
        let column = ColumnName::new(name)?;
        if self.contains(column.as_str()) {
            return Err(ColumnError::Duplicate(column.into()));
        }
        self.columns.push(column.clone());
        self.visible.push(column.clone());
        debug!(column = %column, "column added");
        Ok(column)
    }

    /// Removes a column from both lists. Returns false when it was unknown.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|column| column != name);
        self.visible.retain(|column| column != name);
        let removed = self.columns.len() != before;
        if removed {
            debug!(column = name, "column removed");
        }
        removed
    }

    /// Flips visibility of a registered column.
    ///
    /// Returns the new visibility, or `None` when the column is unknown.
    pub fn toggle_visible(&mut self, name: &str) -> Option<bool> {
        if !self.contains(name) {
            return None;
        }
        if self.is_visible(name) {
            self.visible.retain(|column| column != name);
            debug!(column = name, "column hidden");
            return Some(false);
        }
        let visible = &self.visible;
        self.visible = self
            .columns
            .iter()
            .filter(|column| *column == name || visible.contains(column))
            .cloned()
            .collect();
        debug!(column = name, "column shown");
        Some(true)
    }

    /// Replaces the column list wholesale.
    ///
    /// Visibility is filtered to the columns that still exist; newly named
    /// columns start hidden. Returns the columns that were dropped.
    pub fn set_columns<I, S>(&mut self, columns: I) -> Result<Vec<ColumnName>, ColumnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = validate_columns(columns)?;
        let dropped = self
            .columns
            .iter()
            .filter(|column| !columns.contains(column))
            .cloned()
            .collect();
        let visible = &self.visible;
        self.visible = columns
            .iter()
            .filter(|column| visible.contains(column))
            .cloned()
            .collect();
        self.columns = columns;
        Ok(dropped)
    }
}

fn validate_columns<I, S>(columns: I) -> Result<Vec<ColumnName>, ColumnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut validated = Vec::new();
    for raw in columns {
        let column = ColumnName::new(raw)?;
        if !seen.insert(column.clone()) {
            return Err(ColumnError::Duplicate(column.into()));
        }
        validated.push(column);
    }
    Ok(validated)
}
