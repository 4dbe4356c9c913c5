//! Staged edits with two commit modes.
//!
//! - **Batch** ("edit all"): edits for any row are buffered and applied
//!   together on save; cancel discards the whole buffer.
//! - **Row** ("edit row"): edits for one row are buffered and applied when
//!   that row is saved; cancelling the row discards only its edits.

use std::collections::BTreeMap;

use thiserror::Error;

use tabula_model::{CellValue, ColumnName, FieldEdits, RowId};

/// Errors raised by edit-session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no edit session is open")]
    NotEditing,
    #[error("row '{0}' is not being edited")]
    RowNotEditing(String),
    #[error("a batch edit is already open; save or cancel it first")]
    BatchInProgress,
}

/// Current editing mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Batch,
    Row(RowId),
}

/// Buffered, not yet committed field edits.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: EditMode,
    staged: BTreeMap<RowId, FieldEdits>,
}

impl EditSession {
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == EditMode::Idle
    }

    pub fn staged(&self) -> &BTreeMap<RowId, FieldEdits> {
        &self.staged
    }

    /// Staged value for one cell, if any.
    pub fn staged_value(&self, id: &str, column: &str) -> Option<&CellValue> {
        self.staged.get(id).and_then(|edits| edits.get(column))
    }

    /// Opens a batch edit. An open row edit is folded into the batch.
    pub fn begin_batch(&mut self) {
        self.mode = EditMode::Batch;
    }

    /// Opens a row edit. Switching rows discards the previous row's edits.
    pub fn begin_row(&mut self, id: RowId) -> Result<(), EditError> {
        match &self.mode {
            EditMode::Batch => return Err(EditError::BatchInProgress),
            EditMode::Row(current) if *current != id => {
                self.staged.remove(current);
            }
            _ => {}
        }
        self.mode = EditMode::Row(id);
        Ok(())
    }

    /// Buffers one cell value for a row that is open for editing.
    pub fn stage(
        &mut self,
        id: &RowId,
        column: ColumnName,
        value: CellValue,
    ) -> Result<(), EditError> {
        match &self.mode {
            EditMode::Batch => {}
            EditMode::Row(current) if current == id => {}
            EditMode::Row(_) => return Err(EditError::RowNotEditing(id.to_string())),
            EditMode::Idle => return Err(EditError::NotEditing),
        }
        self.staged
            .entry(id.clone())
            .or_default()
            .insert(column, value);
        Ok(())
    }

    /// Closes a batch edit and hands back every buffered row edit.
    pub fn take_batch(&mut self) -> Result<BTreeMap<RowId, FieldEdits>, EditError> {
        if self.mode != EditMode::Batch {
            return Err(EditError::NotEditing);
        }
        self.mode = EditMode::Idle;
        Ok(std::mem::take(&mut self.staged))
    }

    /// Closes the edit of `id` and hands back its buffered edits.
    pub fn take_row(&mut self, id: &str) -> Result<FieldEdits, EditError> {
        match &self.mode {
            EditMode::Row(current) if current.as_str() == id => {}
            _ => return Err(EditError::RowNotEditing(id.to_string())),
        }
        self.mode = EditMode::Idle;
        Ok(self.staged.remove(id).unwrap_or_default())
    }

    /// Discards everything and returns to idle.
    pub fn cancel(&mut self) {
        self.mode = EditMode::Idle;
        self.staged.clear();
    }

    /// Discards the edits of `id` and closes its row edit.
    pub fn cancel_row(&mut self, id: &str) -> Result<(), EditError> {
        self.take_row(id).map(|_| ())
    }

    /// Forgets a row that no longer exists.
    pub fn forget_row(&mut self, id: &str) {
        self.staged.remove(id);
        if matches!(&self.mode, EditMode::Row(current) if current.as_str() == id) {
            self.mode = EditMode::Idle;
        }
    }

    /// Forgets staged values for a column that no longer exists.
    pub fn forget_column(&mut self, column: &str) {
        for edits in self.staged.values_mut() {
            edits.remove(column);
        }
        self.staged.retain(|_, edits| !edits.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> ColumnName {
        ColumnName::new(name).unwrap()
    }

    #[test]
    fn staging_requires_an_open_session() {
        let mut session = EditSession::default();
        let err = session
            .stage(&RowId::from("1"), col("role"), CellValue::text("Lead"))
            .unwrap_err();
        assert_eq!(err, EditError::NotEditing);
    }

    #[test]
    fn batch_collects_edits_for_many_rows() {
        let mut session = EditSession::default();
        session.begin_batch();
        session
            .stage(&RowId::from("1"), col("role"), CellValue::text("Lead"))
            .unwrap();
        session
            .stage(&RowId::from("2"), col("role"), CellValue::text("Intern"))
            .unwrap();
        let staged = session.take_batch().unwrap();
        assert_eq!(staged.len(), 2);
        assert!(session.is_idle());
        assert!(session.staged().is_empty());
    }

    #[test]
    fn row_mode_only_accepts_its_row() {
        let mut session = EditSession::default();
        session.begin_row(RowId::from("1")).unwrap();
        let err = session
            .stage(&RowId::from("2"), col("role"), CellValue::Empty)
            .unwrap_err();
        assert_eq!(err, EditError::RowNotEditing("2".to_string()));
        assert!(session.take_batch().is_err());
    }

    #[test]
    fn switching_rows_discards_previous_edits() {
        let mut session = EditSession::default();
        session.begin_row(RowId::from("1")).unwrap();
        session
            .stage(&RowId::from("1"), col("role"), CellValue::text("Lead"))
            .unwrap();
        session.begin_row(RowId::from("2")).unwrap();
        assert!(session.staged_value("1", "role").is_none());
    }

    #[test]
    fn cancel_row_keeps_nothing() {
        let mut session = EditSession::default();
        session.begin_row(RowId::from("1")).unwrap();
        session
            .stage(&RowId::from("1"), col("role"), CellValue::text("Lead"))
            .unwrap();
        session.cancel_row("1").unwrap();
        assert!(session.is_idle());
        assert!(session.staged().is_empty());
    }

    #[test]
    fn row_edit_is_blocked_during_batch() {
        let mut session = EditSession::default();
        session.begin_batch();
        assert_eq!(
            session.begin_row(RowId::from("1")),
            Err(EditError::BatchInProgress)
        );
    }
}
