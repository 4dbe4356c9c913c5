use thiserror::Error;

use tabula_csv::{ExportError, ImportError};
use tabula_model::{ColumnError, RowError};
use tabula_persistence::PersistenceError;

use crate::edit::EditError;

/// Anything an intent can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error(transparent)]
    Row(#[from] RowError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("snapshot rejected: {0}")]
    Snapshot(#[from] PersistenceError),
    #[error("the table has no rows")]
    EmptyTable,
}

impl EngineError {
    /// Errors that leave the table untouched and only deserve a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Row(RowError::NotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_rows_are_warnings() {
        assert!(EngineError::from(RowError::NotFound("9".into())).is_warning());
        assert!(!EngineError::from(RowError::DuplicateId("9".into())).is_warning());
        assert!(!EngineError::EmptyTable.is_warning());
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let error = EngineError::from(ColumnError::Unknown("score".into()));
        assert_eq!(error.to_string(), "column 'score' does not exist");
    }
}
