//! Everything a collaborator can ask the engine to do.

use tabula_model::{CellValue, FieldEdits, Row, RowId};

/// A single state transition request, processed by
/// [`TableEngine::dispatch`](crate::TableEngine::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // =========================================================================
    // Rows
    // =========================================================================
    /// Replace the table with the contents of a CSV document.
    Import(String),

    /// Replace every row, keeping the current columns.
    ReplaceAll(Vec<Row>),

    /// Append a row under a generated id.
    InsertRow(FieldEdits),

    /// Apply a partial update to one row.
    MergeEdit { id: RowId, edits: FieldEdits },

    /// Remove one row. Irreversible.
    Delete(RowId),

    // =========================================================================
    // Columns
    // =========================================================================
    AddColumn(String),
    RemoveColumn(String),
    ToggleVisible(String),

    /// Replace the column list wholesale.
    SetColumns(Vec<String>),

    // =========================================================================
    // Query
    // =========================================================================
    SetSearchTerm(String),

    /// Sort by a column; the same column again flips direction.
    SetSort(String),

    ClearSort,
    SetPage(usize),

    // =========================================================================
    // Editing
    // =========================================================================
    /// Open a batch edit over the whole table.
    BeginEditAll,

    /// Open an edit on one row.
    BeginRowEdit(RowId),

    /// Buffer one cell value.
    StageEdit {
        id: RowId,
        column: String,
        value: CellValue,
    },

    /// Commit the batch edit.
    SaveAll,

    /// Commit one row edit.
    SaveRow(RowId),

    /// Discard every staged edit.
    CancelEdit,

    /// Discard the staged edits of one row.
    CancelRowEdit(RowId),

    // =========================================================================
    // Table
    // =========================================================================
    /// Replace the table with the built-in sample data.
    LoadDemo,

    /// Drop every row, keeping the columns.
    Clear,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
            Self::ReplaceAll(_) => "replace_all",
            Self::InsertRow(_) => "insert_row",
            Self::MergeEdit { .. } => "merge_edit",
            Self::Delete(_) => "delete",
            Self::AddColumn(_) => "add_column",
            Self::RemoveColumn(_) => "remove_column",
            Self::ToggleVisible(_) => "toggle_visible",
            Self::SetColumns(_) => "set_columns",
            Self::SetSearchTerm(_) => "set_search_term",
            Self::SetSort(_) => "set_sort",
            Self::ClearSort => "clear_sort",
            Self::SetPage(_) => "set_page",
            Self::BeginEditAll => "begin_edit_all",
            Self::BeginRowEdit(_) => "begin_row_edit",
            Self::StageEdit { .. } => "stage_edit",
            Self::SaveAll => "save_all",
            Self::SaveRow(_) => "save_row",
            Self::CancelEdit => "cancel_edit",
            Self::CancelRowEdit(_) => "cancel_row_edit",
            Self::LoadDemo => "load_demo",
            Self::Clear => "clear",
        }
    }
}
