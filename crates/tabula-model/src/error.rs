#![deny(unsafe_code)]

use thiserror::Error;

/// Errors raised by column registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("column name is empty")]
    Empty,
    #[error("column name '{0}' is reserved for the row identifier")]
    Reserved(String),
    #[error("column '{0}' already exists")]
    Duplicate(String),
    #[error("column '{0}' does not exist")]
    Unknown(String),
}

/// Errors raised by row store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row '{0}' not found")]
    NotFound(String),
    #[error("duplicate row id '{0}'")]
    DuplicateId(String),
}
