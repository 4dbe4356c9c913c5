//! Core data model for the Tabula table engine.
//!
//! Rows are open string-keyed maps with a typed identifier. The set of
//! columns is owned by [`ColumnRegistry`] and may change at runtime; the
//! [`RowStore`] keeps the canonical row collection consistent with it.

#![deny(unsafe_code)]

pub mod columns;
pub mod error;
pub mod ids;
pub mod row;
pub mod store;
pub mod value;

pub use columns::ColumnRegistry;
pub use error::{ColumnError, RowError};
pub use ids::{ColumnName, ID_COLUMN, RowId};
pub use row::{FieldEdits, Row};
pub use store::RowStore;
pub use value::CellValue;
