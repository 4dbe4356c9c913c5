//! The Tabula table engine.
//!
//! [`TableEngine`] owns the column registry, the row store, the query state
//! and the edit session. Callers send it [`Intent`] values and render the
//! [`View`] it hands back; nothing here knows about terminals or widgets.
//!
//! ```ignore
//! use tabula_core::{EngineConfig, Intent, TableEngine};
//!
//! let mut engine = TableEngine::new(EngineConfig::default());
//! engine.dispatch(Intent::LoadDemo)?;
//! let view = engine.dispatch(Intent::SetSearchTerm("ravi".into()))?;
//! assert_eq!(view.total_count, 1);
//! ```

mod config;
mod demo;
mod edit;
mod engine;
mod error;
mod intent;
mod view;

pub use config::{DEFAULT_COLUMNS, EngineConfig};
pub use demo::demo_rows;
pub use edit::{EditError, EditMode, EditSession};
pub use engine::TableEngine;
pub use error::EngineError;
pub use intent::Intent;
pub use view::View;

pub use tabula_model::{CellValue, ColumnError, ColumnName, FieldEdits, Row, RowError, RowId};
pub use tabula_query::{QueryState, SortOrder};
