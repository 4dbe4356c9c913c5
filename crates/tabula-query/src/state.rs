use serde::{Deserialize, Serialize};

use tabula_model::ColumnName;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        }
    }
}

/// Search and sort settings. Never touches the rows themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub sort_by: Option<ColumnName>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorting the current column again flips direction; a new column
    /// starts ascending.
    pub fn toggle_sort(&mut self, column: ColumnName) {
        if self.sort_by.as_ref() == Some(&column) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = Some(column);
            self.sort_order = SortOrder::Asc;
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort_by = None;
        self.sort_order = SortOrder::Asc;
    }

    pub fn is_sorted_by(&self, column: &str) -> bool {
        self.sort_by.as_ref().is_some_and(|sorted| sorted == column)
    }
}
