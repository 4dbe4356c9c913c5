use tabula_csv::MAX_IMPORT_BYTES;
use tabula_query::DEFAULT_PAGE_SIZE;

/// Columns of a fresh table.
pub const DEFAULT_COLUMNS: [&str; 4] = ["name", "email", "age", "role"];

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rows per page. Zero is treated as one.
    pub page_size: usize,
    /// Largest CSV text accepted by an import.
    pub max_import_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_import_bytes: MAX_IMPORT_BYTES,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_max_import_bytes(mut self, max_import_bytes: usize) -> Self {
        self.max_import_bytes = max_import_bytes;
        self
    }
}
