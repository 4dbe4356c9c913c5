//! The table engine: owns state, applies intents, derives views.

use tracing::{debug, info, warn};

use tabula_csv::{parse_with_limit, serialize};
use tabula_model::{
    CellValue, ColumnError, ColumnName, ColumnRegistry, FieldEdits, Row, RowError, RowId, RowStore,
};
use tabula_persistence::{DirtyTracker, SnapshotStore, TableSnapshot, load, save};
use tabula_query::{QueryState, query};

use crate::config::{DEFAULT_COLUMNS, EngineConfig};
use crate::demo::demo_rows;
use crate::edit::EditSession;
use crate::error::EngineError;
use crate::intent::Intent;
use crate::view::View;

/// Single owner of all table state.
///
/// There is no global instance; callers hold the engine and pass it by
/// reference. Every mutation goes through [`TableEngine::dispatch`].
#[derive(Debug, Clone)]
pub struct TableEngine {
    registry: ColumnRegistry,
    store: RowStore,
    query: QueryState,
    page: usize,
    edits: EditSession,
    tracker: DirtyTracker,
    config: EngineConfig,
}

impl TableEngine {
    /// Empty table with the default columns, all visible.
    pub fn new(config: EngineConfig) -> Self {
        let registry = ColumnRegistry::from_columns(DEFAULT_COLUMNS).unwrap_or_default();
        Self::with_parts(registry, RowStore::new(), QueryState::new(), config)
    }

    /// Rehydrates from the snapshot in `store`, or starts fresh when there is
    /// none or it cannot be used.
    pub fn open(store: &dyn SnapshotStore, config: EngineConfig) -> Self {
        let Some(snapshot) = load(store) else {
            debug!(location = %store.location(), "starting with a fresh table");
            return Self::new(config);
        };
        match Self::restore(snapshot, config.clone()) {
            Ok(engine) => engine,
            Err(error) => {
                warn!(
                    location = %store.location(),
                    error = %error,
                    "snapshot could not be restored, starting fresh"
                );
                Self::new(config)
            }
        }
    }

    /// Builds an engine from a snapshot.
    pub fn restore(snapshot: TableSnapshot, config: EngineConfig) -> Result<Self, EngineError> {
        let snapshot = snapshot.sanitized()?;
        let registry =
            ColumnRegistry::with_visibility(&snapshot.columns, &snapshot.visible_columns)?;
        let mut store = RowStore::new();
        store.replace_all(snapshot.rows)?;
        let query = QueryState {
            search_term: snapshot.search_term,
            sort_by: snapshot.sort_by,
            sort_order: snapshot.sort_order,
        };
        Ok(Self::with_parts(registry, store, query, config))
    }

    fn with_parts(
        registry: ColumnRegistry,
        store: RowStore,
        query: QueryState,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            store,
            query,
            page: 0,
            edits: EditSession::default(),
            tracker: DirtyTracker::new(),
            config,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    pub fn query_state(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edits
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether there are changes not yet persisted.
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Durable part of the state. Excludes the page cursor and edit session.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            rows: self.store.rows().to_vec(),
            columns: self.registry.columns().to_vec(),
            visible_columns: self.registry.visible_columns().to_vec(),
            search_term: self.query.search_term.clone(),
            sort_by: self.query.sort_by.clone(),
            sort_order: self.query.sort_order,
        }
    }

    /// Writes a snapshot if anything changed since the last one.
    ///
    /// On failure the in-memory state is kept and stays dirty.
    pub fn persist(&mut self, store: &dyn SnapshotStore) -> tabula_persistence::Result<()> {
        if !self.tracker.is_dirty() {
            debug!(location = %store.location(), "nothing to persist");
            return Ok(());
        }
        self.tracker.start_save();
        match save(store, &self.snapshot()) {
            Ok(()) => {
                self.tracker.save_complete();
                Ok(())
            }
            Err(error) => {
                self.tracker.save_failed();
                Err(error)
            }
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Derived view for the current state.
    pub fn view(&self) -> View {
        let visible = self.registry.visible_columns();
        let page = query(
            self.store.rows(),
            visible,
            &self.query,
            self.page,
            self.config.page_size,
        );
        let staged = self
            .edits
            .staged()
            .iter()
            .filter(|(id, _)| page.items.iter().any(|row| row.id == **id))
            .map(|(id, edits)| (id.clone(), edits.clone()))
            .collect();
        View {
            columns: self.registry.columns().to_vec(),
            visible_columns: visible.to_vec(),
            page_count: page.page_count(),
            rows: page.items.into_iter().cloned().collect(),
            total_count: page.total_count,
            total_rows: self.store.len(),
            page: page.page,
            page_size: page.page_size,
            search_term: self.query.search_term.clone(),
            sort_by: self.query.sort_by.clone(),
            sort_order: self.query.sort_order,
            edit_mode: self.edits.mode().clone(),
            staged,
        }
    }

    /// Visible columns of every row as CSV, in registry order.
    pub fn export_csv(&self) -> Result<String, EngineError> {
        if self.store.is_empty() {
            return Err(EngineError::EmptyTable);
        }
        let csv = serialize(self.store.rows(), self.registry.visible_columns())?;
        info!(
            rows = self.store.len(),
            columns = self.registry.visible_columns().len(),
            "table exported"
        );
        Ok(csv)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Applies one intent and returns the recomputed view.
    ///
    /// A failed intent leaves the state exactly as it was.
    pub fn dispatch(&mut self, intent: Intent) -> Result<View, EngineError> {
        let name = intent.name();
        debug!(intent = name, "dispatching");
        let changed = self.apply(intent)?;
        if changed {
            self.tracker.mark_dirty();
        }
        let view = self.view();
        self.page = view.page;
        Ok(view)
    }

    /// Returns whether durable state changed.
    fn apply(&mut self, intent: Intent) -> Result<bool, EngineError> {
        match intent {
            Intent::Import(text) => self.import(&text).map(|()| true),
            Intent::ReplaceAll(rows) => self.replace_all(rows).map(|()| true),
            Intent::InsertRow(fields) => self.insert_row(fields).map(|_| true),
            Intent::MergeEdit { id, edits } => self.merge_edit(&id, edits).map(|()| true),
            Intent::Delete(id) => self.delete(&id).map(|()| true),
            Intent::AddColumn(name) => self.add_column(&name).map(|()| true),
            Intent::RemoveColumn(name) => Ok(self.remove_column(&name)),
            Intent::ToggleVisible(name) => Ok(self.toggle_visible(&name)),
            Intent::SetColumns(columns) => self.set_columns(&columns).map(|()| true),
            Intent::SetSearchTerm(term) => Ok(self.set_search_term(term)),
            Intent::SetSort(column) => self.set_sort(&column).map(|()| true),
            Intent::ClearSort => Ok(self.clear_sort()),
            Intent::SetPage(page) => {
                self.page = page;
                Ok(false)
            }
            Intent::BeginEditAll => self.begin_edit_all().map(|()| false),
            Intent::BeginRowEdit(id) => self.begin_row_edit(id).map(|()| false),
            Intent::StageEdit { id, column, value } => {
                self.stage_edit(&id, &column, value).map(|()| false)
            }
            Intent::SaveAll => self.save_all(),
            Intent::SaveRow(id) => self.save_row(&id),
            Intent::CancelEdit => {
                self.edits.cancel();
                debug!("edits discarded");
                Ok(false)
            }
            Intent::CancelRowEdit(id) => {
                self.edits.cancel_row(id.as_str())?;
                debug!(row = %id, "row edit discarded");
                Ok(false)
            }
            Intent::LoadDemo => self.load_demo().map(|()| true),
            Intent::Clear => {
                self.store.clear();
                self.edits.cancel();
                self.page = 0;
                Ok(true)
            }
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    fn import(&mut self, text: &str) -> Result<(), EngineError> {
        let parsed = parse_with_limit(text, self.config.max_import_bytes)?;
        let registry = ColumnRegistry::from_columns(&parsed.header_columns)?;
        let rows = parsed.rows.len();
        self.store.replace_all(parsed.rows)?;
        self.registry = registry;
        self.drop_dangling_sort();
        self.edits.cancel();
        self.page = 0;
        info!(
            rows,
            columns = self.registry.columns().len(),
            ids_from_file = parsed.has_id_column,
            "table imported"
        );
        Ok(())
    }

    fn replace_all(&mut self, mut rows: Vec<Row>) -> Result<(), EngineError> {
        for row in &mut rows {
            row.fields
                .retain(|column, _| self.registry.contains(column.as_str()));
        }
        self.store.replace_all(rows)?;
        self.edits.cancel();
        Ok(())
    }

    fn insert_row(&mut self, mut fields: FieldEdits) -> Result<RowId, EngineError> {
        self.check_columns(&fields)?;
        for column in self.registry.columns() {
            fields.entry(column.clone()).or_insert(CellValue::Empty);
        }
        let id = self.store.insert(fields);
        info!(row = %id, "row added");
        Ok(id)
    }

    fn merge_edit(&mut self, id: &RowId, edits: FieldEdits) -> Result<(), EngineError> {
        self.check_columns(&edits)?;
        self.store.merge_edit(id.as_str(), edits)?;
        Ok(())
    }

    fn delete(&mut self, id: &RowId) -> Result<(), EngineError> {
        self.store.delete(id.as_str())?;
        self.edits.forget_row(id.as_str());
        info!(row = %id, "row deleted");
        Ok(())
    }

    fn check_columns(&self, edits: &FieldEdits) -> Result<(), ColumnError> {
        for column in edits.keys() {
            self.registry.resolve(column.as_str())?;
        }
        Ok(())
    }

    // =========================================================================
    // Columns
    // =========================================================================

    fn add_column(&mut self, name: &str) -> Result<(), EngineError> {
        let column = self.registry.add_column(name)?;
        self.store.backfill_column(&column);
        Ok(())
    }

    fn remove_column(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !self.registry.remove_column(name) {
            debug!(column = name, "column not registered, nothing removed");
            return false;
        }
        self.store.strip_column(name);
        if self.query.is_sorted_by(name) {
            self.query.clear_sort();
        }
        self.edits.forget_column(name);
        true
    }

    fn toggle_visible(&mut self, name: &str) -> bool {
        match self.registry.toggle_visible(name.trim()) {
            Some(_) => true,
            None => {
                debug!(column = name, "column not registered, visibility unchanged");
                false
            }
        }
    }

    fn set_columns(&mut self, columns: &[String]) -> Result<(), EngineError> {
        let dropped = self.registry.set_columns(columns)?;
        let registry = &self.registry;
        self.store
            .retain_columns(|column| registry.contains(column.as_str()));
        for column in &dropped {
            self.edits.forget_column(column.as_str());
        }
        self.drop_dangling_sort();
        debug!(
            columns = self.registry.columns().len(),
            dropped = dropped.len(),
            "columns replaced"
        );
        Ok(())
    }

    fn drop_dangling_sort(&mut self) {
        if self
            .query
            .sort_by
            .as_ref()
            .is_some_and(|column| !self.registry.contains(column.as_str()))
        {
            self.query.clear_sort();
        }
    }

    // =========================================================================
    // Query
    // =========================================================================

    fn set_search_term(&mut self, term: String) -> bool {
        self.page = 0;
        if self.query.search_term == term {
            return false;
        }
        self.query.search_term = term;
        true
    }

    fn set_sort(&mut self, name: &str) -> Result<(), EngineError> {
        let column = self.registry.resolve(name)?.clone();
        self.query.toggle_sort(column);
        self.page = 0;
        Ok(())
    }

    fn clear_sort(&mut self) -> bool {
        self.page = 0;
        if self.query.sort_by.is_none() {
            return false;
        }
        self.query.clear_sort();
        true
    }

    // =========================================================================
    // Editing
    // =========================================================================

    fn begin_edit_all(&mut self) -> Result<(), EngineError> {
        if self.store.is_empty() {
            return Err(EngineError::EmptyTable);
        }
        self.edits.begin_batch();
        Ok(())
    }

    fn begin_row_edit(&mut self, id: RowId) -> Result<(), EngineError> {
        if !self.store.contains(id.as_str()) {
            return Err(RowError::NotFound(id.to_string()).into());
        }
        self.edits.begin_row(id)?;
        Ok(())
    }

    fn stage_edit(&mut self, id: &RowId, column: &str, value: CellValue) -> Result<(), EngineError> {
        if !self.store.contains(id.as_str()) {
            return Err(RowError::NotFound(id.to_string()).into());
        }
        let column: ColumnName = self.registry.resolve(column)?.clone();
        self.edits.stage(id, column, value)?;
        Ok(())
    }

    fn save_all(&mut self) -> Result<bool, EngineError> {
        let staged = self.edits.take_batch()?;
        let mut applied = 0;
        for (id, edits) in staged {
            match self.store.merge_edit(id.as_str(), edits) {
                Ok(()) => applied += 1,
                Err(error) => warn!(row = %id, error = %error, "staged edit skipped"),
            }
        }
        info!(rows = applied, "batch edit saved");
        Ok(applied > 0)
    }

    fn save_row(&mut self, id: &RowId) -> Result<bool, EngineError> {
        let edits = self.edits.take_row(id.as_str())?;
        if edits.is_empty() {
            return Ok(false);
        }
        self.store.merge_edit(id.as_str(), edits)?;
        info!(row = %id, "row edit saved");
        Ok(true)
    }

    // =========================================================================
    // Table
    // =========================================================================

    fn load_demo(&mut self) -> Result<(), EngineError> {
        let registry = ColumnRegistry::from_columns(DEFAULT_COLUMNS)?;
        self.store.replace_all(demo_rows()?)?;
        self.registry = registry;
        self.drop_dangling_sort();
        self.edits.cancel();
        self.page = 0;
        info!(rows = self.store.len(), "demo data loaded");
        Ok(())
    }
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
