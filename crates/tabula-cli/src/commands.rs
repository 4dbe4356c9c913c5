use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, info_span, warn};

use tabula_core::{
    CellValue, ColumnName, EngineConfig, EngineError, FieldEdits, Intent, RowId, SortOrder,
    TableEngine, View,
};
use tabula_persistence::FileStore;

use crate::cli::{ColumnsCommand, Command};
use crate::logging::redact_value;

/// Snapshot namespace inside the state directory.
pub const SNAPSHOT_NAMESPACE: &str = "tabula-table";

/// The persisted table plus where it lives.
pub struct Workspace {
    engine: TableEngine,
    store: FileStore,
}

impl Workspace {
    /// Loads the saved table from `state_dir`, or starts an empty one.
    pub fn open(state_dir: &Path, config: EngineConfig) -> Self {
        let store = FileStore::new(state_dir, SNAPSHOT_NAMESPACE);
        let engine = TableEngine::open(&store, config);
        debug!(path = %store.path().display(), rows = engine.rows().len(), "workspace opened");
        Self { engine, store }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.store.path()
    }

    /// Writes the table back if a command changed it.
    pub fn save(&mut self) -> Result<()> {
        let path = self.store.path();
        self.engine
            .persist(&self.store)
            .with_context(|| format!("save table to {}", path.display()))
    }
}

/// What a command produced.
#[derive(Debug)]
pub enum Output {
    /// A page of the table.
    View(View),
    /// The column list.
    Columns(Vec<ColumnStatus>),
    /// CSV text for standard output.
    Csv(String),
    /// CSV written to a file.
    Exported { path: PathBuf, bytes: usize },
}

/// One line of `columns list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStatus {
    pub name: ColumnName,
    pub visible: bool,
    pub sort: Option<SortOrder>,
}

/// Command result plus non-fatal warnings to show the user.
#[derive(Debug)]
pub struct Outcome {
    pub output: Output,
    pub warnings: Vec<String>,
}

impl Outcome {
    fn new(output: Output) -> Self {
        Self {
            output,
            warnings: Vec::new(),
        }
    }
}

/// Runs one command against the workspace and saves the result.
pub fn run(workspace: &mut Workspace, command: &Command) -> Result<Outcome> {
    let span = info_span!("command", name = command_name(command));
    let _guard = span.enter();
    let outcome = execute(workspace, command)?;
    workspace.save()?;
    Ok(outcome)
}

fn execute(workspace: &mut Workspace, command: &Command) -> Result<Outcome> {
    let engine = &mut workspace.engine;
    match command {
        Command::Show(args) => {
            let view = match args.page {
                Some(page) => engine.dispatch(Intent::SetPage(page.saturating_sub(1)))?,
                None => engine.view(),
            };
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Import(args) => {
            let text = read_csv(&args.file, engine.config().max_import_bytes)?;
            let view = engine
                .dispatch(Intent::Import(text))
                .with_context(|| format!("import {}", args.file.display()))?;
            info!(path = %args.file.display(), rows = view.total_rows, "imported");
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Export(args) => {
            let csv = engine.export_csv()?;
            match &args.output {
                Some(path) => {
                    fs::write(path, &csv)
                        .with_context(|| format!("write {}", path.display()))?;
                    info!(path = %path.display(), bytes = csv.len(), "exported");
                    Ok(Outcome::new(Output::Exported {
                        path: path.clone(),
                        bytes: csv.len(),
                    }))
                }
                None => Ok(Outcome::new(Output::Csv(csv))),
            }
        }
        Command::Search(args) => {
            let view = engine.dispatch(Intent::SetSearchTerm(args.term.clone()))?;
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Sort(args) => {
            let intent = match &args.column {
                Some(column) if !args.clear => Intent::SetSort(column.clone()),
                _ => Intent::ClearSort,
            };
            let view = engine.dispatch(intent)?;
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Columns(action) => run_columns(engine, action),
        Command::AddRow(args) => {
            let mut fields = FieldEdits::new();
            for raw in &args.assignments {
                let (column, value) = parse_assignment(raw)?;
                debug!(column = %column, value = redact_value(&value.display()), "field");
                fields.insert(column, value);
            }
            let view = engine.dispatch(Intent::InsertRow(fields))?;
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Edit(args) => {
            let id = RowId::new(args.id.clone());
            engine.dispatch(Intent::BeginRowEdit(id.clone()))?;
            for raw in &args.assignments {
                let (column, value) = parse_assignment(raw)?;
                stage(engine, id.clone(), column, value)?;
            }
            let view = engine.dispatch(Intent::SaveRow(id))?;
            Ok(Outcome::new(Output::View(view)))
        }
        Command::EditAll(args) => {
            let edits = args
                .assignments
                .iter()
                .map(String::as_str)
                .map(parse_cell_assignment)
                .collect::<Result<Vec<_>>>()?;
            engine.dispatch(Intent::BeginEditAll)?;
            let mut warnings = Vec::new();
            for (id, column, value) in edits {
                match stage(engine, id, column, value) {
                    Err(error) if is_warning(&error) => warnings.push(format!("{error:#}")),
                    other => other?,
                }
            }
            let view = engine.dispatch(Intent::SaveAll)?;
            Ok(Outcome {
                output: Output::View(view),
                warnings,
            })
        }
        Command::Delete(args) => {
            if !args.yes {
                bail!(
                    "refusing to delete row '{}' without confirmation; pass --yes",
                    args.id
                );
            }
            match engine.dispatch(Intent::Delete(RowId::new(args.id.clone()))) {
                Ok(view) => Ok(Outcome::new(Output::View(view))),
                Err(error) if error.is_warning() => {
                    warn!(row = %args.id, "nothing deleted");
                    Ok(Outcome {
                        output: Output::View(engine.view()),
                        warnings: vec![error.to_string()],
                    })
                }
                Err(error) => Err(error.into()),
            }
        }
        Command::Demo => {
            let view = engine.dispatch(Intent::LoadDemo)?;
            Ok(Outcome::new(Output::View(view)))
        }
        Command::Clear => {
            let view = engine.dispatch(Intent::Clear)?;
            Ok(Outcome::new(Output::View(view)))
        }
    }
}

fn run_columns(engine: &mut TableEngine, action: &ColumnsCommand) -> Result<Outcome> {
    let intent = match action {
        ColumnsCommand::List => return Ok(Outcome::new(Output::Columns(column_statuses(engine)))),
        ColumnsCommand::Add { name } => Intent::AddColumn(name.clone()),
        ColumnsCommand::Remove { name } => {
            if !engine.registry().contains(name.trim()) {
                let mut outcome = Outcome::new(Output::Columns(column_statuses(engine)));
                outcome.warnings.push(format!("column '{name}' does not exist"));
                return Ok(outcome);
            }
            Intent::RemoveColumn(name.clone())
        }
        ColumnsCommand::Toggle { name } => {
            engine.registry().resolve(name)?;
            Intent::ToggleVisible(name.clone())
        }
        ColumnsCommand::Set { names } => Intent::SetColumns(names.clone()),
    };
    engine.dispatch(intent)?;
    Ok(Outcome::new(Output::Columns(column_statuses(engine))))
}

fn column_statuses(engine: &TableEngine) -> Vec<ColumnStatus> {
    let registry = engine.registry();
    let query = engine.query_state();
    registry
        .columns()
        .iter()
        .map(|column| ColumnStatus {
            name: column.clone(),
            visible: registry.is_visible(column.as_str()),
            sort: query
                .is_sorted_by(column.as_str())
                .then_some(query.sort_order),
        })
        .collect()
}

fn stage(engine: &mut TableEngine, id: RowId, column: ColumnName, value: CellValue) -> Result<()> {
    debug!(
        row = %id,
        column = %column,
        value = redact_value(&value.display()),
        "staging edit"
    );
    engine
        .dispatch(Intent::StageEdit {
            id,
            column: column.into(),
            value,
        })
        .map(|_| ())
        .map_err(Into::into)
}

fn is_warning(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<EngineError>()
        .is_some_and(EngineError::is_warning)
}

fn read_csv(path: &Path, max_bytes: usize) -> Result<String> {
    let size = fs::metadata(path)
        .with_context(|| format!("read {}", path.display()))?
        .len();
    if usize::try_from(size).map_or(true, |size| size > max_bytes) {
        bail!(
            "{} is {size} bytes; imports are limited to {max_bytes} bytes",
            path.display()
        );
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Parses `COLUMN=VALUE`. An empty value clears the field.
pub fn parse_assignment(raw: &str) -> Result<(ColumnName, CellValue)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected COLUMN=VALUE, got '{raw}'"))?;
    let column = ColumnName::new(column).with_context(|| format!("invalid field '{raw}'"))?;
    let value = if value.is_empty() {
        CellValue::Empty
    } else {
        CellValue::text(value)
    };
    Ok((column, value))
}

/// Parses `ID:COLUMN=VALUE`.
pub fn parse_cell_assignment(raw: &str) -> Result<(RowId, ColumnName, CellValue)> {
    let (id, assignment) = raw
        .split_once(':')
        .filter(|(id, _)| !id.trim().is_empty())
        .ok_or_else(|| anyhow!("expected ID:COLUMN=VALUE, got '{raw}'"))?;
    let (column, value) = parse_assignment(assignment)?;
    Ok((RowId::new(id.trim()), column, value))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Show(_) => "show",
        Command::Import(_) => "import",
        Command::Export(_) => "export",
        Command::Search(_) => "search",
        Command::Sort(_) => "sort",
        Command::Columns(_) => "columns",
        Command::AddRow(_) => "add-row",
        Command::Edit(_) => "edit",
        Command::EditAll(_) => "edit-all",
        Command::Delete(_) => "delete",
        Command::Demo => "demo",
        Command::Clear => "clear",
    }
}
