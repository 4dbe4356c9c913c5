//! CLI argument definitions.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

/// State directory used when neither `--state-dir` nor the environment says otherwise.
pub const DEFAULT_STATE_DIR: &str = ".tabula";

/// Environment variable overriding the default state directory.
pub const STATE_DIR_ENV: &str = "TABULA_STATE_DIR";

#[derive(Parser)]
#[command(
    name = "tabula",
    version,
    about = "Tabula - a dynamic table you can import, edit, query and export",
    long_about = "Manage a single persistent table from the command line.\n\n\
                  Rows live in the state directory between invocations. Every\n\
                  command prints the resulting page of the table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the saved table (default: ./.tabula, or $TABULA_STATE_DIR).
    #[arg(long = "state-dir", value_name = "DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Rows per page.
    #[arg(long = "page-size", value_name = "N", default_value_t = 10, global = true)]
    pub page_size: usize,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp (json output always has one).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Allow cell values to appear in debug and trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

impl Cli {
    /// Effective state directory.
    pub fn state_dir(&self) -> PathBuf {
        resolve_state_dir(self.state_dir.clone(), std::env::var_os(STATE_DIR_ENV))
    }
}

/// `--state-dir` wins over the environment, which wins over the default.
pub fn resolve_state_dir(flag: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    flag.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a page of the table.
    Show(ShowArgs),

    /// Replace the table with the contents of a CSV file.
    Import(ImportArgs),

    /// Write the visible columns as CSV.
    Export(ExportArgs),

    /// Filter rows by a case-insensitive substring (empty clears the filter).
    Search(SearchArgs),

    /// Sort by a column; sorting the same column again flips the direction.
    Sort(SortArgs),

    /// Inspect and change the column set.
    #[command(subcommand)]
    Columns(ColumnsCommand),

    /// Append a row from COLUMN=VALUE pairs.
    AddRow(AddRowArgs),

    /// Edit one row and save it immediately.
    Edit(EditArgs),

    /// Edit several rows and save them together.
    EditAll(EditAllArgs),

    /// Delete a row permanently.
    Delete(DeleteArgs),

    /// Replace the table with ten sample people.
    Demo,

    /// Remove every row, keeping the columns.
    Clear,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Page to show, starting at 1.
    #[arg(long = "page", value_name = "N")]
    pub page: Option<usize>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file (default: standard output).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in visible columns.
    #[arg(value_name = "TERM", default_value = "")]
    pub term: String,
}

#[derive(Args)]
pub struct SortArgs {
    /// Column to sort by.
    #[arg(value_name = "COLUMN", required_unless_present = "clear")]
    pub column: Option<String>,

    /// Remove sorting and restore store order.
    #[arg(long = "clear", conflicts_with = "column")]
    pub clear: bool,
}

#[derive(Subcommand)]
pub enum ColumnsCommand {
    /// List every column with its visibility.
    List,

    /// Add a column; existing rows get an empty value.
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Remove a column and its values from every row.
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Show a hidden column or hide a visible one.
    Toggle {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Replace the column list (comma separated or repeated).
    Set {
        #[arg(value_name = "NAMES", value_delimiter = ',', num_args = 1.., required = true)]
        names: Vec<String>,
    },
}

#[derive(Args)]
pub struct AddRowArgs {
    /// Field values as COLUMN=VALUE.
    #[arg(value_name = "COLUMN=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Row to edit.
    #[arg(value_name = "ID")]
    pub id: String,

    /// New field values as COLUMN=VALUE.
    #[arg(value_name = "COLUMN=VALUE", required = true)]
    pub assignments: Vec<String>,
}

#[derive(Args)]
pub struct EditAllArgs {
    /// New field values as ID:COLUMN=VALUE.
    #[arg(value_name = "ID:COLUMN=VALUE", required = true)]
    pub assignments: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Row to delete.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Confirm the deletion. Deleted rows cannot be restored.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
