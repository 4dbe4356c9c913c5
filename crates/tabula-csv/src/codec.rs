use std::collections::BTreeSet;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, info};

use tabula_model::{CellValue, ColumnError, ColumnName, ID_COLUMN, Row, RowId};

use crate::error::{ExportError, ImportError};

/// Largest CSV input accepted by [`parse`], in bytes.
pub const MAX_IMPORT_BYTES: usize = 16 * 1024 * 1024;

/// Result of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Header columns in file order, excluding the `id` column.
    pub header_columns: Vec<ColumnName>,
    pub rows: Vec<Row>,
    /// Whether ids came from an `id` column rather than row positions.
    pub has_id_column: bool,
}

/// Parses CSV text using the default size bound.
pub fn parse(text: &str) -> Result<ParsedCsv, ImportError> {
    parse_with_limit(text, MAX_IMPORT_BYTES)
}

/// Parses CSV text, treating the first record as the header.
///
/// Row ids come from a non-blank `id` field when the header has one, and
/// from the zero-based data row index otherwise.
pub fn parse_with_limit(text: &str, max_bytes: usize) -> Result<ParsedCsv, ImportError> {
    if text.len() > max_bytes {
        return Err(ImportError::TooLarge {
            size: text.len(),
            max: max_bytes,
        });
    }
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ImportError::malformed("missing header row"));
    }

    let mut id_index = None;
    let mut columns: Vec<(usize, ColumnName)> = Vec::with_capacity(headers.len());
    let mut seen = BTreeSet::new();
    for (index, raw) in headers.iter().enumerate() {
        let name = raw.trim();
        if name == ID_COLUMN {
            if id_index.replace(index).is_some() {
                return Err(ImportError::malformed("duplicate header 'id'"));
            }
            continue;
        }
        let column = ColumnName::new(name).map_err(|err| match err {
            ColumnError::Empty => {
                ImportError::malformed(format!("empty header in column {}", index + 1))
            }
            other => ImportError::malformed(other.to_string()),
        })?;
        if !seen.insert(column.clone()) {
            return Err(ImportError::malformed(format!("duplicate header '{column}'")));
        }
        columns.push((index, column));
    }

    let mut rows = Vec::new();
    for (position, record) in reader.records().enumerate() {
        let record = record?;
        let id = id_index
            .and_then(|index| record.get(index))
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| RowId::new(position.to_string()), RowId::from);
        let mut row = Row::new(id);
        for (index, column) in &columns {
            let raw = record.get(*index).unwrap_or("");
            let value = if raw.is_empty() {
                CellValue::Empty
            } else {
                CellValue::text(raw)
            };
            row.set(column.clone(), value);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(ImportError::malformed("no data rows"));
    }

    info!(
        rows = rows.len(),
        columns = columns.len(),
        has_id_column = id_index.is_some(),
        "parsed CSV"
    );
    Ok(ParsedCsv {
        header_columns: columns.into_iter().map(|(_, column)| column).collect(),
        rows,
        has_id_column: id_index.is_some(),
    })
}

/// Writes `rows` as CSV, projecting exactly `columns` in the given order.
///
/// Missing fields are written empty. Passing `id` as a column writes the
/// row identifier.
pub fn serialize<S: AsRef<str>>(rows: &[Row], columns: &[S]) -> Result<String, ExportError> {
    if columns.is_empty() {
        return Err(ExportError::NoColumns);
    }
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let header: Vec<&str> = columns.iter().map(|column| column.as_ref()).collect();
    writer.write_record(&header)?;
    for row in rows {
        let cells: Vec<_> = columns
            .iter()
            .map(|column| row.display(column.as_ref()))
            .collect();
        writer.write_record(cells.iter().map(|cell| cell.as_bytes()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Finish(err.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|err| ExportError::Finish(err.to_string()))?;
    debug!(rows = rows.len(), columns = columns.len(), "serialized CSV");
    Ok(text)
}
