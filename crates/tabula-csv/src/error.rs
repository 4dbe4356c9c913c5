//! Error types for CSV import and export.

use thiserror::Error;

/// Errors that can occur while importing CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The input is not a usable table. Nothing was imported.
    #[error("malformed CSV{}: {reason}", at_line(.line))]
    MalformedCsv { line: Option<u64>, reason: String },

    /// The input exceeds the accepted size bound.
    #[error("CSV input is {size} bytes, above the {max} byte limit")]
    TooLarge { size: usize, max: usize },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|line| format!(" at line {line}"))
        .unwrap_or_default()
}

impl ImportError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCsv {
            line: None,
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::MalformedCsv {
            line: err.position().map(csv::Position::line),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur while writing CSV text.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No columns were selected for output.
    #[error("no columns selected for export")]
    NoColumns,

    /// The CSV writer rejected a record.
    #[error("failed to write CSV: {0}")]
    Write(#[from] csv::Error),

    /// The buffered output could not be finalised.
    #[error("failed to finish CSV output: {0}")]
    Finish(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImportError::MalformedCsv {
            line: Some(3),
            reason: "found record with 2 fields".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed CSV at line 3: found record with 2 fields"
        );
        assert_eq!(
            ImportError::malformed("no data rows").to_string(),
            "malformed CSV: no data rows"
        );
    }
}
