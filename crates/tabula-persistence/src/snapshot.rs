//! Snapshot type and its on-disk encoding.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tabula_model::{ColumnName, Row};
use tabula_query::SortOrder;

use crate::error::{PersistenceError, Result};
use crate::hash::sha256_hex;

/// Current schema version.
///
/// Increment this when making breaking changes to the payload. Snapshots
/// with any other version are rejected and the caller starts fresh.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Marker identifying a Tabula snapshot header.
pub const FORMAT_MARKER: &str = "tabula-snapshot";

/// Full persisted table state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnName>,
    pub visible_columns: Vec<ColumnName>,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub sort_by: Option<ColumnName>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl TableSnapshot {
    /// Enforces table invariants on a decoded snapshot.
    ///
    /// Duplicate columns or row ids are fatal. Dangling references (hidden
    /// columns that no longer exist, row fields outside the column set, a
    /// sort on a missing column) are dropped.
    pub fn sanitized(mut self) -> Result<Self> {
        let mut known = BTreeSet::new();
        for column in &self.columns {
            if !known.insert(column.clone()) {
                return Err(PersistenceError::InvalidFormat {
                    reason: format!("duplicate column '{column}'"),
                });
            }
        }
        let mut ids = BTreeSet::new();
        for row in &self.rows {
            if !ids.insert(row.id.clone()) {
                return Err(PersistenceError::InvalidFormat {
                    reason: format!("duplicate row id '{}'", row.id),
                });
            }
        }

        let visible: BTreeSet<ColumnName> = self.visible_columns.drain(..).collect();
        self.visible_columns = self
            .columns
            .iter()
            .filter(|column| visible.contains(*column))
            .cloned()
            .collect();
        for row in &mut self.rows {
            row.fields.retain(|column, _| known.contains(column));
        }
        if self
            .sort_by
            .as_ref()
            .is_some_and(|column| !known.contains(column))
        {
            self.sort_by = None;
        }
        Ok(self)
    }
}

/// First line of an encoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub format: String,
    pub schema_version: u32,
    pub saved_at: String,
    pub checksum: String,
}

/// Encodes a snapshot as header line plus JSON payload.
pub fn encode(snapshot: &TableSnapshot) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(snapshot)
        .map_err(|source| PersistenceError::Serialization { source })?;
    let header = SnapshotHeader {
        format: FORMAT_MARKER.to_string(),
        schema_version: CURRENT_SCHEMA_VERSION,
        saved_at: Utc::now().to_rfc3339(),
        checksum: sha256_hex(&payload),
    };
    let mut output = serde_json::to_vec(&header)
        .map_err(|source| PersistenceError::Serialization { source })?;
    output.push(b'\n');
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decodes and validates an encoded snapshot.
pub fn decode(bytes: &[u8]) -> Result<(SnapshotHeader, TableSnapshot)> {
    let split = bytes
        .iter()
        .position(|byte| *byte == b'\n')
        .ok_or_else(|| PersistenceError::InvalidFormat {
            reason: "missing snapshot header".to_string(),
        })?;
    let (header_bytes, rest) = bytes.split_at(split);
    let payload = &rest[1..];

    let header: SnapshotHeader = serde_json::from_slice(header_bytes)
        .map_err(|source| PersistenceError::Deserialization { source })?;
    if header.format != FORMAT_MARKER {
        return Err(PersistenceError::InvalidFormat {
            reason: format!("unexpected format marker '{}'", header.format),
        });
    }
    if header.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: header.schema_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    let actual = sha256_hex(payload);
    if actual != header.checksum {
        return Err(PersistenceError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let snapshot: TableSnapshot = serde_json::from_slice(payload)
        .map_err(|source| PersistenceError::Deserialization { source })?;
    let snapshot = snapshot.sanitized()?;
    debug!(
        rows = snapshot.rows.len(),
        columns = snapshot.columns.len(),
        saved_at = %header.saved_at,
        "snapshot decoded"
    );
    Ok((header, snapshot))
}
