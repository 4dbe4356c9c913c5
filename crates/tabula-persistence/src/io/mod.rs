//! Snapshot stores and the save/load entry points.

mod file;
mod memory;

use tracing::{info, warn};

use crate::error::Result;
use crate::snapshot::{TableSnapshot, decode, encode};

pub use file::FileStore;
pub use memory::MemoryStore;

/// A durable location holding a single snapshot record.
pub trait SnapshotStore {
    /// Returns the stored record, or `None` if nothing was saved yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replaces the stored record.
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Encodes and writes a snapshot.
pub fn save(store: &dyn SnapshotStore, snapshot: &TableSnapshot) -> Result<()> {
    let bytes = encode(snapshot)?;
    store.write(&bytes)?;
    info!(
        location = %store.location(),
        rows = snapshot.rows.len(),
        bytes = bytes.len(),
        "snapshot saved"
    );
    Ok(())
}

/// Reads and decodes the stored snapshot, reporting why it failed.
pub fn try_load(store: &dyn SnapshotStore) -> Result<Option<TableSnapshot>> {
    let Some(bytes) = store.read()? else {
        return Ok(None);
    };
    let (_, snapshot) = decode(&bytes)?;
    info!(
        location = %store.location(),
        rows = snapshot.rows.len(),
        "snapshot loaded"
    );
    Ok(Some(snapshot))
}

/// Reads the stored snapshot, degrading any failure to `None`.
pub fn load(store: &dyn SnapshotStore) -> Option<TableSnapshot> {
    match try_load(store) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            warn!(
                location = %store.location(),
                error = %error,
                "discarding unreadable snapshot"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PersistenceError;

    #[test]
    fn test_load_missing_is_none() {
        let store = MemoryStore::new();
        assert!(try_load(&store).unwrap().is_none());
        assert!(load(&store).is_none());
    }

    #[test]
    fn test_load_garbage_degrades_to_none() {
        let store = MemoryStore::with_bytes(b"{\"format\":\"other\"".to_vec());
        assert!(try_load(&store).is_err());
        assert!(load(&store).is_none());
    }

    #[test]
    fn test_load_truncated_write_degrades_to_none() {
        let store = MemoryStore::new();
        save(&store, &TableSnapshot::default()).unwrap();
        let mut bytes = store.bytes().unwrap();
        bytes.truncate(bytes.len() - 3);
        let store = MemoryStore::with_bytes(bytes);
        assert!(matches!(
            try_load(&store),
            Err(PersistenceError::ChecksumMismatch { .. })
        ));
        assert!(load(&store).is_none());
    }
}
