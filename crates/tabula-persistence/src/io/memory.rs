use std::cell::RefCell;

use crate::error::Result;
use crate::io::SnapshotStore;

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            record: RefCell::new(Some(bytes)),
        }
    }

    /// Copy of the stored record.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.record.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.record.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
