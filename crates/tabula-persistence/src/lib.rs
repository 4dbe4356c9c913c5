//! Durable snapshots of table state.
//!
//! A snapshot holds everything needed to rehydrate the engine: rows,
//! columns, visibility, search term and sort. The page cursor and any open
//! edit session are deliberately left out.
//!
//! # Record Format
//!
//! ```text
//! {"format":"tabula-snapshot","schema_version":1,"saved_at":"...","checksum":"..."}\n
//! { ...JSON payload... }
//! ```
//!
//! The first line is a JSON header; `checksum` is the hex SHA-256 of the
//! payload bytes that follow it. Anything that fails to decode (foreign
//! file, newer schema, truncated write, checksum mismatch) makes [`load`]
//! return `None` so the caller falls back to its default state.
//!
//! # Example
//!
//! ```ignore
//! use tabula_persistence::{FileStore, load, save};
//!
//! let store = FileStore::new(".tabula", "tabula-table");
//! save(&store, &snapshot)?;
//! let restored = load(&store);
//! ```

mod error;
mod hash;
mod io;
mod snapshot;
mod tracker;

pub use error::{PersistenceError, Result};
pub use hash::sha256_hex;
pub use io::{FileStore, MemoryStore, SnapshotStore, load, save, try_load};
pub use snapshot::{
    CURRENT_SCHEMA_VERSION, FORMAT_MARKER, SnapshotHeader, TableSnapshot, decode, encode,
};
pub use tracker::DirtyTracker;
