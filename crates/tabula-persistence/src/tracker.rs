//! Unsaved-change tracking.

/// Tracks whether the in-memory table differs from the last snapshot.
///
/// A failed save keeps the tracker dirty: the edit is still in memory, it
/// just is not durable yet.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Whether there are unsaved changes.
    dirty: bool,

    /// Whether a save is currently in progress.
    saving: bool,

    /// Bumped on every change.
    revision: u64,

    /// Revision captured when the current save started.
    saving_revision: u64,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    pub fn start_save(&mut self) {
        self.saving = true;
        self.saving_revision = self.revision;
    }

    /// Changes made while the save was running stay dirty.
    pub fn save_complete(&mut self) {
        self.saving = false;
        self.dirty = self.revision != self.saving_revision;
    }

    pub fn save_failed(&mut self) {
        self.saving = false;
    }
}
