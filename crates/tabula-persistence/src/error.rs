//! Persistence error types.
//!
//! Load failures are normally swallowed by [`crate::load`]; these variants
//! exist so callers that want the reason can use [`crate::try_load`] and so
//! save failures can be surfaced with a readable message.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record is not a snapshot or violates table invariants.
    #[error("Invalid snapshot: {reason}")]
    InvalidFormat { reason: String },

    /// Snapshot written by a different schema version.
    #[error("Snapshot version {found} is not supported (expected: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Payload does not match the checksum in the header.
    #[error("Snapshot checksum mismatch")]
    ChecksumMismatch { expected: String, actual: String },

    /// Serialization error.
    #[error("Failed to serialize snapshot")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization error.
    #[error("Failed to deserialize snapshot")]
    Deserialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { reason } => {
                format!("The saved table could not be used: {reason}")
            }
            Self::UnsupportedVersion { found, supported } => {
                format!(
                    "The saved table uses format version {found}, this build reads version {supported}."
                )
            }
            Self::ChecksumMismatch { .. } => {
                "The saved table is incomplete or was modified outside the application."
                    .to_string()
            }
            Self::Serialization { .. } => "An error occurred while saving the table.".to_string(),
            Self::Deserialization { .. } => {
                "An error occurred while reading the saved table. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the table to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the state directory is readable.".into())
                } else {
                    Some("Check that you have permission to write to the state directory.".into())
                }
            }
            Self::InvalidFormat { .. }
            | Self::UnsupportedVersion { .. }
            | Self::ChecksumMismatch { .. }
            | Self::Deserialization { .. } => {
                Some("Re-import the data from CSV; the saved table will be replaced.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different state directory.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_and_suggestion() {
        let err = PersistenceError::UnsupportedVersion {
            found: 9,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "Snapshot version 9 is not supported (expected: 1)"
        );
        assert!(err.user_message().contains("version 9"));
        assert!(err.suggestion().is_some());
    }
}
