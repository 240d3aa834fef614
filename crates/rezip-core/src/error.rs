//! Error types for archive modification.

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Result type alias using `ModifyError`.
pub type Result<T> = std::result::Result<T, ModifyError>;

/// Errors that can occur while loading, modifying, or saving an archive.
#[derive(Error, Debug)]
pub enum ModifyError {
    /// The original archive could not be opened, parsed, or streamed.
    #[error("failed to read archive {}: {source}", .path.display())]
    ArchiveRead {
        /// Location of the original archive.
        path: PathBuf,
        /// Underlying codec or I/O error.
        #[source]
        source: ZipError,
    },

    /// The output archive could not be created or written.
    #[error("failed to write archive {}: {source}", .path.display())]
    ArchiveWrite {
        /// Destination of the output archive.
        path: PathBuf,
        /// Underlying codec or I/O error.
        #[source]
        source: ZipError,
    },

    /// A non-overwriting add targeted a name that is already present.
    #[error("archive already contains entry: {name}")]
    DuplicateEntry {
        /// The conflicting entry name.
        name: String,
    },

    /// A staged content source could not be opened or read during save.
    #[error("content source for entry {name} is unreadable ({location}): {source}")]
    SourceUnreadable {
        /// Entry the content was staged for.
        name: String,
        /// Human-readable location of the content source.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The entry name cannot be stored as a file entry.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
}

impl ModifyError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<ZipError>) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<ZipError>) -> Self {
        Self::ArchiveWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Returns `true` if the caller can fix the problem and retry.
    ///
    /// Duplicate names, rejected names, and vanished content sources are
    /// caller decisions (overwrite, rename, re-supply the source). Archive
    /// read and write failures are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use rezip_core::ModifyError;
    ///
    /// let err = ModifyError::DuplicateEntry {
    ///     name: "a/b.txt".to_string(),
    /// };
    /// assert!(err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEntry { .. }
                | Self::InvalidEntryName { .. }
                | Self::SourceUnreadable { .. }
        )
    }

    /// Returns the entry name this error refers to, if any.
    #[must_use]
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Self::DuplicateEntry { name }
            | Self::SourceUnreadable { name, .. }
            | Self::InvalidEntryName { name, .. } => Some(name),
            Self::ArchiveRead { .. } | Self::ArchiveWrite { .. } => None,
        }
    }
}
