//! Error conversion utilities for CLI.
//!
//! Converts rezip-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use rezip_core::ModifyError;
use std::path::Path;

/// Converts `ModifyError` to user-friendly anyhow error with context
pub fn convert_modify_error(err: ModifyError, archive: &Path) -> anyhow::Error {
    match err {
        ModifyError::ArchiveRead { path, source } => {
            anyhow!(
                "Cannot read archive '{}': {}\n\
                 HINT: Check that the file exists and is a valid ZIP archive.",
                path.display(),
                source
            )
        }
        ModifyError::ArchiveWrite { path, source } => {
            anyhow!(
                "Cannot write archive '{}': {}\n\
                 HINT: Check that the destination directory exists and is writable.",
                path.display(),
                source
            )
        }
        ModifyError::DuplicateEntry { name } => {
            anyhow!(
                "Archive '{}' already contains '{}'\n\
                 HINT: Use --replace instead of --add to overwrite existing entries.",
                archive.display(),
                name
            )
        }
        ModifyError::SourceUnreadable {
            name,
            location,
            source,
        } => {
            anyhow!(
                "Cannot read content for '{}' from {}: {}\n\
                 HINT: The archive was left unchanged. Check the source file and retry.",
                name,
                location,
                source
            )
        }
        ModifyError::InvalidEntryName { name, reason } => {
            anyhow!(
                "Invalid entry name '{}': {}\n\
                 HINT: Entry names are relative paths with '/' separators.",
                name,
                reason
            )
        }
    }
}

/// Adds archive context to a rezip-core result
pub fn add_archive_context<T>(
    result: Result<T, ModifyError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_modify_error(e, archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_duplicate_entry() {
        let err = ModifyError::DuplicateEntry {
            name: "a/b.txt".to_string(),
        };
        let converted = convert_modify_error(err, Path::new("app.jar"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("already contains 'a/b.txt'"));
        assert!(msg.contains("app.jar"));
        assert!(msg.contains("--replace"));
    }

    #[test]
    fn test_convert_source_unreadable() {
        let err = ModifyError::SourceUnreadable {
            name: "x.txt".to_string(),
            location: "/tmp/missing.txt".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };
        let converted = convert_modify_error(err, Path::new("in.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("/tmp/missing.txt"));
        assert!(msg.contains("left unchanged"));
    }

    #[test]
    fn test_convert_archive_read() {
        let err = ModifyError::ArchiveRead {
            path: PathBuf::from("broken.zip"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone").into(),
        };
        let converted = convert_modify_error(err, Path::new("broken.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("Cannot read archive 'broken.zip'"));
        assert!(msg.contains("HINT"));
    }
}
