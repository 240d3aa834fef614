//! Rewritable entry attributes.

use zip::CompressionMethod;
use zip::DateTime;

use crate::ModifyError;
use crate::Result;

/// Extra-field header IDs the codec writes itself (Zip64, AES).
pub(crate) const CODEC_MANAGED_EXTRA_IDS: [u16; 2] = [0x0001, 0x9901];

/// The rewritable, non-content attributes of one archive entry.
///
/// Size and CRC-32 are deliberately absent: they describe bytes, not the
/// entry, and the codec recomputes them every time an entry is written.
///
/// # Examples
///
/// ```
/// use rezip_core::EntryMetadata;
/// use zip::CompressionMethod;
///
/// let metadata = EntryMetadata::new("docs/readme.txt")
///     .with_compression(CompressionMethod::Stored)
///     .with_comment("generated");
/// assert_eq!(metadata.basename(), "readme.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// `/`-separated path of the entry inside the archive.
    pub name: String,

    /// Last modification time; `None` stamps the entry with the write time.
    pub modified: Option<DateTime>,

    /// Free-form per-entry comment.
    pub comment: String,

    /// Raw extra-field blob (a sequence of `id, len, data` records).
    pub extra_data: Vec<u8>,

    /// Compression method used when the entry is (re)written.
    pub compression: CompressionMethod,

    /// Unix permission bits, when the archive recorded them.
    pub unix_mode: Option<u32>,
}

impl EntryMetadata {
    /// Creates metadata with defaults: deflate, no timestamp, no comment,
    /// no extra data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified: None,
            comment: String::new(),
            extra_data: Vec::new(),
            compression: CompressionMethod::Deflated,
            unix_mode: None,
        }
    }

    /// Returns a copy of this metadata under a different name.
    ///
    /// Useful for staging content at a new path with the attributes of an
    /// existing entry.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Sets the modification time.
    pub fn with_modified(mut self, modified: DateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Sets the entry comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets the raw extra-field blob.
    pub fn with_extra_data(mut self, extra_data: impl Into<Vec<u8>>) -> Self {
        self.extra_data = extra_data.into();
        self
    }

    /// Sets the compression method.
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the unix permission bits.
    pub fn with_unix_mode(mut self, mode: u32) -> Self {
        self.unix_mode = Some(mode);
        self
    }

    /// Final path segment of the entry name.
    pub fn basename(&self) -> &str {
        basename(&self.name)
    }

    /// Returns `true` for directory entries (names ending in `/`).
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Returns the segment after the last `/`, ignoring one trailing `/`.
///
/// ```
/// use rezip_core::metadata::basename;
///
/// assert_eq!(basename("a/b/test.txt"), "test.txt");
/// assert_eq!(basename("test.txt"), "test.txt");
/// assert_eq!(basename("a/dir/"), "dir");
/// ```
pub fn basename(name: &str) -> &str {
    let trimmed = name.strip_suffix('/').unwrap_or(name);
    trimmed.rsplit_once('/').map_or(trimmed, |(_, last)| last)
}

/// Checks that `name` can be stored as a file entry with staged content.
pub(crate) fn validate_entry_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("empty name")
    } else if name.starts_with('/') {
        Some("absolute path")
    } else if name.ends_with('/') {
        Some("directory entries cannot carry content")
    } else if name.contains('\\') {
        Some("backslash separator")
    } else if name.contains('\0') {
        Some("NUL byte")
    } else if name.split('/').any(|segment| matches!(segment, "" | "." | "..")) {
        Some("empty, `.` or `..` path segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ModifyError::InvalidEntryName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Iterator over the `(header_id, data)` records of an extra-field blob.
///
/// Yields `Err(offset)` once, for the first record that runs past the end
/// of the blob, and stops.
pub(crate) struct ExtraFields<'a> {
    rest: &'a [u8],
    offset: usize,
}

impl<'a> ExtraFields<'a> {
    pub(crate) fn new(blob: &'a [u8]) -> Self {
        Self {
            rest: blob,
            offset: 0,
        }
    }
}

impl<'a> Iterator for ExtraFields<'a> {
    type Item = std::result::Result<(u16, &'a [u8]), usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let rest: &'a [u8] = self.rest;
        let malformed = Some(Err(self.offset));
        let &[id_lo, id_hi, len_lo, len_hi, ref tail @ ..] = rest else {
            self.rest = &[];
            return malformed;
        };
        let len = usize::from(u16::from_le_bytes([len_lo, len_hi]));
        if tail.len() < len {
            self.rest = &[];
            return malformed;
        }
        let (data, rest) = tail.split_at(len);
        self.rest = rest;
        self.offset += 4 + len;
        Some(Ok((u16::from_le_bytes([id_lo, id_hi]), data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let metadata = EntryMetadata::new("a.txt");
        assert_eq!(metadata.name, "a.txt");
        assert_eq!(metadata.compression, CompressionMethod::Deflated);
        assert!(metadata.modified.is_none());
        assert!(metadata.comment.is_empty());
        assert!(metadata.extra_data.is_empty());
        assert!(metadata.unix_mode.is_none());
    }

    #[test]
    fn test_renamed_keeps_attributes() {
        let original = EntryMetadata::new("a.txt")
            .with_comment("note")
            .with_compression(CompressionMethod::Stored)
            .with_unix_mode(0o600);
        let copy = original.renamed("b/a.txt");
        assert_eq!(copy.name, "b/a.txt");
        assert_eq!(copy.comment, "note");
        assert_eq!(copy.compression, CompressionMethod::Stored);
        assert_eq!(copy.unix_mode, Some(0o600));
    }

    #[test]
    fn test_basename_exact_segment() {
        assert_eq!(basename("a/b/test.txt"), "test.txt");
        assert_eq!(basename("a/xtest.txt"), "xtest.txt");
        assert_eq!(basename("test.txt"), "test.txt");
        assert_eq!(basename("dir/"), "dir");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn test_is_dir() {
        assert!(EntryMetadata::new("a/").is_dir());
        assert!(!EntryMetadata::new("a").is_dir());
    }

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name("a/b/c.txt").is_ok());
        assert!(validate_entry_name("file").is_ok());

        for bad in ["", "/abs", "dir/", "a\\b", "a//b", "./a", "a/../b", "nul\0"] {
            let err = validate_entry_name(bad).unwrap_err();
            assert!(
                matches!(err, ModifyError::InvalidEntryName { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_extra_fields_parse() {
        let blob = [0x55, 0x54, 0x01, 0x00, 0x07, 0x75, 0x78, 0x00, 0x00];
        let fields: Vec<_> = ExtraFields::new(&blob).collect();
        assert_eq!(fields, vec![Ok((0x5455, &[0x07][..])), Ok((0x7875, &[][..]))]);
    }

    #[test]
    fn test_extra_fields_truncated() {
        let blob = [0x55, 0x54, 0x05, 0x00, 0x07];
        let fields: Vec<_> = ExtraFields::new(&blob).collect();
        assert_eq!(fields, vec![Err(0)]);

        let blob = [0x55, 0x54, 0x00, 0x00, 0x01];
        let fields: Vec<_> = ExtraFields::new(&blob).collect();
        assert_eq!(fields, vec![Ok((0x5455, &[][..])), Err(4)]);
    }
}
