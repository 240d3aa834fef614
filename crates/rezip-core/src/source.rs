//! Staged content sources.

use std::fmt;
use std::fs::File;
use std::io::Cursor;
use std::io::Read;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the bytes of a staged entry come from.
///
/// A source is only a reference: files are opened when the archive is
/// saved, so a file that disappears between `add` and `save` surfaces as
/// [`ModifyError::SourceUnreadable`](crate::ModifyError::SourceUnreadable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A file on disk, stored as an absolute path.
    File(PathBuf),
    /// Bytes held in memory.
    Bytes(Arc<[u8]>),
}

impl ContentSource {
    /// Creates a file source, resolving `path` against the current
    /// directory.
    ///
    /// If the path cannot be made absolute it is kept as given.
    pub fn file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::File(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
    }

    /// Creates an in-memory source.
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Returns the file path for file sources.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }

    /// Opens the source for streaming.
    pub(crate) fn open(&self) -> io::Result<SourceReader<'_>> {
        match self {
            Self::File(path) => {
                let file = File::open(path)?;
                let len = file.metadata()?.len();
                Ok(SourceReader {
                    inner: SourceInner::File(file),
                    len,
                })
            }
            Self::Bytes(bytes) => Ok(SourceReader {
                inner: SourceInner::Bytes(Cursor::new(bytes)),
                len: bytes.len() as u64,
            }),
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Bytes(bytes) => write!(f, "<memory: {} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ContentSource {
    fn from(path: PathBuf) -> Self {
        Self::file(path)
    }
}

impl From<&Path> for ContentSource {
    fn from(path: &Path) -> Self {
        Self::file(path)
    }
}

impl From<Vec<u8>> for ContentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::bytes(bytes)
    }
}

impl From<&[u8]> for ContentSource {
    fn from(bytes: &[u8]) -> Self {
        Self::bytes(bytes)
    }
}

/// An opened content source together with its length at open time.
pub(crate) struct SourceReader<'a> {
    inner: SourceInner<'a>,
    len: u64,
}

enum SourceInner<'a> {
    File(File),
    Bytes(Cursor<&'a Arc<[u8]>>),
}

impl SourceReader<'_> {
    pub(crate) const fn len(&self) -> u64 {
        self.len
    }
}

impl Read for SourceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            SourceInner::File(file) => file.read(buf),
            SourceInner::Bytes(cursor) => cursor.read(buf),
        }
    }
}
