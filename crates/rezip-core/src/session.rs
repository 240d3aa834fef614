//! Modification sessions.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::SaveOptions;
use crate::listing::ListingEntry;
use crate::listing::describe;
use crate::listing::listing;
use crate::loader::load_table;
use crate::metadata::EntryMetadata;
use crate::report::SaveReport;
use crate::rewrite::rewrite;
use crate::source::ContentSource;
use crate::table::EntryTable;
use crate::table::TableEntry;

/// An open archive plus the changes queued against it.
///
/// Loading snapshots the archive's entry attributes; `add` and `remove`
/// only edit that snapshot. Nothing touches the disk until [`save`], which
/// streams the original archive and the staged content into a new file.
/// A session can be saved any number of times.
///
/// [`save`]: ArchiveSession::save
///
/// # Examples
///
/// ```no_run
/// use rezip_core::ArchiveSession;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = ArchiveSession::load("app.jar")?;
/// session.add("a/b/c/test.txt", Path::new("test2.txt"), true)?;
/// session.remove_by_basename("MANIFEST.SF");
/// print!("{}", session.describe());
///
/// let report = session.save("app-modified.jar")?;
/// println!("{} entries written", report.total_entries());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveSession {
    source: PathBuf,
    table: EntryTable,
}

impl ArchiveSession {
    /// Opens the archive at `path` and snapshots its entries.
    ///
    /// # Errors
    ///
    /// Returns [`ModifyError::ArchiveRead`](crate::ModifyError::ArchiveRead)
    /// if the archive cannot be opened or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let table = load_table(&source)?;
        Ok(Self { source, table })
    }

    /// Stages `content` under `name` with default attributes.
    ///
    /// # Errors
    ///
    /// - `DuplicateEntry` if `name` exists and `overwrite` is false
    /// - `InvalidEntryName` if `name` cannot hold file content
    ///
    /// The session is unchanged on error.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        content: impl Into<ContentSource>,
        overwrite: bool,
    ) -> Result<()> {
        self.table
            .stage(EntryMetadata::new(name), content.into(), overwrite)
    }

    /// Stages `content` with the attributes of `metadata`.
    ///
    /// Same contract as [`add`](Self::add); the entry name is
    /// `metadata.name`.
    pub fn add_with_metadata(
        &mut self,
        metadata: EntryMetadata,
        content: impl Into<ContentSource>,
        overwrite: bool,
    ) -> Result<()> {
        self.table.stage(metadata, content.into(), overwrite)
    }

    /// Removes `name` and any content staged for it.
    ///
    /// Returns whether the name was present; removing an absent name is
    /// not an error.
    pub fn remove(&mut self, name: &str) -> bool {
        self.table.remove(name)
    }

    /// Removes every entry whose last path segment is exactly `filename`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_basename(&mut self, filename: &str) -> usize {
        let removed = self.table.remove_by_basename(filename);
        log::debug!("removed {removed} entries named {filename}");
        removed
    }

    /// Writes the modified archive to `dest` with default options.
    ///
    /// `dest` may be the archive the session was loaded from.
    ///
    /// # Errors
    ///
    /// - `ArchiveRead` if the original archive cannot be streamed
    /// - `ArchiveWrite` if the destination cannot be written
    /// - `SourceUnreadable` if staged content cannot be read
    ///
    /// On error nothing is written at `dest`.
    pub fn save<P: AsRef<Path>>(&self, dest: P) -> Result<SaveReport> {
        self.save_with(dest, &SaveOptions::default())
    }

    /// Writes the modified archive to `dest` with explicit options.
    pub fn save_with<P: AsRef<Path>>(&self, dest: P, options: &SaveOptions) -> Result<SaveReport> {
        rewrite(&self.source, &self.table, dest.as_ref(), options)
    }

    /// Sorted `name [source]` listing of the entries the next save writes.
    pub fn describe(&self) -> String {
        describe(&self.table, &self.source)
    }

    /// Structured form of [`describe`](Self::describe).
    pub fn listing(&self) -> Vec<ListingEntry> {
        listing(&self.table, &self.source)
    }

    /// Absolute path of the original archive.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// The entry table.
    pub const fn table(&self) -> &EntryTable {
        &self.table
    }

    /// Number of entries the next save writes.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the next save writes an empty archive.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if `name` will be written.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// Attributes `name` will be written with.
    pub fn metadata(&self, name: &str) -> Option<&EntryMetadata> {
        self.table.get(name).map(TableEntry::metadata)
    }

    /// Returns `true` if `name` has staged content.
    pub fn is_staged(&self, name: &str) -> bool {
        self.table.get(name).is_some_and(TableEntry::is_staged)
    }

    /// Entry names in table order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.table.iter().map(|(name, _)| name)
    }
}

impl fmt::Display for ArchiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
