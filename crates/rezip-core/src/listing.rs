//! Human-readable listing of what the next save will write.

use std::fmt::Write as _;
use std::path::Path;

use crate::table::EntryTable;
use crate::table::TableEntry;

/// Where an entry's bytes will be read from on the next save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    /// The original archive, at this location.
    Archive(String),
    /// A staged content source, at this location.
    Staged(String),
}

impl EntryOrigin {
    /// Location string shown in the listing.
    pub fn location(&self) -> &str {
        match self {
            Self::Archive(location) | Self::Staged(location) => location,
        }
    }

    /// Returns `true` for staged content.
    pub const fn is_staged(&self) -> bool {
        matches!(self, Self::Staged(_))
    }
}

/// One line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Entry name.
    pub name: String,
    /// Source of the entry's bytes.
    pub origin: EntryOrigin,
}

/// Lists every entry of `table`, sorted by name.
///
/// `archive` is the location of the original archive; it should already
/// be absolute.
pub fn listing(table: &EntryTable, archive: &Path) -> Vec<ListingEntry> {
    let archive_location = archive.display().to_string();
    let mut entries: Vec<ListingEntry> = table
        .iter()
        .map(|(name, entry)| ListingEntry {
            name: name.to_string(),
            origin: match entry {
                TableEntry::Original(_) => EntryOrigin::Archive(archive_location.clone()),
                TableEntry::Staged { content, .. } => EntryOrigin::Staged(content.to_string()),
            },
        })
        .collect();
    entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Renders the listing as `name [location]` lines.
pub fn describe(table: &EntryTable, archive: &Path) -> String {
    listing(table, archive)
        .iter()
        .fold(String::new(), |mut out, entry| {
            let _ = writeln!(out, "{} [{}]", entry.name, entry.origin.location());
            out
        })
}
