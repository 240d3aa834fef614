//! The entry table: what the next saved archive will contain.
//!
//! One ordered map holds every entry name together with its state. An
//! entry is either still backed by the original archive or staged with
//! replacement content, so "pending replacements are a subset of the
//! entries" holds by construction.

use indexmap::IndexMap;

use crate::ModifyError;
use crate::Result;
use crate::metadata::EntryMetadata;
use crate::metadata::basename;
use crate::metadata::validate_entry_name;
use crate::source::ContentSource;

/// State of one entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEntry {
    /// Bytes come from the original archive, unchanged.
    Original(EntryMetadata),
    /// Bytes come from a staged content source.
    Staged {
        /// Attributes the entry will be written with.
        metadata: EntryMetadata,
        /// Replacement content.
        content: ContentSource,
    },
}

impl TableEntry {
    /// Attributes the entry will be written with.
    pub const fn metadata(&self) -> &EntryMetadata {
        match self {
            Self::Original(metadata) | Self::Staged { metadata, .. } => metadata,
        }
    }

    /// Replacement content, for staged entries.
    pub const fn content(&self) -> Option<&ContentSource> {
        match self {
            Self::Original(_) => None,
            Self::Staged { content, .. } => Some(content),
        }
    }

    /// Returns `true` if the entry has a pending replacement.
    pub const fn is_staged(&self) -> bool {
        matches!(self, Self::Staged { .. })
    }
}

/// Ordered mapping from entry name to [`TableEntry`].
///
/// Iteration order is insertion order; removals keep the relative order
/// of the remaining names.
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    entries: IndexMap<String, TableEntry>,
}

impl EntryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry found in the original archive.
    ///
    /// Returns `false` and leaves the table unchanged if the name is
    /// already present.
    pub(crate) fn insert_original(&mut self, metadata: EntryMetadata) -> bool {
        if self.entries.contains_key(&metadata.name) {
            return false;
        }
        self.entries
            .insert(metadata.name.clone(), TableEntry::Original(metadata));
        true
    }

    /// Stages `content` under `metadata.name`.
    ///
    /// Existing entries are replaced only when `overwrite` is set; a
    /// replaced entry keeps its position in the table.
    pub fn stage(
        &mut self,
        metadata: EntryMetadata,
        content: ContentSource,
        overwrite: bool,
    ) -> Result<()> {
        validate_entry_name(&metadata.name)?;

        if !overwrite && self.entries.contains_key(&metadata.name) {
            return Err(ModifyError::DuplicateEntry {
                name: metadata.name,
            });
        }

        log::debug!("staging {} from {content}", metadata.name);
        self.entries
            .insert(metadata.name.clone(), TableEntry::Staged { metadata, content });
        Ok(())
    }

    /// Removes `name` and its pending replacement, if any.
    ///
    /// Returns whether the name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name).is_some()
    }

    /// Removes every entry whose final path segment equals `filename`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_basename(&mut self, filename: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, _| basename(name) != filename);
        before - self.entries.len()
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TableEntry> {
        self.entries.get(name)
    }

    /// Looks up an entry, returning the stored key alongside it.
    pub(crate) fn get_key_value(&self, name: &str) -> Option<(&str, &TableEntry)> {
        self.entries
            .get_key_value(name)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of entries with a pending replacement.
    pub fn staged_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_staged()).count()
    }
}
