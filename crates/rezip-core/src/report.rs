//! Save operation reporting.

use std::time::Duration;

/// Report of one save (rewrite) pass.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    /// Original entries copied without decompression.
    pub entries_copied: usize,

    /// Original entries whose bytes were replaced by staged content.
    pub entries_replaced: usize,

    /// Entries that did not exist in the original archive.
    pub entries_added: usize,

    /// Original entries left out because they were removed.
    pub entries_removed: usize,

    /// Uncompressed bytes streamed from staged content sources.
    pub bytes_streamed: u64,

    /// Duration of the save.
    pub duration: Duration,

    /// Attributes or records that could not be carried over.
    pub warnings: Vec<String>,
}

impl SaveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Number of entries in the written archive.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries_copied + self.entries_replaced + self.entries_added
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
