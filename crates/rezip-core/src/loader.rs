//! Building the entry table from an existing archive.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use zip::ZipArchive;

use crate::ModifyError;
use crate::Result;
use crate::metadata::EntryMetadata;
use crate::table::EntryTable;

/// Reader type used for the original archive.
pub(crate) type SourceArchive = ZipArchive<BufReader<File>>;

/// Opens the archive at `path` and parses its central directory.
pub(crate) fn open_archive(path: &Path) -> Result<SourceArchive> {
    let file = File::open(path).map_err(|e| ModifyError::read(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| ModifyError::read(path, e))
}

/// Snapshots every entry of the archive at `path` into a fresh table.
///
/// Entries are read raw, so encrypted or exotically compressed entries
/// load fine; only their attributes are inspected. Sizes and CRCs are not
/// carried over.
pub(crate) fn load_table(path: &Path) -> Result<EntryTable> {
    let mut archive = open_archive(path)?;
    let mut table = EntryTable::new();

    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| ModifyError::read(path, e))?;

        let metadata = EntryMetadata {
            name: entry.name().to_string(),
            modified: entry.last_modified(),
            comment: entry.comment().to_string(),
            extra_data: entry.extra_data().map(<[u8]>::to_vec).unwrap_or_default(),
            compression: entry.compression(),
            unix_mode: entry.unix_mode(),
        };

        if !table.insert_original(metadata) {
            log::warn!(
                "{}: duplicate entry {} ignored, keeping the first occurrence",
                path.display(),
                entry.name()
            );
        }
    }

    log::info!("loaded {} entries from {}", table.len(), path.display());
    Ok(table)
}
