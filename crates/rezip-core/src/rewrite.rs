//! The single-pass merge of the original archive and the entry table.
//!
//! Output order is fixed: names found in the original archive come first,
//! in their original order, followed by names that only exist in the table,
//! in table order. Original entries are copied raw; staged entries are
//! streamed from their content source and compressed by the codec, which
//! also computes their sizes and CRC.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::FullFileOptions;

use crate::ModifyError;
use crate::Result;
use crate::atomic::write_atomically;
use crate::config::SaveOptions;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::loader::SourceArchive;
use crate::loader::open_archive;
use crate::metadata::CODEC_MANAGED_EXTRA_IDS;
use crate::metadata::EntryMetadata;
use crate::metadata::ExtraFields;
use crate::report::SaveReport;
use crate::source::ContentSource;
use crate::table::EntryTable;
use crate::table::TableEntry;

/// Entries at or above this size need Zip64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Writes the archive described by `table` to `dest`.
///
/// `source` is the archive the table was loaded from. It may be the same
/// path as `dest`: the original is fully read and closed before the new
/// file is renamed over it.
pub(crate) fn rewrite(
    source: &Path,
    table: &EntryTable,
    dest: &Path,
    options: &SaveOptions,
) -> Result<SaveReport> {
    let start = Instant::now();
    let archive = open_archive(source)?;

    let mut report = write_atomically(dest, options.sync_before_persist, |file| {
        let mut merge = Merge {
            source,
            dest,
            table,
            report: SaveReport::new(),
            buffer: CopyBuffer::new(),
        };
        merge.run(archive, BufWriter::new(file), options)?;
        Ok(merge.report)
    })?;

    report.duration = start.elapsed();
    log::info!(
        "wrote {} ({} copied, {} replaced, {} added, {} removed) in {:?}",
        dest.display(),
        report.entries_copied,
        report.entries_replaced,
        report.entries_added,
        report.entries_removed,
        report.duration
    );
    Ok(report)
}

struct Merge<'a> {
    source: &'a Path,
    dest: &'a Path,
    table: &'a EntryTable,
    report: SaveReport,
    buffer: CopyBuffer,
}

impl<'a> Merge<'a> {
    fn run(
        &mut self,
        mut archive: SourceArchive,
        output: BufWriter<&mut File>,
        options: &SaveOptions,
    ) -> Result<()> {
        let mut writer = ZipWriter::new(output);
        if options.preserve_archive_comment && !archive.comment().is_empty() {
            writer.set_raw_comment(archive.comment().into());
        }

        let table = self.table;
        let mut emitted: HashSet<&'a str> = HashSet::with_capacity(table.len());

        for i in 0..archive.len() {
            let entry = archive
                .by_index_raw(i)
                .map_err(|e| ModifyError::read(self.source, e))?;

            let Some((name, state)) = table.get_key_value(entry.name()) else {
                log::debug!("dropping removed entry {}", entry.name());
                self.report.entries_removed += 1;
                continue;
            };
            if !emitted.insert(name) {
                log::debug!("skipping duplicate occurrence of {name}");
                continue;
            }

            match state {
                TableEntry::Original(_) => {
                    log::debug!("copying {name} raw");
                    writer
                        .raw_copy_file(entry)
                        .map_err(|e| ModifyError::write(self.dest, e))?;
                    self.report.entries_copied += 1;
                }
                TableEntry::Staged { metadata, content } => {
                    drop(entry);
                    log::debug!("replacing {name} from {content}");
                    self.write_staged(&mut writer, metadata, content)?;
                    self.report.entries_replaced += 1;
                }
            }
        }
        // The original is fully consumed; release it before the rename.
        drop(archive);

        for (name, state) in table.iter() {
            if emitted.contains(name) {
                continue;
            }
            match state {
                TableEntry::Original(_) => {
                    return Err(ModifyError::read(self.source, ZipError::FileNotFound));
                }
                TableEntry::Staged { metadata, content } => {
                    log::debug!("adding {name} from {content}");
                    self.write_staged(&mut writer, metadata, content)?;
                    self.report.entries_added += 1;
                }
            }
        }

        let output = writer
            .finish()
            .map_err(|e| ModifyError::write(self.dest, e))?;
        output
            .into_inner()
            .map_err(|e| ModifyError::write(self.dest, e.into_error()))?;
        Ok(())
    }

    fn write_staged<W: Write + Seek>(
        &mut self,
        writer: &mut ZipWriter<W>,
        metadata: &EntryMetadata,
        content: &ContentSource,
    ) -> Result<()> {
        let unreadable = |source: std::io::Error| ModifyError::SourceUnreadable {
            name: metadata.name.clone(),
            location: content.to_string(),
            source,
        };

        let mut reader = content.open().map_err(unreadable)?;
        let options = self.entry_options(metadata, reader.len());
        writer
            .start_file(metadata.name.as_str(), options)
            .map_err(|e| ModifyError::write(self.dest, e))?;

        let copied =
            copy_with_buffer(&mut reader, writer, &mut self.buffer).map_err(|e| match e {
                CopyError::Read(source) => unreadable(source),
                CopyError::Write(source) => ModifyError::write(self.dest, source),
            })?;
        self.report.bytes_streamed += copied;
        Ok(())
    }

    /// Translates entry metadata into codec options.
    ///
    /// Attributes the codec cannot express are reported as warnings.
    fn entry_options(&mut self, metadata: &EntryMetadata, len: u64) -> FullFileOptions<'static> {
        let mut options = FullFileOptions::default()
            .compression_method(metadata.compression)
            .large_file(len >= ZIP64_THRESHOLD);
        if let Some(modified) = metadata.modified {
            options = options.last_modified_time(modified);
        }
        if let Some(mode) = metadata.unix_mode {
            options = options.unix_permissions(mode);
        }

        for field in ExtraFields::new(&metadata.extra_data) {
            match field {
                Ok((id, _)) if CODEC_MANAGED_EXTRA_IDS.contains(&id) => {
                    self.report.add_warning(format!(
                        "{}: extra field {id:#06x} dropped, the codec writes its own",
                        metadata.name
                    ));
                }
                Ok((id, data)) => {
                    let data = data.to_vec().into_boxed_slice();
                    if let Err(e) = options.add_extra_data(id, data, false) {
                        self.report.add_warning(format!(
                            "{}: extra field {id:#06x} dropped: {e}",
                            metadata.name
                        ));
                    }
                }
                Err(offset) => {
                    self.report.add_warning(format!(
                        "{}: malformed extra data at byte {offset} dropped",
                        metadata.name
                    ));
                }
            }
        }

        if !metadata.comment.is_empty() {
            options = options.with_file_comment(metadata.comment.clone());
        }

        options
    }
}
