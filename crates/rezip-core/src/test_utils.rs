//! Test utilities for building and inspecting ZIP fixtures.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates an in-memory ZIP archive from `(name, text)` pairs.
///
/// Entries are stored uncompressed with mode 0o644.
///
/// # Examples
///
/// ```
/// use rezip_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("file.txt", "hello"), ("dir/nested.txt", "world!")]);
/// assert!(!zip_data.is_empty());
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipTestBuilder::new(), |builder, (name, text)| {
            builder.add_file(name, text.as_bytes())
        })
        .build()
}

/// Builder for ZIP fixtures with explicit per-entry attributes.
///
/// # Examples
///
/// ```
/// use rezip_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .with_comment("fixture")
///     .build();
/// assert!(!zip_data.is_empty());
/// ```
pub struct ZipTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file with mode 0o644.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a file with an explicit compression method and timestamp.
    #[must_use]
    pub fn add_file_with(
        mut self,
        path: &str,
        data: &[u8],
        method: CompressionMethod,
        modified: DateTime,
    ) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(modified)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Sets the archive-level comment.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.zip.set_comment(comment.to_string());
        self
    }

    /// Sets the archive-level comment from raw bytes.
    #[must_use]
    pub fn with_raw_comment(mut self, comment: &[u8]) -> Self {
        self.zip.set_raw_comment(comment.into());
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Builds the archive and writes it to `path`.
    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads every entry of the archive at `path` as `(name, bytes)` pairs,
/// in archive order, decompressing and CRC-checking each one.
#[must_use]
pub fn read_zip_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

/// Reads the bytes of one entry, or `None` if the archive lacks it.
#[must_use]
pub fn read_zip_entry(path: &Path, name: &str) -> Option<Vec<u8>> {
    read_zip_entries(path)
        .into_iter()
        .find(|(entry_name, _)| entry_name == name)
        .map(|(_, data)| data)
}

/// Reads the compression method and timestamp recorded for `name`.
#[must_use]
pub fn read_zip_attributes(path: &Path, name: &str) -> (CompressionMethod, Option<DateTime>) {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let entry = archive.by_name(name).unwrap();
    (entry.compression(), entry.last_modified())
}

/// Reads the comment of entry `name`.
#[must_use]
pub fn read_zip_entry_comment(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let entry = archive.by_name(name).unwrap();
    entry.comment().to_string()
}

/// Reads the archive-level comment.
#[must_use]
pub fn read_zip_comment(path: &Path) -> Vec<u8> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.comment().to_vec()
}
