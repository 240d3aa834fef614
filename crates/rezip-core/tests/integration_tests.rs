//! Integration tests for rezip-core.
//!
//! These tests drive whole sessions against real archives on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rezip_core::ArchiveSession;
use rezip_core::CompressionMethod;
use rezip_core::ContentSource;
use rezip_core::DateTime;
use rezip_core::EntryMetadata;
use rezip_core::ModifyError;
use rezip_core::SaveOptions;
use rezip_core::test_utils::ZipTestBuilder;
use rezip_core::test_utils::create_test_zip;
use rezip_core::test_utils::read_zip_attributes;
use rezip_core::test_utils::read_zip_comment;
use rezip_core::test_utils::read_zip_entries;
use rezip_core::test_utils::read_zip_entry;
use rezip_core::test_utils::read_zip_entry_comment;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_archive(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("input.zip");
    fs::write(&path, create_test_zip(entries)).unwrap();
    path
}

fn entry_names(path: &Path) -> Vec<String> {
    read_zip_entries(path).into_iter().map(|(name, _)| name).collect()
}

fn temp_files_in(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn test_overwrite_replaces_bytes() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(
        temp.path(),
        &[("a/b/c/test.txt", "old"), ("other.txt", "keep")],
    );
    let replacement = temp.path().join("test2.txt");
    fs::write(&replacement, "new contents of test.txt").unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    session
        .add("a/b/c/test.txt", replacement.as_path(), true)
        .unwrap();
    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert_eq!(report.entries_replaced, 1);
    assert_eq!(report.entries_copied, 1);
    assert_eq!(
        read_zip_entry(&output, "a/b/c/test.txt"),
        Some(b"new contents of test.txt".to_vec())
    );
    assert_eq!(read_zip_entry(&output, "other.txt"), Some(b"keep".to_vec()));
}

#[test]
fn test_non_overwriting_add_on_existing_name() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "original")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    let before = session.listing();
    let err = session.add("a.txt", b"other".to_vec(), false).unwrap_err();

    assert!(matches!(err, ModifyError::DuplicateEntry { ref name } if name == "a.txt"));
    assert!(err.is_recoverable());
    assert_eq!(session.listing(), before);

    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();
    assert_eq!(read_zip_entry(&output, "a.txt"), Some(b"original".to_vec()));
}

#[test]
fn test_remove_original_and_staged_entries() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("gone.txt", "x"), ("kept.txt", "y")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("staged.txt", b"z".to_vec(), false).unwrap();
    assert!(session.remove("gone.txt"));
    assert!(session.remove("staged.txt"));
    assert!(!session.remove("never-existed.txt"));

    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert_eq!(entry_names(&output), vec!["kept.txt"]);
    assert_eq!(report.entries_removed, 1);
    assert_eq!(report.entries_added, 0);
}

#[test]
fn test_remove_by_basename_is_exact() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(
        temp.path(),
        &[("a/test.txt", "1"), ("a/xtest.txt", "2"), ("b/c/test.txt", "3")],
    );

    let mut session = ArchiveSession::load(&input).unwrap();
    assert_eq!(session.remove_by_basename("test.txt"), 2);

    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();
    assert_eq!(entry_names(&output), vec!["a/xtest.txt"]);
}

#[test]
fn test_round_trip_without_changes() {
    let temp = TempDir::new().unwrap();
    let modified = DateTime::from_date_and_time(2019, 3, 4, 5, 6, 8).unwrap();
    let input = temp.path().join("input.zip");
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 7) as u8).collect();
    ZipTestBuilder::new()
        .add_file("plain.txt", b"plain text")
        .add_directory("dir/")
        .add_file_with("dir/packed.bin", &payload, CompressionMethod::Deflated, modified)
        .with_comment("archive comment")
        .write_to(&input);

    let session = ArchiveSession::load(&input).unwrap();
    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert_eq!(report.entries_copied, 3);
    assert_eq!(report.bytes_streamed, 0);
    assert_eq!(read_zip_entries(&output), read_zip_entries(&input));
    assert_eq!(
        read_zip_attributes(&output, "dir/packed.bin"),
        (CompressionMethod::Deflated, Some(modified))
    );
    assert_eq!(read_zip_comment(&output), b"archive comment");
}

#[test]
fn test_archive_comment_can_be_dropped() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.zip");
    ZipTestBuilder::new()
        .add_file("a.txt", b"a")
        .with_comment("drop me")
        .write_to(&input);

    let session = ArchiveSession::load(&input).unwrap();
    let output = temp.path().join("output.zip");
    let options = SaveOptions {
        preserve_archive_comment: false,
        ..SaveOptions::fast()
    };
    session.save_with(&output, &options).unwrap();

    assert!(read_zip_comment(&output).is_empty());
}

#[test]
fn test_pure_addition_is_written() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[]);
    let source = temp.path().join("file.txt");
    fs::write(&source, "brand new").unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("new/file.txt", source.as_path(), false).unwrap();
    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert_eq!(report.entries_added, 1);
    assert_eq!(
        read_zip_entries(&output),
        vec![("new/file.txt".to_string(), b"brand new".to_vec())]
    );
}

#[test]
fn test_plain_add_is_stamped_with_write_time() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[]);

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("new.txt", b"x".to_vec(), false).unwrap();
    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();

    let (method, modified) = read_zip_attributes(&output, "new.txt");
    assert_eq!(method, CompressionMethod::Deflated);
    assert!(modified.unwrap().year() > 1980);
}

#[test]
fn test_pure_addition_into_unrelated_archive() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("unrelated.txt", "u")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    session
        .add("new/file.txt", b"added".to_vec(), false)
        .unwrap();
    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();

    assert_eq!(entry_names(&output), vec!["unrelated.txt", "new/file.txt"]);
    assert_eq!(read_zip_entry(&output, "new/file.txt"), Some(b"added".to_vec()));
}

#[test]
fn test_output_order_rules() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("c", "c"), ("a", "a"), ("b", "b")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("y-added", b"y".to_vec(), false).unwrap();
    session.add("x-added", b"x".to_vec(), false).unwrap();
    session.add("b", b"B".to_vec(), true).unwrap();
    session.remove("a");
    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();

    assert_eq!(entry_names(&output), vec!["c", "b", "y-added", "x-added"]);
    assert_eq!(read_zip_entry(&output, "b"), Some(b"B".to_vec()));
}

#[test]
fn test_metadata_template_is_honored() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);
    let modified = DateTime::from_date_and_time(2001, 2, 3, 4, 5, 6).unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    let template = EntryMetadata::new("docs/readme.txt")
        .with_modified(modified)
        .with_compression(CompressionMethod::Stored)
        .with_comment("generated file");
    session
        .add_with_metadata(template, b"read me".to_vec(), false)
        .unwrap();
    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert!(!report.has_warnings());
    assert_eq!(
        read_zip_entry_comment(&output, "docs/readme.txt"),
        "generated file"
    );

    assert_eq!(
        read_zip_attributes(&output, "docs/readme.txt"),
        (CompressionMethod::Stored, Some(modified))
    );
    assert_eq!(
        read_zip_entry(&output, "docs/readme.txt"),
        Some(b"read me".to_vec())
    );
}

#[test]
fn test_overwrite_with_different_size() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("grow.txt", "tiny")]);
    let big = "0123456789".repeat(50_000);

    let mut session = ArchiveSession::load(&input).unwrap();
    let template = session.metadata("grow.txt").unwrap().clone();
    session
        .add_with_metadata(template, big.as_bytes().to_vec(), true)
        .unwrap();
    let output = temp.path().join("output.zip");
    let report = session.save(&output).unwrap();

    assert_eq!(report.bytes_streamed, big.len() as u64);
    assert_eq!(read_zip_entry(&output, "grow.txt"), Some(big.into_bytes()));
}

#[test]
fn test_vanished_source_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);
    let source = temp.path().join("ephemeral.txt");
    fs::write(&source, "here now").unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("b.txt", source.as_path(), false).unwrap();
    fs::remove_file(&source).unwrap();

    let output = temp.path().join("output.zip");
    let err = session.save(&output).unwrap_err();

    match err {
        ModifyError::SourceUnreadable { name, location, .. } => {
            assert_eq!(name, "b.txt");
            assert!(location.ends_with("ephemeral.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
    assert!(temp_files_in(temp.path()).is_empty());
}

#[test]
fn test_failed_save_keeps_existing_destination() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);
    let output = temp.path().join("output.zip");
    fs::write(&output, "previous archive").unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    session
        .add("b.txt", ContentSource::file(temp.path().join("missing")), false)
        .unwrap();

    assert!(session.save(&output).is_err());
    assert_eq!(fs::read(&output).unwrap(), b"previous archive");
}

#[test]
fn test_in_place_failure_keeps_original() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);
    let original = fs::read(&input).unwrap();

    let mut session = ArchiveSession::load(&input).unwrap();
    session
        .add("b.txt", ContentSource::file(temp.path().join("missing")), false)
        .unwrap();

    assert!(session.save(&input).is_err());
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_unwritable_destination() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);
    let session = ArchiveSession::load(&input).unwrap();

    let err = session
        .save(temp.path().join("missing-dir").join("out.zip"))
        .unwrap_err();
    assert!(matches!(err, ModifyError::ArchiveWrite { .. }));
}

#[test]
fn test_load_rejects_corrupt_archive() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.zip");
    fs::write(&path, "PK\u{3}\u{4} definitely not a full archive").unwrap();

    let err = ArchiveSession::load(&path).unwrap_err();
    assert!(matches!(err, ModifyError::ArchiveRead { .. }));
}

#[test]
fn test_multiple_saves_are_independent() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    let first = temp.path().join("first.zip");
    session.save(&first).unwrap();

    session.add("b.txt", b"b".to_vec(), false).unwrap();
    let second = temp.path().join("second.zip");
    session.save(&second).unwrap();

    assert_eq!(entry_names(&first), vec!["a.txt"]);
    assert_eq!(entry_names(&second), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_directory_entries_survive() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.zip");
    ZipTestBuilder::new()
        .add_directory("assets/")
        .add_file("assets/logo.txt", b"logo")
        .write_to(&input);

    let mut session = ArchiveSession::load(&input).unwrap();
    session.add("assets/new.txt", b"n".to_vec(), false).unwrap();
    let output = temp.path().join("output.zip");
    session.save(&output).unwrap();

    assert_eq!(
        entry_names(&output),
        vec!["assets/", "assets/logo.txt", "assets/new.txt"]
    );
}

#[test]
fn test_directory_name_cannot_be_staged() {
    let temp = TempDir::new().unwrap();
    let input = write_archive(temp.path(), &[("a.txt", "a")]);

    let mut session = ArchiveSession::load(&input).unwrap();
    let err = session.add("dir/", b"x".to_vec(), true).unwrap_err();
    assert!(matches!(err, ModifyError::InvalidEntryName { .. }));
    assert_eq!(session.len(), 1);
}
