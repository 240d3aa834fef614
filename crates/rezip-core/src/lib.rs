//! Add, replace, and remove entries of existing ZIP archives.
//!
//! `rezip-core` loads an archive's entry list into an [`ArchiveSession`],
//! lets the caller queue additions, overwrites, and removals, and then
//! writes a new archive in a single streaming pass. Untouched entries are
//! copied without being decompressed; staged entries are streamed from
//! their content source and compressed on the way in. The output is written
//! to a temporary file and renamed into place only when complete.
//!
//! # Examples
//!
//! ```no_run
//! use rezip_core::ArchiveSession;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = ArchiveSession::load("input.zip")?;
//! session.add("config/settings.toml", Path::new("settings.toml"), true)?;
//! session.add("notes/new.txt", b"fresh entry".to_vec(), false)?;
//! session.remove("obsolete.bin");
//!
//! let report = session.save("output.zip")?;
//! println!("copied {} entries untouched", report.entries_copied);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod config;
pub mod copy;
pub mod error;
pub mod listing;
mod loader;
pub mod metadata;
pub mod report;
mod rewrite;
pub mod session;
pub mod source;
pub mod table;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main API types
pub use config::SaveOptions;
pub use error::ModifyError;
pub use error::Result;
pub use listing::EntryOrigin;
pub use listing::ListingEntry;
pub use metadata::EntryMetadata;
pub use report::SaveReport;
pub use session::ArchiveSession;
pub use source::ContentSource;
pub use table::EntryTable;
pub use table::TableEntry;

// Codec types that appear in the public API
pub use zip::CompressionMethod;
pub use zip::DateTime;
