//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use rezip_core::ArchiveSession;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let session = add_archive_context(ArchiveSession::load(&args.archive), &args.archive)?;

    formatter.format_listing(session.source_path(), &session.listing())
}
