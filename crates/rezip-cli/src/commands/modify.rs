//! Modify command implementation.

use crate::cli::ModifyArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use rezip_core::ArchiveSession;
use rezip_core::SaveOptions;

pub fn execute(args: &ModifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let archive = args.archive.as_path();
    let mut session = add_archive_context(ArchiveSession::load(archive), archive)?;

    apply_changes(&mut session, args, formatter)?;

    if args.dry_run {
        return formatter.format_listing(session.source_path(), &session.listing());
    }

    let dest = args.output.as_deref().unwrap_or(archive);
    let options = SaveOptions {
        sync_before_persist: !args.no_sync,
        preserve_archive_comment: !args.drop_comment,
    };
    let report = add_archive_context(session.save_with(dest, &options), archive)?;

    formatter.format_save_result(dest, &report)
}

/// Removals first, then new entries, then overwrites.
fn apply_changes(
    session: &mut ArchiveSession,
    args: &ModifyArgs,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let archive = args.archive.as_path();

    for name in &args.remove {
        if !session.remove(name) {
            formatter.format_warning(&format!("no entry named '{name}' to remove"));
        }
    }

    for filename in &args.remove_basename {
        if session.remove_by_basename(filename) == 0 {
            formatter.format_warning(&format!("no entries with file name '{filename}'"));
        }
    }

    for spec in &args.add {
        log::debug!("adding {} from {}", spec.name, spec.path.display());
        add_archive_context(
            session.add(spec.name.as_str(), spec.path.as_path(), false),
            archive,
        )?;
    }

    for spec in &args.replace {
        log::debug!("replacing {} from {}", spec.name, spec.path.display());
        add_archive_context(
            session.add(spec.name.as_str(), spec.path.as_path(), true),
            archive,
        )?;
    }

    Ok(())
}
