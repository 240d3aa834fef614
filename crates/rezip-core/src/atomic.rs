//! Atomic replacement of the output archive.
//!
//! The archive is written to a temporary file next to the destination and
//! renamed over it only after the whole write succeeded. If anything fails
//! the temporary file is deleted and the destination is left as it was.

use std::fs::File;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ModifyError;
use crate::Result;

const TEMP_PREFIX: &str = ".rezip-";
const TEMP_SUFFIX: &str = ".tmp";

/// Runs `write_fn` against a temporary file and moves it to `dest` on
/// success.
///
/// Permissions of an existing `dest` are carried over to the new file.
pub fn write_atomically<T, F>(dest: &Path, sync: bool, write_fn: F) -> Result<T>
where
    F: FnOnce(&mut File) -> Result<T>,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| ModifyError::write(dest, e))?;

    let value = write_fn(temp.as_file_mut())?;

    copy_permissions(dest, &temp).map_err(|e| ModifyError::write(dest, e))?;
    if sync {
        temp.as_file()
            .sync_all()
            .map_err(|e| ModifyError::write(dest, e))?;
    }

    temp.persist(dest)
        .map_err(|e| ModifyError::write(dest, e.error))?;
    log::debug!("persisted {}", dest.display());

    Ok(value)
}

/// Gives the temporary file the permissions the destination ends up with.
///
/// Temporary files are created owner-only; an overwritten archive keeps
/// its previous mode and a new one gets `0o644`.
fn copy_permissions(dest: &Path, temp: &NamedTempFile) -> std::io::Result<()> {
    match std::fs::metadata(dest) {
        Ok(existing) => temp.as_file().set_permissions(existing.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => default_permissions(temp),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions(temp: &NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    temp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(_temp: &NamedTempFile) -> std::io::Result<()> {
    Ok(())
}
