//! Options controlling how a modified archive is written.

/// Save-time configuration.
///
/// # Examples
///
/// ```
/// use rezip_core::SaveOptions;
///
/// let options = SaveOptions {
///     sync_before_persist: false,
///     ..Default::default()
/// };
/// assert!(options.preserve_archive_comment);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// `fsync` the temporary output before renaming it over the
    /// destination.
    pub sync_before_persist: bool,

    /// Copy the original archive's comment into the output.
    pub preserve_archive_comment: bool,
}

impl Default for SaveOptions {
    /// Durable writes, archive comment preserved.
    fn default() -> Self {
        Self {
            sync_before_persist: true,
            preserve_archive_comment: true,
        }
    }
}

impl SaveOptions {
    /// Options for scratch output where durability does not matter.
    ///
    /// Skips the `fsync`; everything else keeps its default.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            sync_before_persist: false,
            ..Self::default()
        }
    }
}
