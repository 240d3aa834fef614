//! Chunked byte transfer with a reusable buffer.
//!
//! Staged content is streamed into the output archive in fixed-size chunks
//! so that no entry is ever held in memory as a whole. Read and write
//! failures are reported separately because they map to different
//! [`ModifyError`](crate::ModifyError) variants: a failing reader is an
//! unreadable content source, a failing writer is an unwritable destination.

use std::io::Read;
use std::io::Write;
use std::io::{self};

/// Chunk size for streaming entry content (64 KiB).
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap buffer reused across every staged entry of one save.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a copy failed.
#[derive(Debug)]
pub enum CopyError {
    /// The reader returned an error.
    Read(io::Error),
    /// The writer returned an error.
    Write(io::Error),
}

/// Copies everything from `reader` into `writer` through `buffer`.
///
/// Returns the number of bytes transferred. Interrupted reads are retried.
///
/// # Examples
///
/// ```
/// use rezip_core::copy::{CopyBuffer, copy_with_buffer};
/// use std::io::Cursor;
///
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
/// let copied = copy_with_buffer(&mut Cursor::new(b"abc"), &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 3);
/// assert_eq!(output, b"abc");
/// ```
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total += bytes_read as u64;
    }

    Ok(total)
}
