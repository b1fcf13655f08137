//! Session lifecycle: attach, statistics, close.

use std::path::Path;

use crate::{WriteError, WriteMode, WriteReceipt, WriteStats, WriterConfig};

/// One open writer bound to exactly one target file.
///
/// A session is owned by the caller that attached it and is single-threaded:
/// no method may be called concurrently on the same session. Release it with
/// [`close`](Session::close) on every exit path; dropping an unclosed session
/// closes it as well.
///
/// # Example
///
/// ```rust
/// use range_writer::{DirectWriter, Session, WriteBytes, WriteMode};
///
/// # fn main() -> Result<(), range_writer::WriteError> {
/// let dir = tempfile::tempdir().unwrap();
/// let mut writer = DirectWriter::attach(dir.path().join("out.bin"), WriteMode::Truncate)?;
/// writer.write(b"abc")?.write(b"def")?;
/// assert_eq!(writer.stats().write_bytes_total, 6);
/// writer.close();
/// # Ok(())
/// # }
/// ```
pub trait Session: Sized {
    /// Attach to `path` with an explicit configuration.
    ///
    /// Parent directories are created on demand and a missing file is
    /// created empty. Construction is all-or-nothing: on error no handle is
    /// held.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `config` is out of range
    /// - [`WriteError::InvalidTarget`] if `path` is a directory
    /// - [`WriteError::PathCreation`] if the parent directory or the file cannot be created
    /// - [`WriteError::AccessDenied`] if the existing file is not writable
    fn attach_with(
        path: impl AsRef<Path>,
        mode: WriteMode,
        config: &WriterConfig,
    ) -> Result<Self, WriteError>;

    /// Attach to `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Same as [`attach_with`](Session::attach_with).
    fn attach(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self, WriteError> {
        Self::attach_with(path, mode, &WriterConfig::default())
    }

    /// Canonical path of the target.
    fn path(&self) -> &Path;

    /// Running statistics.
    fn stats(&self) -> WriteStats;

    /// Path and byte count for the upload handler.
    fn receipt(&self) -> WriteReceipt;

    /// Returns `true` once [`close`](Session::close) has run.
    fn is_closed(&self) -> bool;

    /// Release the underlying handle.
    ///
    /// Safe to call more than once. A failure while releasing is logged and
    /// never returned. Later operations fail with [`WriteError::Closed`].
    fn close(&mut self);
}
