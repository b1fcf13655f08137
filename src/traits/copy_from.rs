//! Copying from streams, files and paths.
//!
//! Sources are taken by value: the writer owns them for the duration of the
//! call and drops (closes) them on every exit path, success or failure.
//! A source that runs dry before the requested length is a short copy, not an
//! error; the short count lands in
//! [`WriteStats::pre_write_count`](crate::WriteStats::pre_write_count).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::validate;
use crate::WriteError;

/// Copy from a byte source into the session at its cursor.
///
/// # Example
///
/// ```rust
/// use range_writer::{CopyFrom, DirectWriter, Session, WriteMode};
/// use std::io::Cursor;
///
/// # fn main() -> Result<(), range_writer::WriteError> {
/// let dir = tempfile::tempdir().unwrap();
/// let mut writer = DirectWriter::attach(dir.path().join("part.bin"), WriteMode::Truncate)?;
///
/// // 12 bytes available, skip 5, ask for 10: only 7 arrive.
/// writer.copy_from_reader_range(Cursor::new(b"0123456789ab".to_vec()), 5, 10)?;
/// assert_eq!(writer.stats().pre_write_count, 7);
/// # Ok(())
/// # }
/// ```
pub trait CopyFrom {
    /// Drain `reader` into the target.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] on a read or write fault
    fn copy_from_reader<R: Read>(&mut self, reader: R) -> Result<&mut Self, WriteError>;

    /// Discard the first `skip` bytes of `reader`, then copy up to `len` bytes.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `skip < 0` or `len <= 0`
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] on a read or write fault
    fn copy_from_reader_range<R: Read>(
        &mut self,
        reader: R,
        skip: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError>;

    /// Copy the whole of `source`, from its first byte.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] on a read, write or map fault
    fn copy_from_file(&mut self, source: File) -> Result<&mut Self, WriteError>;

    /// Copy up to `len` bytes of `source` starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `offset < 0` or `len <= 0`
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] on a read, write or map fault
    fn copy_from_file_range(
        &mut self,
        source: File,
        offset: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError>;

    /// Open `path` read-only and copy all of it.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidSourcePath`] if `path` is missing, a directory or unreadable
    /// - anything [`copy_from_file`](CopyFrom::copy_from_file) returns
    fn copy_from_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, WriteError> {
        let source = validate::open_source(path.as_ref())?;
        self.copy_from_file(source)
    }

    /// Open `path` read-only and copy up to `len` bytes from `offset`.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `offset < 0` or `len <= 0`
    /// - [`WriteError::InvalidSourcePath`] if `path` is missing, a directory or unreadable
    /// - anything [`copy_from_file_range`](CopyFrom::copy_from_file_range) returns
    fn copy_from_path_range(
        &mut self,
        path: impl AsRef<Path>,
        offset: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError> {
        validate::non_negative("offset", offset)?;
        validate::positive("len", len)?;
        let source = validate::open_source(path.as_ref())?;
        self.copy_from_file_range(source, offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    /// Records what it was asked to copy without writing anywhere.
    #[derive(Default)]
    struct Recorder {
        file_ranges: Vec<(i64, i64)>,
        whole_files: usize,
    }

    impl CopyFrom for Recorder {
        fn copy_from_reader<R: Read>(&mut self, _reader: R) -> Result<&mut Self, WriteError> {
            Ok(self)
        }

        fn copy_from_reader_range<R: Read>(
            &mut self,
            _reader: R,
            _skip: i64,
            _len: i64,
        ) -> Result<&mut Self, WriteError> {
            Ok(self)
        }

        fn copy_from_file(&mut self, mut source: File) -> Result<&mut Self, WriteError> {
            source.seek(SeekFrom::Start(0))?;
            self.whole_files += 1;
            Ok(self)
        }

        fn copy_from_file_range(
            &mut self,
            _source: File,
            offset: i64,
            len: i64,
        ) -> Result<&mut Self, WriteError> {
            self.file_ranges.push((offset, len));
            Ok(self)
        }
    }

    #[test]
    fn path_delegates_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src.bin");
        std::fs::write(&source, b"data").unwrap();

        let mut recorder = Recorder::default();
        recorder.copy_from_path(&source).unwrap();
        recorder.copy_from_path_range(&source, 1, 2).unwrap();
        assert_eq!(recorder.whole_files, 1);
        assert_eq!(recorder.file_ranges, vec![(1, 2)]);
    }

    #[test]
    fn missing_path_is_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::default();
        let result = recorder.copy_from_path(dir.path().join("missing.bin"));
        assert!(matches!(result, Err(WriteError::InvalidSourcePath { .. })));
    }

    #[test]
    fn directory_path_is_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::default();
        let result = recorder.copy_from_path_range(dir.path(), 0, 1);
        assert!(matches!(result, Err(WriteError::InvalidSourcePath { .. })));
    }

    #[test]
    fn range_arguments_checked_before_open() {
        let mut recorder = Recorder::default();
        let missing = Path::new("/definitely/not/here");
        assert!(matches!(
            recorder.copy_from_path_range(missing, -1, 4),
            Err(WriteError::InvalidArgument { .. })
        ));
        assert!(matches!(
            recorder.copy_from_path_range(missing, 0, 0),
            Err(WriteError::InvalidArgument { .. })
        ));
        assert!(recorder.file_ranges.is_empty());
    }
}
