//! Positioned-write writer.
//!
//! Every call turns into one or more `pwrite`s against the open handle; stream
//! sources go through a small fixed buffer. No resource besides the handle is
//! held, which makes this the reference the mapped writer is checked against.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::target::TargetFile;
use crate::traits::{CopyFrom, Positioned, Session, WriteBytes};
use crate::validate;
use crate::{fileio, WriteError, WriteMode, WriteReceipt, WriteStats, WriterConfig};

/// Writer backed by plain positioned writes.
///
/// # Example
///
/// ```rust
/// use range_writer::{DirectWriter, Positioned, Session, WriteBytes, WriteMode};
///
/// # fn main() -> Result<(), range_writer::WriteError> {
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("t.bin");
/// std::fs::write(&path, b"hello world").unwrap();
///
/// let mut writer = DirectWriter::attach(&path, WriteMode::At(6))?;
/// writer.write(b"WORLD")?;
/// writer.close();
/// assert_eq!(std::fs::read(&path).unwrap(), b"hello WORLD");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DirectWriter {
    target: TargetFile,
    buffer_size: usize,
}

impl DirectWriter {
    fn put(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        let (file, position, path) = self.target.parts("write")?;
        let end = validate::advance(*position, bytes.len())?;
        fileio::write_all_at(file, bytes, *position)
            .map_err(|e| WriteError::io("write", path, e))?;
        *position = end;
        Ok(())
    }

    /// Copy at most `limit` bytes of `reader` through the intermediate buffer.
    fn drain<R: Read>(&mut self, mut reader: R, limit: u64) -> Result<u64, WriteError> {
        let mut buf = vec![0u8; self.buffer_size];
        let mut copied = 0u64;
        while copied < limit {
            let want = (limit - copied).min(buf.len() as u64) as usize;
            let read = match reader.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(WriteError::io("read source", self.target.path(), e)),
            };
            self.put(&buf[..read])?;
            copied += read as u64;
        }
        Ok(copied)
    }

    fn copy_file(&mut self, mut source: File, offset: u64, limit: u64) -> Result<u64, WriteError> {
        self.target.file("copy")?;
        let reached = fileio::seek_source(&mut source, offset)
            .map_err(|e| WriteError::io("seek source", self.target.path(), e))?;
        if !reached {
            return Ok(0);
        }
        self.drain(source, limit)
    }

    fn finish(&mut self, written: u64, operation: &'static str) -> &mut Self {
        self.target.record(written);
        debug!(
            path = %self.target.path().display(),
            operation,
            written,
            position = self.target.position(),
            "direct write"
        );
        self
    }
}

impl Session for DirectWriter {
    fn attach_with(
        path: impl AsRef<Path>,
        mode: WriteMode,
        config: &WriterConfig,
    ) -> Result<Self, WriteError> {
        config.validate()?;
        Ok(Self {
            target: TargetFile::open(path.as_ref(), mode)?,
            buffer_size: config.stream_buffer_size,
        })
    }

    fn path(&self) -> &Path {
        self.target.path()
    }

    fn stats(&self) -> WriteStats {
        self.target.stats()
    }

    fn receipt(&self) -> WriteReceipt {
        self.target.receipt()
    }

    fn is_closed(&self) -> bool {
        self.target.is_closed()
    }

    fn close(&mut self) {
        self.target.close();
    }
}

impl WriteBytes for DirectWriter {
    fn write_range(
        &mut self,
        buf: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<&mut Self, WriteError> {
        validate::buffer_range(buf.len(), offset, len)?;
        self.put(&buf[offset..offset + len])?;
        Ok(self.finish(len as u64, "write"))
    }
}

impl CopyFrom for DirectWriter {
    fn copy_from_reader<R: Read>(&mut self, reader: R) -> Result<&mut Self, WriteError> {
        self.target.file("copy")?;
        let copied = self.drain(reader, u64::MAX)?;
        Ok(self.finish(copied, "copy_from_reader"))
    }

    fn copy_from_reader_range<R: Read>(
        &mut self,
        mut reader: R,
        skip: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError> {
        let skip = validate::non_negative("skip", skip)?;
        let len = validate::positive("len", len)?;
        self.target.file("copy")?;

        let skipped = fileio::skip(&mut reader, skip)
            .map_err(|e| WriteError::io("skip source", self.target.path(), e))?;
        let copied = if skipped < skip { 0 } else { self.drain(reader, len)? };
        Ok(self.finish(copied, "copy_from_reader_range"))
    }

    fn copy_from_file(&mut self, source: File) -> Result<&mut Self, WriteError> {
        let copied = self.copy_file(source, 0, u64::MAX)?;
        Ok(self.finish(copied, "copy_from_file"))
    }

    fn copy_from_file_range(
        &mut self,
        source: File,
        offset: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError> {
        let offset = validate::non_negative("offset", offset)?;
        let len = validate::positive("len", len)?;
        let copied = self.copy_file(source, offset, len)?;
        Ok(self.finish(copied, "copy_from_file_range"))
    }
}

impl Positioned for DirectWriter {
    fn seek(&mut self, position: i64) -> Result<&mut Self, WriteError> {
        self.target.seek(position)?;
        Ok(self)
    }

    fn set_length(&mut self, new_length: i64) -> Result<&mut Self, WriteError> {
        self.target.set_length(new_length)?;
        Ok(self)
    }

    fn length(&self) -> Result<u64, WriteError> {
        self.target.length()
    }

    fn position(&self) -> u64 {
        self.target.position()
    }
}
