//! Windowed memory-mapped writer.
//!
//! Every bulk transfer is cut into windows of at most
//! [`WriterConfig::window_size`] bytes. For each window the target is extended
//! to cover it, the range is mapped read-write, the bytes are copied in, and
//! the mapping is released before the next window is opened. At most one
//! window (or one source/destination pair for file copies) is live at a time.
//!
//! | Source | Per window |
//! |--------|------------|
//! | buffer | slice copied straight into the mapping |
//! | reader | drained into a transient heap buffer, then copied into the mapping |
//! | file | source range mapped read-only, memory-to-memory copy |
//!
//! With [`MappingSupport::Buffered`] no mapping is created: each window goes
//! through a heap buffer and a positioned write instead.

mod window;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::target::TargetFile;
use crate::traits::{CopyFrom, Positioned, Session, WriteBytes};
use crate::validate;
use crate::{
    fileio, MappingSupport, WriteError, WriteMode, WriteReceipt, WriteStats, WriterConfig,
};

/// Writer backed by bounded, explicitly released mapping windows.
///
/// # Example
///
/// ```rust
/// use range_writer::{CopyFrom, MappedWriter, Session, WriteMode};
///
/// # fn main() -> Result<(), range_writer::WriteError> {
/// let dir = tempfile::tempdir().unwrap();
/// let source = dir.path().join("in.bin");
/// std::fs::write(&source, vec![9u8; 20_000]).unwrap();
///
/// let mut writer = MappedWriter::attach(dir.path().join("out.bin"), WriteMode::Truncate)?;
/// writer.copy_from_path(&source)?;
/// assert_eq!(writer.stats().pre_write_count, 20_000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MappedWriter {
    target: TargetFile,
    window_size: usize,
    mapping: MappingSupport,
}

impl MappedWriter {
    /// How windows are realized on this session.
    pub fn mapping(&self) -> MappingSupport {
        self.mapping
    }

    /// Bytes per window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Land one window's worth of bytes at the cursor and advance it.
    ///
    /// `file_len` is the target length as known to the current operation.
    fn commit(&mut self, chunk: &[u8], file_len: &mut u64) -> Result<(), WriteError> {
        let mapping = self.mapping;
        let (file, position, path) = self.target.parts("write")?;
        let end = validate::advance(*position, chunk.len())?;
        match mapping {
            MappingSupport::Windowed => {
                extend_to(file, end, file_len).map_err(|e| WriteError::io("extend", path, e))?;
                window::with_write_window(file, *position, chunk.len(), |w| {
                    w.copy_from_slice(chunk)
                })
                .map_err(|e| WriteError::io("map", path, e))?;
            }
            MappingSupport::Buffered => {
                fileio::write_all_at(file, chunk, *position)
                    .map_err(|e| WriteError::io("write", path, e))?;
                *file_len = (*file_len).max(end);
            }
        }
        trace!(offset = *position, len = chunk.len(), "window released");
        *position = end;
        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        let mut file_len = self.target.length()?;
        for chunk in bytes.chunks(self.window_size) {
            self.commit(chunk, &mut file_len)?;
        }
        Ok(())
    }

    /// Copy at most `limit` bytes of `reader`, one heap-filled window at a time.
    fn pump<R: Read>(&mut self, mut reader: R, limit: u64) -> Result<u64, WriteError> {
        let mut file_len = self.target.length()?;
        let mut buf = vec![0u8; self.window_size];
        let mut copied = 0u64;
        while copied < limit {
            let want = (limit - copied).min(buf.len() as u64) as usize;
            let filled = fileio::read_full(&mut reader, &mut buf[..want])
                .map_err(|e| WriteError::io("read source", self.target.path(), e))?;
            if filled == 0 {
                break;
            }
            self.commit(&buf[..filled], &mut file_len)?;
            copied += filled as u64;
            if filled < want {
                break;
            }
        }
        Ok(copied)
    }

    /// Copy at most `limit` bytes of `source` from `offset`, clamped to its length.
    ///
    /// Sources without a trustworthy size (pipes, devices, procfs entries that
    /// report 0) are streamed like a reader instead.
    fn copy_file(&mut self, mut source: File, offset: u64, limit: u64) -> Result<u64, WriteError> {
        let mut file_len = self.target.length()?;
        let meta = source
            .metadata()
            .map_err(|e| WriteError::io("source metadata", self.target.path(), e))?;
        if !meta.is_file() || meta.len() == 0 {
            let reached = fileio::seek_source(&mut source, offset)
                .map_err(|e| WriteError::io("seek source", self.target.path(), e))?;
            return if reached { self.pump(source, limit) } else { Ok(0) };
        }
        let total = limit.min(meta.len().saturating_sub(offset));

        let mapping = self.mapping;
        let mut buf = match mapping {
            MappingSupport::Windowed => Vec::new(),
            MappingSupport::Buffered => vec![0u8; self.window_size],
        };
        let mut copied = 0u64;
        while copied < total {
            let size = (total - copied).min(self.window_size as u64) as usize;
            let src_offset = offset + copied;
            match mapping {
                MappingSupport::Windowed => {
                    let (file, position, path) = self.target.parts("copy")?;
                    let end = validate::advance(*position, size)?;
                    extend_to(file, end, &mut file_len)
                        .map_err(|e| WriteError::io("extend", path, e))?;
                    window::copy_window(&source, src_offset, file, *position, size)
                        .map_err(|e| WriteError::io("map", path, e))?;
                    trace!(src_offset, offset = *position, len = size, "window pair released");
                    *position = end;
                }
                MappingSupport::Buffered => {
                    fileio::read_exact_at(&source, &mut buf[..size], src_offset)
                        .map_err(|e| WriteError::io("read source", self.target.path(), e))?;
                    self.commit(&buf[..size], &mut file_len)?;
                }
            }
            copied += size as u64;
        }
        Ok(copied)
    }

    fn finish(&mut self, written: u64, operation: &'static str) -> &mut Self {
        self.target.record(written);
        debug!(
            path = %self.target.path().display(),
            operation,
            written,
            position = self.target.position(),
            "mapped write"
        );
        self
    }
}

/// Grow `file` so `end` lies inside it; mapping past EOF faults.
fn extend_to(file: &File, end: u64, file_len: &mut u64) -> std::io::Result<()> {
    if end > *file_len {
        file.set_len(end)?;
        *file_len = end;
    }
    Ok(())
}

impl Session for MappedWriter {
    fn attach_with(
        path: impl AsRef<Path>,
        mode: WriteMode,
        config: &WriterConfig,
    ) -> Result<Self, WriteError> {
        config.validate()?;
        let target = TargetFile::open(path.as_ref(), mode)?;
        if config.mapping == MappingSupport::Buffered {
            warn!(
                path = %target.path().display(),
                "manual unmap unavailable, mapped writer falls back to buffered writes"
            );
        }
        Ok(Self {
            target,
            window_size: config.window_size,
            mapping: config.mapping,
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

impl WriteBytes for MappedWriter {
    fn write_range(
        &mut self,
        buf: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<&mut Self, WriteError> {
        validate::buffer_range(buf.len(), offset, len)?;
        self.target.file("write")?;
        self.put(&buf[offset..offset + len])?;
        Ok(self.finish(len as u64, "write"))
    }
}

impl CopyFrom for MappedWriter {
    fn copy_from_reader<R: Read>(&mut self, reader: R) -> Result<&mut Self, WriteError> {
        self.target.file("copy")?;
        let copied = self.pump(reader, u64::MAX)?;
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
        let copied = if skipped < skip { 0 } else { self.pump(reader, len)? };
        Ok(self.finish(copied, "copy_from_reader_range"))
    }

    fn copy_from_file(&mut self, source: File) -> Result<&mut Self, WriteError> {
        self.target.file("copy")?;
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
        self.target.file("copy")?;
        let copied = self.copy_file(source, offset, len)?;
        Ok(self.finish(copied, "copy_from_file_range"))
    }
}

impl Positioned for MappedWriter {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small_windows(window_size: usize, mapping: MappingSupport) -> WriterConfig {
        WriterConfig {
            window_size,
            mapping,
            ..WriterConfig::default()
        }
    }

    #[test]
    fn windows_of_three_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        let config = small_windows(3, MappingSupport::Windowed);

        let mut writer = MappedWriter::attach_with(&path, WriteMode::Truncate, &config).unwrap();
        writer.write(b"abcdefghij").unwrap();
        assert_eq!(writer.position(), 10);
        writer.close();
        assert_eq!(std::fs::read(&path).unwrap(), b"abcdefghij");
    }

    #[test]
    fn short_stream_leaves_no_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");

        let mut writer = MappedWriter::attach(&path, WriteMode::Truncate).unwrap();
        writer
            .copy_from_reader_range(Cursor::new(vec![1u8; 100]), 0, 8192)
            .unwrap();
        assert_eq!(writer.stats().pre_write_count, 100);
        assert_eq!(writer.length().unwrap(), 100);
    }

    #[test]
    fn file_range_past_source_end_is_short() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src.bin");
        std::fs::write(&source, b"0123456789").unwrap();

        let mut writer =
            MappedWriter::attach(dir.path().join("t.bin"), WriteMode::Truncate).unwrap();
        writer.copy_from_path_range(&source, 8, 100).unwrap();
        assert_eq!(writer.stats().pre_write_count, 2);
        writer.copy_from_path_range(&source, 50, 4).unwrap();
        assert_eq!(writer.stats().pre_write_count, 0);
        assert_eq!(writer.length().unwrap(), 2);
    }

    #[test]
    fn empty_source_file_copies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.bin");
        std::fs::write(&source, b"").unwrap();

        let mut writer =
            MappedWriter::attach(dir.path().join("t.bin"), WriteMode::Truncate).unwrap();
        writer.copy_from_path(&source).unwrap();
        assert_eq!(writer.stats(), WriteStats::default());
    }

    #[test]
    fn buffered_fallback_matches() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src.bin");
        let data: Vec<u8> = (0..30_000u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(&source, &data).unwrap();
        let path = dir.path().join("t.bin");
        let config = small_windows(4096, MappingSupport::Buffered);

        let mut writer = MappedWriter::attach_with(&path, WriteMode::Truncate, &config).unwrap();
        assert_eq!(writer.mapping(), MappingSupport::Buffered);
        writer.copy_from_path_range(&source, 1000, 20_000).unwrap();
        writer.write(b"tail").unwrap();
        writer.close();

        let mut expected = data[1000..21_000].to_vec();
        expected.extend_from_slice(b"tail");
        assert_eq!(std::fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn write_in_middle_keeps_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        std::fs::write(&path, vec![b'.'; 20]).unwrap();

        let mut writer = MappedWriter::attach(&path, WriteMode::At(4)).unwrap();
        writer.write(b"XYZ").unwrap();
        assert_eq!(writer.length().unwrap(), 20);
        writer.close();

        let content = std::fs::read(&path).unwrap();
        assert_eq!(&content[..4], b"....");
        assert_eq!(&content[4..7], b"XYZ");
        assert!(content[7..].iter().all(|&b| b == b'.'));
    }

    #[cfg(unix)]
    #[test]
    fn fifo_source_is_streamed() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("pipe");
        let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
        // SAFETY: valid NUL-terminated path.
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

        for mapping in [MappingSupport::Windowed, MappingSupport::Buffered] {
            let feeder = {
                let fifo = fifo.clone();
                std::thread::spawn(move || {
                    let mut pipe = std::fs::OpenOptions::new().write(true).open(fifo).unwrap();
                    pipe.write_all(&[5u8; 20_000]).unwrap();
                })
            };

            let path = dir.path().join(format!("{mapping:?}.bin"));
            let config = small_windows(8192, mapping);
            let mut writer =
                MappedWriter::attach_with(&path, WriteMode::Truncate, &config).unwrap();
            writer.copy_from_path(&fifo).unwrap();
            feeder.join().unwrap();

            assert_eq!(writer.stats().pre_write_count, 20_000);
            writer.close();
            assert_eq!(std::fs::read(&path).unwrap(), vec![5u8; 20_000]);
        }
    }
}
