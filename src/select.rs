//! Strategy selection.
//!
//! Callers that do not care which I/O strategy runs can attach an
//! [`AnyWriter`] and let the size of the expected transfer decide.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::traits::{CopyFrom, Positioned, Session, WriteBytes};
use crate::{
    DirectWriter, MappedWriter, MappingSupport, WriteError, WriteMode, WriteReceipt, WriteStats,
    WriterConfig,
};

/// Either writer behind one type.
///
/// # Example
///
/// ```rust
/// use range_writer::{AnyWriter, Session, WriteBytes, WriteMode, WriterConfig};
///
/// # fn main() -> Result<(), range_writer::WriteError> {
/// let dir = tempfile::tempdir().unwrap();
/// let config = WriterConfig::default();
///
/// let small = AnyWriter::attach_for(dir.path().join("a"), WriteMode::Truncate, 10, &config)?;
/// assert!(matches!(small, AnyWriter::Direct(_)));
///
/// let mut large =
///     AnyWriter::attach_for(dir.path().join("b"), WriteMode::Truncate, 64 << 20, &config)?;
/// large.write(b"payload")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub enum AnyWriter {
    /// Positioned writes.
    Direct(DirectWriter),
    /// Mapping windows.
    Mapped(MappedWriter),
}

impl AnyWriter {
    /// Attach the writer suited to a transfer of `expected_len` bytes.
    ///
    /// The mapped writer is chosen when `expected_len` reaches
    /// [`WriterConfig::mapped_threshold`] and the platform can map windows.
    ///
    /// # Errors
    ///
    /// Same as [`Session::attach_with`].
    pub fn attach_for(
        path: impl AsRef<Path>,
        mode: WriteMode,
        expected_len: u64,
        config: &WriterConfig,
    ) -> Result<Self, WriteError> {
        if expected_len >= config.mapped_threshold && config.mapping == MappingSupport::Windowed {
            MappedWriter::attach_with(path, mode, config).map(AnyWriter::Mapped)
        } else {
            DirectWriter::attach_with(path, mode, config).map(AnyWriter::Direct)
        }
    }
}

macro_rules! delegate {
    ($self:ident, $w:ident => $call:expr) => {
        match $self {
            AnyWriter::Direct($w) => $call,
            AnyWriter::Mapped($w) => $call,
        }
    };
}

/// Run a chainable call on the inner writer and hand back the outer one.
macro_rules! delegate_chain {
    ($self:ident, $w:ident => $call:expr) => {{
        delegate!($self, $w => { $call?; });
        Ok($self)
    }};
}

impl Session for AnyWriter {
    /// Attach a [`DirectWriter`]; use [`AnyWriter::attach_for`] to select by size.
    fn attach_with(
        path: impl AsRef<Path>,
        mode: WriteMode,
        config: &WriterConfig,
    ) -> Result<Self, WriteError> {
        DirectWriter::attach_with(path, mode, config).map(AnyWriter::Direct)
    }

    fn path(&self) -> &Path {
        delegate!(self, w => w.path())
    }

    fn stats(&self) -> WriteStats {
        delegate!(self, w => w.stats())
    }

    fn receipt(&self) -> WriteReceipt {
        delegate!(self, w => w.receipt())
    }

    fn is_closed(&self) -> bool {
        delegate!(self, w => w.is_closed())
    }

    fn close(&mut self) {
        delegate!(self, w => w.close())
    }
}

impl WriteBytes for AnyWriter {
    fn write_range(
        &mut self,
        buf: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.write_range(buf, offset, len))
    }
}

impl CopyFrom for AnyWriter {
    fn copy_from_reader<R: Read>(&mut self, reader: R) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.copy_from_reader(reader))
    }

    fn copy_from_reader_range<R: Read>(
        &mut self,
        reader: R,
        skip: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.copy_from_reader_range(reader, skip, len))
    }

    fn copy_from_file(&mut self, source: File) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.copy_from_file(source))
    }

    fn copy_from_file_range(
        &mut self,
        source: File,
        offset: i64,
        len: i64,
    ) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.copy_from_file_range(source, offset, len))
    }
}

impl Positioned for AnyWriter {
    fn seek(&mut self, position: i64) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.seek(position))
    }

    fn set_length(&mut self, new_length: i64) -> Result<&mut Self, WriteError> {
        delegate_chain!(self, w => w.set_length(new_length))
    }

    fn length(&self) -> Result<u64, WriteError> {
        delegate!(self, w => w.length())
    }

    fn position(&self) -> u64 {
        delegate!(self, w => w.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_selects_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            mapped_threshold: 100,
            mapping: MappingSupport::Windowed,
            ..WriterConfig::default()
        };

        let below =
            AnyWriter::attach_for(dir.path().join("a"), WriteMode::Truncate, 99, &config).unwrap();
        assert!(matches!(below, AnyWriter::Direct(_)));

        let at =
            AnyWriter::attach_for(dir.path().join("b"), WriteMode::Truncate, 100, &config).unwrap();
        assert!(matches!(at, AnyWriter::Mapped(_)));
    }

    #[test]
    fn buffered_platform_stays_direct() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            mapped_threshold: 0,
            mapping: MappingSupport::Buffered,
            ..WriterConfig::default()
        };
        let writer =
            AnyWriter::attach_for(dir.path().join("a"), WriteMode::Truncate, 1 << 30, &config)
                .unwrap();
        assert!(matches!(writer, AnyWriter::Direct(_)));
    }

    #[test]
    fn chained_calls_reach_inner_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c");
        let config = WriterConfig {
            mapped_threshold: 0,
            ..WriterConfig::default()
        };

        let mut writer = AnyWriter::attach_for(&path, WriteMode::Truncate, 1, &config).unwrap();
        writer.write(b"abc").unwrap().seek(1).unwrap().write_str("Z").unwrap();
        assert_eq!(writer.stats().write_bytes_total, 4);
        assert_eq!(writer.position(), 2);
        writer.close();
        assert!(writer.is_closed());
        assert_eq!(std::fs::read(&path).unwrap(), b"aZc");
    }
}
