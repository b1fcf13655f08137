//! Writing in-memory bytes at the cursor.

use crate::WriteError;

/// Write in-memory data at the session cursor.
///
/// Every successful call advances the cursor by the bytes written and
/// records them in the session [`WriteStats`](crate::WriteStats).
pub trait WriteBytes {
    /// Write `buf[offset..offset + len]` at the cursor.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if the range exceeds `buf`
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] if the underlying write fails
    fn write_range(
        &mut self,
        buf: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<&mut Self, WriteError>;

    /// Write the whole buffer at the cursor.
    ///
    /// # Errors
    ///
    /// Same as [`write_range`](WriteBytes::write_range).
    fn write(&mut self, buf: &[u8]) -> Result<&mut Self, WriteError> {
        self.write_range(buf, 0, buf.len())
    }

    /// Write `text` as UTF-8.
    ///
    /// # Errors
    ///
    /// Same as [`write_range`](WriteBytes::write_range).
    fn write_str(&mut self, text: &str) -> Result<&mut Self, WriteError> {
        self.write(text.as_bytes())
    }
}
