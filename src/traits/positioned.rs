//! Cursor and length control.

use crate::WriteError;

/// Cursor and length of the target.
pub trait Positioned {
    /// Move the cursor to `position`. Seeking past the end is allowed; the gap
    /// reads back as zeros once something is written there.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `position < 0`
    /// - [`WriteError::Closed`] if the session is closed
    fn seek(&mut self, position: i64) -> Result<&mut Self, WriteError>;

    /// Truncate or zero-extend the target to `new_length` bytes.
    ///
    /// A cursor past the new end is moved back to it.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] if `new_length < 0`
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] if the resize fails
    fn set_length(&mut self, new_length: i64) -> Result<&mut Self, WriteError>;

    /// Current size of the target in bytes.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Closed`] if the session is closed
    /// - [`WriteError::Io`] if the size cannot be read
    fn length(&self) -> Result<u64, WriteError>;

    /// Current cursor.
    fn position(&self) -> u64;
}
