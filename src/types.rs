//! Core types shared by every writer.

use std::path::PathBuf;

/// Upper bound, in bytes, of a single mapping window.
pub const MAX_WINDOW_SIZE: usize = 8192;

/// Size of the intermediate buffer the direct writer uses for stream reads.
pub const STREAM_BUFFER_SIZE: usize = 1024;

/// Where the cursor of a freshly attached session is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WriteMode {
    /// Keep existing content, cursor at the given offset (at most `i64::MAX`).
    At(u64),
    /// Keep existing content, cursor at end-of-file.
    Append,
    /// Discard existing content, cursor at 0.
    #[default]
    Truncate,
}

impl WriteMode {
    /// Build a mode from a signed offset.
    ///
    /// A negative offset is a request to truncate.
    ///
    /// ```rust
    /// use range_writer::WriteMode;
    ///
    /// assert_eq!(WriteMode::at(10), WriteMode::At(10));
    /// assert_eq!(WriteMode::at(-1), WriteMode::Truncate);
    /// ```
    pub const fn at(offset: i64) -> Self {
        if offset < 0 {
            WriteMode::Truncate
        } else {
            WriteMode::At(offset as u64)
        }
    }
}

/// Running write statistics of one session.
///
/// Callers detect a short write by comparing
/// [`pre_write_count`](WriteStats::pre_write_count) with the length they asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteStats {
    /// Cumulative bytes written by the session.
    pub write_bytes_total: u64,
    /// Bytes written by the most recent write-family call.
    pub pre_write_count: u64,
}

impl WriteStats {
    /// Account for a completed write of `written` bytes.
    #[inline]
    pub fn record(&mut self, written: u64) {
        self.write_bytes_total += written;
        self.pre_write_count = written;
    }
}

/// What an upload handler gets back after writing a target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteReceipt {
    /// Canonical path of the target.
    pub path: PathBuf,
    /// Total bytes written during the session.
    pub bytes_written: u64,
}

#[cfg(feature = "serde")]
impl WriteReceipt {
    /// Render the receipt as JSON for a metadata store.
    pub fn to_json(&self) -> Result<String, crate::WriteError> {
        serde_json::to_string(self).map_err(|e| crate::WriteError::Serialization(e.to_string()))
    }
}
