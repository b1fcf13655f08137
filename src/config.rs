//! # Writer Configuration
//!
//! Tunables shared by every writer, plus the platform capability flag that
//! decides whether the mapped writer can use real mapping windows.
//!
//! | Field | Default | Used by |
//! |-------|---------|---------|
//! | `window_size` | 8192 | [`MappedWriter`](crate::MappedWriter) |
//! | `stream_buffer_size` | 1024 | [`DirectWriter`](crate::DirectWriter) |
//! | `mapped_threshold` | 1 MiB | [`AnyWriter::attach_for`](crate::AnyWriter::attach_for) |
//! | `mapping` | [`MappingSupport::detect`] | [`MappedWriter`](crate::MappedWriter) |

use crate::{WriteError, MAX_WINDOW_SIZE, STREAM_BUFFER_SIZE};

/// Whether the platform can map and explicitly release file windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MappingSupport {
    /// Windows are mapped read-write and unmapped as soon as they go out of scope.
    Windowed,
    /// No manual unmap: content goes through an intermediate heap buffer.
    Buffered,
}

impl MappingSupport {
    /// Capability of the current target.
    pub const fn detect() -> Self {
        if cfg!(any(unix, windows)) {
            MappingSupport::Windowed
        } else {
            MappingSupport::Buffered
        }
    }
}

impl Default for MappingSupport {
    fn default() -> Self {
        Self::detect()
    }
}

/// Writer configuration.
///
/// # Example
///
/// ```rust
/// use range_writer::{MappingSupport, WriterConfig};
///
/// let config = WriterConfig {
///     window_size: 4096,
///     ..WriterConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(WriterConfig::default().mapping, MappingSupport::detect());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterConfig {
    /// Bytes per mapping window, `1..=MAX_WINDOW_SIZE`.
    pub window_size: usize,
    /// Bytes per intermediate read buffer of the direct writer.
    pub stream_buffer_size: usize,
    /// Transfer size at or above which the mapped writer is selected.
    pub mapped_threshold: u64,
    /// Mapping capability of the platform.
    pub mapping: MappingSupport,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            window_size: MAX_WINDOW_SIZE,
            stream_buffer_size: STREAM_BUFFER_SIZE,
            mapped_threshold: 1024 * 1024,
            mapping: MappingSupport::detect(),
        }
    }
}

impl WriterConfig {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// - [`WriteError::InvalidArgument`] naming the offending field
    pub fn validate(&self) -> Result<(), WriteError> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(WriteError::invalid_argument(format!(
                "window_size must be in 1..={MAX_WINDOW_SIZE}, got {}",
                self.window_size
            )));
        }
        if self.stream_buffer_size == 0 {
            return Err(WriteError::invalid_argument("stream_buffer_size must be > 0"));
        }
        Ok(())
    }

    /// Load a configuration from JSON; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, WriteError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WriteError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
