//! # range-writer
//!
//! Random-access file writers for **upload storage**: write arbitrary byte
//! ranges into a target file at arbitrary offsets, from buffers, streams or
//! other files, with two interchangeable I/O strategies behind one contract.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use range_writer::{CopyFrom, DirectWriter, Session, WriteBytes, WriteMode};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), range_writer::WriteError> {
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join("uploads/2024/file.bin");
//!
//! // Parent directories are created on attach.
//! let mut writer = DirectWriter::attach(&target, WriteMode::Truncate)?;
//! writer
//!     .write_str("header\n")?
//!     .copy_from_reader(Cursor::new(vec![0u8; 4096]))?;
//!
//! let receipt = writer.receipt();
//! assert_eq!(receipt.bytes_written, 7 + 4096);
//! writer.close();
//! # Ok(())
//! # }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`DirectWriter`] | Positioned `pwrite`s; the simple, always-correct baseline |
//! | [`MappedWriter`] | Bounded mapping windows (≤ 8 KiB), each released before the next |
//! | [`AnyWriter`] | Picks one of the two by expected transfer size |
//! | [`RangeWriter`] | The full contract: [`Session`] + [`WriteBytes`] + [`CopyFrom`] + [`Positioned`] |
//! | [`WriteMode`] | `At(offset)`, `Append` or `Truncate` |
//! | [`WriteStats`] | `write_bytes_total` and `pre_write_count` for progress and resume logic |
//! | [`WriterConfig`] | Window size, stream buffer size, selection threshold, mapping capability |
//! | [`WriteError`] | Contextual error type |
//!
//! ---
//!
//! ## Write Modes
//!
//! | Mode | Existing content | Cursor |
//! |------|------------------|--------|
//! | `WriteMode::At(n)` | kept | `n` |
//! | `WriteMode::Append` | kept | end-of-file |
//! | `WriteMode::Truncate` | discarded | 0 |
//!
//! [`WriteMode::at`] maps a negative offset to `Truncate`.
//!
//! ---
//!
//! ## Short Copies
//!
//! A source that runs out before the requested length is not an error. The
//! call succeeds and [`WriteStats::pre_write_count`] holds what was actually
//! written, so callers compare it with what they asked for.
//!
//! ---
//!
//! ## Error Handling
//!
//! Validation errors are raised before a handle is opened or a byte is
//! written. An I/O failure mid-operation aborts that operation and leaves the
//! session open; nothing is rolled back. [`Session::close`] never fails: a
//! release error is logged through `tracing`.
//!
//! ---
//!
//! ## Thread Safety
//!
//! A session is single-threaded. Methods that change the target take
//! `&mut self`; use one session per thread.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`WriteMode`], [`WriteStats`], [`WriteReceipt`], [`WriterConfig`] |

// Private modules
mod config;
mod direct;
mod error;
mod fileio;
mod mapped;
mod select;
mod target;
mod traits;
mod types;
mod validate;

// Public re-exports - error types
pub use error::WriteError;

// Public re-exports - core types
pub use types::{WriteMode, WriteReceipt, WriteStats, MAX_WINDOW_SIZE, STREAM_BUFFER_SIZE};

// Public re-exports - configuration
pub use config::{MappingSupport, WriterConfig};

// Public re-exports - contract
pub use traits::{CopyFrom, Positioned, RangeWriter, Session, WriteBytes};

// Public re-exports - writers
pub use direct::DirectWriter;
pub use mapped::MappedWriter;
pub use select::AnyWriter;
