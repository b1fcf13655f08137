//! # Writer Traits
//!
//! The contract every writer implements, split by capability:
//!
//! ```text
//! Session + WriteBytes + CopyFrom + Positioned = RangeWriter
//! ```
//!
//! | Trait | Methods |
//! |-------|---------|
//! | [`Session`] | `attach`, `attach_with`, `path`, `stats`, `receipt`, `is_closed`, `close` |
//! | [`WriteBytes`] | `write`, `write_range`, `write_str` |
//! | [`CopyFrom`] | `copy_from_reader[_range]`, `copy_from_file[_range]`, `copy_from_path[_range]` |
//! | [`Positioned`] | `seek`, `set_length`, `length`, `position` |
//!
//! Write-family methods return `&mut Self` so calls chain:
//!
//! ```rust
//! use range_writer::{MappedWriter, RangeWriter, Session, WriteBytes, Positioned, WriteMode};
//!
//! fn stamp<W: RangeWriter>(writer: &mut W) -> Result<(), range_writer::WriteError> {
//!     writer.seek(0)?.write(b"HDR")?.write_str("v1")?;
//!     Ok(())
//! }
//!
//! # fn main() -> Result<(), range_writer::WriteError> {
//! let dir = tempfile::tempdir().unwrap();
//! let mut writer = MappedWriter::attach(dir.path().join("x.bin"), WriteMode::Truncate)?;
//! stamp(&mut writer)?;
//! assert_eq!(writer.length()?, 5);
//! # Ok(())
//! # }
//! ```

mod copy_from;
mod positioned;
mod session;
mod write_bytes;

pub use copy_from::CopyFrom;
pub use positioned::Positioned;
pub use session::Session;
pub use write_bytes::WriteBytes;

/// The complete writer contract.
///
/// Automatically implemented for any type implementing all four component
/// traits. [`DirectWriter`](crate::DirectWriter),
/// [`MappedWriter`](crate::MappedWriter) and [`AnyWriter`](crate::AnyWriter)
/// all qualify, so generic code written against `RangeWriter` runs unchanged
/// on either I/O strategy.
pub trait RangeWriter: Session + WriteBytes + CopyFrom + Positioned {}

impl<T: Session + WriteBytes + CopyFrom + Positioned> RangeWriter for T {}
