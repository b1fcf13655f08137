//! Precondition checks shared by every writer.
//!
//! Nothing here mutates a target except [`prepare_target`], which creates the
//! parent directory and an empty file when they are missing.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::WriteError;

/// Make `path` ready for a writer to attach.
///
/// # Errors
///
/// - [`WriteError::InvalidTarget`] if `path` is a directory
/// - [`WriteError::PathCreation`] if the parent directory or the file cannot be created
/// - [`WriteError::AccessDenied`] if the file exists and is read-only
pub(crate) fn prepare_target(path: &Path) -> Result<(), WriteError> {
    if path.is_dir() {
        return Err(WriteError::InvalidTarget {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| WriteError::PathCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    match fs::metadata(path) {
        Ok(meta) if meta.permissions().readonly() => Err(WriteError::AccessDenied {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(_) => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(drop)
            .map_err(|source| WriteError::PathCreation {
                path: path.to_path_buf(),
                source,
            }),
    }
}

/// Open `path` read-only as a copy source.
///
/// # Errors
///
/// - [`WriteError::InvalidSourcePath`] if it does not exist, is a directory or cannot be read
pub(crate) fn open_source(path: &Path) -> Result<File, WriteError> {
    let invalid = |reason| WriteError::InvalidSourcePath {
        path: path.to_path_buf(),
        reason,
    };
    let meta = fs::metadata(path).map_err(|_| invalid("does not exist"))?;
    if meta.is_dir() {
        return Err(invalid("is a directory"));
    }
    File::open(path).map_err(|_| invalid("not readable"))
}

/// `value >= 0`, returned as an unsigned offset.
pub(crate) fn non_negative(name: &str, value: i64) -> Result<u64, WriteError> {
    u64::try_from(value)
        .map_err(|_| WriteError::invalid_argument(format!("{name} must be >= 0, got {value}")))
}

/// `value > 0`, for the length of a bounded copy.
pub(crate) fn positive(name: &str, value: i64) -> Result<u64, WriteError> {
    match value {
        v if v > 0 => Ok(v as u64),
        v => Err(WriteError::invalid_argument(format!("{name} must be > 0, got {v}"))),
    }
}

/// `buf[offset..offset + len]` is in bounds.
pub(crate) fn buffer_range(buf_len: usize, offset: usize, len: usize) -> Result<(), WriteError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf_len => Ok(()),
        _ => Err(WriteError::invalid_argument(format!(
            "range {offset}+{len} exceeds buffer of {buf_len} bytes"
        ))),
    }
}

/// Cursor after `len` more bytes at `position`.
pub(crate) fn advance(position: u64, len: usize) -> Result<u64, WriteError> {
    position.checked_add(len as u64).ok_or_else(|| {
        WriteError::invalid_argument(format!("write of {len} bytes at {position} overflows"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_target_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = prepare_target(dir.path());
        assert!(matches!(result, Err(WriteError::InvalidTarget { .. })));
    }

    #[test]
    fn missing_parents_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.bin");
        prepare_target(&target).unwrap();
        assert!(target.is_file());
        assert_eq!(fs::metadata(&target).unwrap().len(), 0);
    }

    #[test]
    fn existing_content_kept() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("keep.bin");
        fs::write(&target, b"abc").unwrap();
        prepare_target(&target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc");
    }

    #[test]
    fn readonly_target_denied() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ro.bin");
        fs::write(&target, b"x").unwrap();
        let mut perms = fs::metadata(&target).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&target, perms).unwrap();

        let result = prepare_target(&target);
        assert!(matches!(result, Err(WriteError::AccessDenied { .. })));
    }

    #[test]
    fn parent_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blocker"), b"").unwrap();
        let target = dir.path().join("blocker/child.bin");
        let result = prepare_target(&target);
        assert!(matches!(result, Err(WriteError::PathCreation { .. })));
    }

    #[test]
    fn source_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_source(&dir.path().join("nope"));
        assert!(matches!(
            result,
            Err(WriteError::InvalidSourcePath { reason: "does not exist", .. })
        ));
    }

    #[test]
    fn source_must_not_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_source(dir.path());
        assert!(matches!(
            result,
            Err(WriteError::InvalidSourcePath { reason: "is a directory", .. })
        ));
    }

    #[test]
    fn numeric_checks() {
        assert_eq!(non_negative("position", 0).unwrap(), 0);
        assert_eq!(non_negative("position", 9).unwrap(), 9);
        assert!(non_negative("position", -1).is_err());

        assert_eq!(positive("len", 1).unwrap(), 1);
        assert!(positive("len", 0).is_err());
        assert!(positive("len", -3).is_err());

        let err = non_negative("offset", -5).unwrap_err();
        assert!(err.to_string().contains("offset must be >= 0"));
    }

    #[test]
    fn buffer_range_checks() {
        assert!(buffer_range(10, 0, 10).is_ok());
        assert!(buffer_range(10, 4, 6).is_ok());
        assert!(buffer_range(10, 10, 0).is_ok());
        assert!(buffer_range(10, 5, 6).is_err());
        assert!(buffer_range(10, usize::MAX, 2).is_err());
    }

    #[test]
    fn advance_rejects_overflow() {
        assert_eq!(advance(10, 5).unwrap(), 15);
        assert!(matches!(
            advance(u64::MAX, 1),
            Err(WriteError::InvalidArgument { .. })
        ));
    }
}
