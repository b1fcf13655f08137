//! Error types for range writers.

use std::path::PathBuf;

/// Writer error type with contextual variants.
///
/// Validation variants ([`InvalidArgument`](WriteError::InvalidArgument),
/// [`InvalidTarget`](WriteError::InvalidTarget),
/// [`InvalidSourcePath`](WriteError::InvalidSourcePath),
/// [`PathCreation`](WriteError::PathCreation),
/// [`AccessDenied`](WriteError::AccessDenied)) are raised before any handle is
/// opened or any byte is written. [`Io`](WriteError::Io) is raised mid-operation
/// and leaves the session open.
///
/// # Examples
///
/// ```rust
/// use range_writer::WriteError;
/// use std::path::PathBuf;
///
/// let err = WriteError::InvalidTarget { path: PathBuf::from("/tmp") };
/// assert_eq!(err.to_string(), "invalid target: /tmp is a directory");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A numeric precondition failed.
    #[error("invalid argument: {details}")]
    InvalidArgument {
        /// Which invariant failed.
        details: String,
    },

    /// The target path is a directory.
    #[error("invalid target: {path} is a directory")]
    InvalidTarget {
        /// The rejected target.
        path: PathBuf,
    },

    /// The source path is missing, unreadable or a directory.
    #[error("invalid source path: {path} ({reason})")]
    InvalidSourcePath {
        /// The rejected source.
        path: PathBuf,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Creating the parent directory or the target file failed.
    #[error("failed to create {path}: {source}")]
    PathCreation {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The target exists but is not writable.
    #[error("write access denied: {path}")]
    AccessDenied {
        /// The read-only target.
        path: PathBuf,
    },

    /// The session was already closed.
    #[error("{operation}: session is closed")]
    Closed {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Lower-level read, write, map or unmap failure.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed; source-side failures read `"read source"`,
        /// `"skip source"` or `"seek source"`.
        operation: &'static str,
        /// The session's target path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Build an [`InvalidArgument`](WriteError::InvalidArgument) error.
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        WriteError::InvalidArgument {
            details: details.into(),
        }
    }

    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        WriteError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for WriteError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => WriteError::AccessDenied {
                path: PathBuf::new(),
            },
            _ => WriteError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}
