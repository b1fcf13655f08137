//! The open target shared by both writers: handle, cursor and statistics.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::validate;
use crate::{fileio, WriteError, WriteMode, WriteReceipt, WriteStats};

#[derive(Debug)]
pub(crate) struct TargetFile {
    file: Option<File>,
    path: PathBuf,
    position: u64,
    stats: WriteStats,
}

impl TargetFile {
    /// Validate, open read-write and place the cursor according to `mode`.
    ///
    /// On error no handle is kept.
    pub(crate) fn open(path: &Path, mode: WriteMode) -> Result<Self, WriteError> {
        if let WriteMode::At(offset) = mode {
            if offset > i64::MAX as u64 {
                return Err(WriteError::invalid_argument(format!(
                    "offset must be <= {}, got {offset}",
                    i64::MAX
                )));
            }
        }
        validate::prepare_target(path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::PermissionDenied => WriteError::AccessDenied {
                    path: path.to_path_buf(),
                },
                _ => WriteError::io("open", path, source),
            })?;
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        let position = match mode {
            WriteMode::At(offset) => offset,
            WriteMode::Append => file
                .metadata()
                .map_err(|e| WriteError::io("metadata", &path, e))?
                .len(),
            WriteMode::Truncate => {
                file.set_len(0)
                    .map_err(|e| WriteError::io("truncate", &path, e))?;
                0
            }
        };

        debug!(path = %path.display(), ?mode, position, "attached target");
        Ok(Self {
            file: Some(file),
            path,
            position,
            stats: WriteStats::default(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    pub(crate) fn stats(&self) -> WriteStats {
        self.stats
    }

    pub(crate) fn record(&mut self, written: u64) {
        self.stats.record(written);
    }

    pub(crate) fn receipt(&self) -> WriteReceipt {
        WriteReceipt {
            path: self.path.clone(),
            bytes_written: self.stats.write_bytes_total,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// The open handle, or [`WriteError::Closed`].
    pub(crate) fn file(&self, operation: &'static str) -> Result<&File, WriteError> {
        self.file.as_ref().ok_or(WriteError::Closed { operation })
    }

    /// Handle, cursor and path borrowed at once so loops can advance the cursor.
    pub(crate) fn parts(
        &mut self,
        operation: &'static str,
    ) -> Result<(&File, &mut u64, &Path), WriteError> {
        match self.file.as_ref() {
            Some(file) => Ok((file, &mut self.position, &self.path)),
            None => Err(WriteError::Closed { operation }),
        }
    }

    pub(crate) fn seek(&mut self, position: i64) -> Result<(), WriteError> {
        let position = validate::non_negative("position", position)?;
        self.file("seek")?;
        self.position = position;
        Ok(())
    }

    /// Truncate or extend; the cursor is pulled back if it now lies past the end.
    pub(crate) fn set_length(&mut self, new_length: i64) -> Result<(), WriteError> {
        let new_length = validate::non_negative("length", new_length)?;
        self.file("set_length")?
            .set_len(new_length)
            .map_err(|e| WriteError::io("set_length", &self.path, e))?;
        self.position = self.position.min(new_length);
        Ok(())
    }

    pub(crate) fn length(&self) -> Result<u64, WriteError> {
        Ok(self
            .file("length")?
            .metadata()
            .map_err(|e| WriteError::io("metadata", &self.path, e))?
            .len())
    }

    /// Release the handle. Failures go to the log, never to the caller.
    pub(crate) fn close(&mut self) {
        if let Some(file) = self.file.take() {
            match fileio::close_file(file) {
                Ok(()) => debug!(
                    path = %self.path.display(),
                    total = self.stats.write_bytes_total,
                    "closed target"
                ),
                Err(e) => error!(path = %self.path.display(), error = %e, "failed to close target"),
            }
        }
    }
}

impl Drop for TargetFile {
    fn drop(&mut self) {
        self.close();
    }
}
