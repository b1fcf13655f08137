//! Positioned I/O primitives.
//!
//! Unix uses `pread`/`pwrite`, Windows uses `seek_read`/`seek_write`, anything
//! else falls back to seek-then-read/write on the shared handle.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

/// Write all of `buf` at `offset` without touching the handle's own cursor.
pub(crate) fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.write_all_at(buf, offset)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        let mut written = 0;
        while written < buf.len() {
            match file.seek_write(&buf[written..], offset + written as u64) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    {
        use std::io::Write;
        let mut handle = file;
        handle.seek(SeekFrom::Start(offset))?;
        handle.write_all(buf)
    }
}

/// Fill all of `buf` from `offset`.
pub(crate) fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.read_exact_at(buf, offset)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        let mut filled = 0;
        while filled < buf.len() {
            match file.seek_read(&mut buf[filled..], offset + filled as u64) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    {
        let mut handle = file;
        handle.seek(SeekFrom::Start(offset))?;
        handle.read_exact(buf)
    }
}

/// Read until `buf` is full or the reader is exhausted; returns the bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Discard up to `count` bytes; returns how many were actually discarded.
pub(crate) fn skip<R: Read>(reader: &mut R, count: u64) -> io::Result<u64> {
    io::copy(&mut reader.by_ref().take(count), &mut io::sink())
}

/// Place `source` at `offset`, reading forward when it cannot seek.
///
/// Returns `false` when an unseekable source ends before `offset`.
pub(crate) fn seek_source(source: &mut File, offset: u64) -> io::Result<bool> {
    match source.seek(SeekFrom::Start(offset)) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotSeekable => Ok(skip(source, offset)? == offset),
        Err(e) => Err(e),
    }
}

/// Release a handle and surface the error `Drop` would swallow.
pub(crate) fn close_file(file: File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::io::IntoRawFd;
        let fd = file.into_raw_fd();
        // SAFETY: `into_raw_fd` transferred ownership of `fd`; it is closed exactly once here.
        if unsafe { libc::close(fd) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        drop(file);
        Ok(())
    }
}
