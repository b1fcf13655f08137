//! Scoped mapping windows.
//!
//! A window is mapped, used for exactly one copy and unmapped before the
//! function returns. Unmapping is the map's `Drop`, so it also runs when the
//! copy bails out early.

use std::fs::File;
use std::io;

use memmap2::MmapOptions;

/// Map `[offset, offset + len)` of `file` read-write and hand it to `fill`.
///
/// The range must already lie inside the file.
pub(super) fn with_write_window<T>(
    file: &File,
    offset: u64,
    len: usize,
    fill: impl FnOnce(&mut [u8]) -> T,
) -> io::Result<T> {
    // SAFETY:
    // - The session owns `file` and is single-threaded, nothing else in this
    //   process resizes it while the window is live.
    // - The caller extended the file to cover the whole range.
    // - The map is dropped below, so no slice into it escapes.
    let mut window = unsafe { MmapOptions::new().offset(offset).len(len).map_mut(file)? };
    let out = fill(&mut window[..]);
    drop(window);
    Ok(out)
}

/// Copy `len` bytes from `source` at `src_offset` into `dest` at `dst_offset`,
/// both sides mapped, without an intermediate buffer.
///
/// The source range must lie inside `source`; the destination range inside `dest`.
pub(super) fn copy_window(
    source: &File,
    src_offset: u64,
    dest: &File,
    dst_offset: u64,
    len: usize,
) -> io::Result<()> {
    // SAFETY: read-only view of a handle owned by the current call; the range
    // was clamped to the source length and the map is dropped before returning.
    let src = unsafe { MmapOptions::new().offset(src_offset).len(len).map(source)? };
    let copied = with_write_window(dest, dst_offset, len, |dst| dst.copy_from_slice(&src[..]));
    drop(src);
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileio;

    #[test]
    fn write_window_lands_at_offset() {
        let file = tempfile::tempfile().unwrap();
        file.set_len(16).unwrap();
        with_write_window(&file, 5, 3, |w| w.copy_from_slice(b"abc")).unwrap();

        let mut buf = [0u8; 16];
        fileio::read_exact_at(&file, &mut buf, 0).unwrap();
        assert_eq!(&buf[5..8], b"abc");
        assert!(buf[..5].iter().all(|&b| b == 0));
        assert!(buf[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn unaligned_offsets_are_mapped() {
        let file = tempfile::tempfile().unwrap();
        file.set_len(20_000).unwrap();
        with_write_window(&file, 8191, 2, |w| w.copy_from_slice(b"xy")).unwrap();

        let mut buf = [0u8; 2];
        fileio::read_exact_at(&file, &mut buf, 8191).unwrap();
        assert_eq!(&buf, b"xy");
    }

    #[test]
    fn copy_window_moves_bytes() {
        let source = tempfile::tempfile().unwrap();
        fileio::write_all_at(&source, b"0123456789", 0).unwrap();
        let dest = tempfile::tempfile().unwrap();
        dest.set_len(6).unwrap();

        copy_window(&source, 3, &dest, 1, 4).unwrap();

        let mut buf = [0u8; 6];
        fileio::read_exact_at(&dest, &mut buf, 0).unwrap();
        assert_eq!(&buf, b"\x003456\x00");
    }

    #[test]
    fn many_windows_do_not_accumulate() {
        let file = tempfile::tempfile().unwrap();
        file.set_len(4096).unwrap();
        for i in 0..20_000u32 {
            let byte = (i % 251) as u8;
            with_write_window(&file, u64::from(i % 4096), 1, |w| w[0] = byte).unwrap();
        }
    }
}
