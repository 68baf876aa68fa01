//! Positioned IO shared by the POSIX backends
//!
//! `pread`/`pwrite` never move the file offset, so a handle needs no position
//! state. Short transfers are continued until the request is complete.

use crate::error::BenchError;
use crate::Result;
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

/// Read until `buf` is full or end of file
#[inline(always)]
pub(super) fn pread_full(fd: RawFd, offset: u64, buf: &mut [u8]) -> Result<usize> {
    let length = buf.len();
    let mut total_read = 0;

    while total_read < length {
        let remaining = &mut buf[total_read..];
        let current_offset = offset + total_read as u64;

        // SAFETY: `remaining` is a live mutable slice for the whole call
        let result = unsafe {
            libc::pread(
                fd,
                remaining.as_mut_ptr() as *mut libc::c_void,
                remaining.len(),
                current_offset as libc::off_t,
            )
        };

        if result < 0 {
            return Err(BenchError::Read {
                offset: current_offset,
                len: remaining.len(),
                source: io::Error::last_os_error(),
            });
        }

        if result == 0 {
            // End of file
            break;
        }

        total_read += result as usize;
    }

    Ok(total_read)
}

/// Write all of `buf`
#[inline(always)]
pub(super) fn pwrite_full(fd: RawFd, offset: u64, buf: &[u8]) -> Result<usize> {
    let length = buf.len();
    let mut total_written = 0;

    while total_written < length {
        let remaining = &buf[total_written..];
        let current_offset = offset + total_written as u64;

        // SAFETY: `remaining` is a live slice for the whole call
        let result = unsafe {
            libc::pwrite(
                fd,
                remaining.as_ptr() as *const libc::c_void,
                remaining.len(),
                current_offset as libc::off_t,
            )
        };

        if result < 0 {
            return Err(BenchError::Write {
                offset: current_offset,
                len: remaining.len(),
                source: io::Error::last_os_error(),
            });
        }

        if result == 0 {
            return Err(BenchError::Write {
                offset: current_offset,
                len: remaining.len(),
                source: io::Error::from(io::ErrorKind::WriteZero),
            });
        }

        total_written += result as usize;
    }

    Ok(total_written)
}

pub(super) fn fsync(fd: RawFd) -> Result<()> {
    // SAFETY: fsync only requires a valid descriptor
    let result = unsafe { libc::fsync(fd) };
    if result < 0 {
        return Err(BenchError::Sync {
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

pub(super) fn c_path(path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| BenchError::FreeSpace {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
    })
}
