//! macOS backend
//!
//! Darwin has no `O_DIRECT`. Cache bypass is a per-descriptor switch
//! (`F_NOCACHE`), and `fsync` only reaches the drive cache, so durability goes
//! through `F_FULLFSYNC`. Synchronous mode issues `F_FULLFSYNC` after every
//! write. Access hints are accepted and ignored.

use super::{check_direct_alignment, unix, AccessHint, OpenIntent, Platform, StorageHandle};
use crate::config::IoMode;
use crate::error::BenchError;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

pub struct Darwin;

/// Open benchmark file on macOS
#[derive(Debug)]
pub struct DarwinFile {
    file: File,
    mode: IoMode,
}

impl Platform for Darwin {
    type Handle = DarwinFile;

    const NAME: &'static str = "darwin";

    fn open(path: &Path, mode: IoMode, intent: OpenIntent) -> Result<DarwinFile> {
        let open_error = |source| BenchError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(intent == OpenIntent::Create)
            .open(path)
            .map_err(open_error)?;

        if mode == IoMode::Direct {
            // SAFETY: the descriptor is owned by `file`
            let result = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
            if result == -1 {
                return Err(open_error(io::Error::last_os_error()));
            }
        }

        Ok(DarwinFile { file, mode })
    }

    fn free_space(path: &Path) -> Result<u64> {
        let c_path = unix::c_path(path)?;

        // SAFETY: statvfs is plain data; all-zero is a valid initial value
        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
        // SAFETY: c_path is NUL terminated and `stat` outlives the call
        let result = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if result != 0 {
            return Err(BenchError::FreeSpace {
                path: path.to_path_buf(),
                source: io::Error::last_os_error(),
            });
        }

        Ok((stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64))
    }
}

/// `F_FULLFSYNC`, falling back to `fsync` where the filesystem has no full
/// flush (network and FUSE mounts answer ENOTTY or ENOTSUP)
fn full_fsync(fd: RawFd) -> Result<()> {
    // SAFETY: fcntl with F_FULLFSYNC only requires a valid descriptor
    let result = unsafe { libc::fcntl(fd, libc::F_FULLFSYNC) };
    if result == -1 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(libc::ENOTTY) | Some(libc::ENOTSUP) => {
                tracing::debug!(error = %err, "F_FULLFSYNC unsupported, using fsync");
                unix::fsync(fd)
            }
            _ => Err(BenchError::Sync { source: err }),
        };
    }
    Ok(())
}

impl StorageHandle for DarwinFile {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if self.mode == IoMode::Direct {
            check_direct_alignment(offset, buf.as_ptr(), buf.len()).map_err(|source| {
                BenchError::Read {
                    offset,
                    len: buf.len(),
                    source,
                }
            })?;
        }
        unix::pread_full(self.file.as_raw_fd(), offset, buf)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        if self.mode == IoMode::Direct {
            check_direct_alignment(offset, buf.as_ptr(), buf.len()).map_err(|source| {
                BenchError::Write {
                    offset,
                    len: buf.len(),
                    source,
                }
            })?;
        }

        let written = unix::pwrite_full(self.file.as_raw_fd(), offset, buf)?;

        if self.mode == IoMode::Synchronous {
            // The flush belongs to the write; report it as a write failure
            full_fsync(self.file.as_raw_fd()).map_err(|err| match err {
                BenchError::Sync { source } => BenchError::Write {
                    offset,
                    len: buf.len(),
                    source,
                },
                other => other,
            })?;
        }

        Ok(written)
    }

    fn sync(&mut self) -> Result<()> {
        match self.mode {
            IoMode::Synchronous => full_fsync(self.file.as_raw_fd()),
            IoMode::Cached | IoMode::Direct => unix::fsync(self.file.as_raw_fd()),
        }
    }

    fn full_sync(&mut self) -> Result<()> {
        full_fsync(self.file.as_raw_fd())
    }

    fn set_access_hint(&mut self, _hint: AccessHint) {}

    fn mode(&self) -> IoMode {
        self.mode
    }
}
