//! Linux backend
//!
//! - `Direct` opens with `O_DIRECT`; offsets, lengths and buffers must be
//!   4096-byte aligned
//! - `Synchronous` opens with `O_SYNC`, so every write is durable on return
//! - Hints map onto `posix_fadvise` over the whole file
//! - Free space comes from the raw `statfs` system call (`f_bavail * f_bsize`)

use super::{check_direct_alignment, unix, AccessHint, OpenIntent, Platform, StorageHandle};
use crate::config::IoMode;
use crate::error::BenchError;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

pub struct Linux;

/// Open benchmark file on Linux
#[derive(Debug)]
pub struct LinuxFile {
    file: File,
    mode: IoMode,
}

impl Platform for Linux {
    type Handle = LinuxFile;

    const NAME: &'static str = "linux";

    fn open(path: &Path, mode: IoMode, intent: OpenIntent) -> Result<LinuxFile> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);

        if intent == OpenIntent::Create {
            options.create(true);
        }

        let custom_flags = match mode {
            IoMode::Cached => 0,
            IoMode::Direct => libc::O_DIRECT,
            IoMode::Synchronous => libc::O_SYNC,
        };
        if custom_flags != 0 {
            options.custom_flags(custom_flags);
        }

        let file = options.open(path).map_err(|source| BenchError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(LinuxFile { file, mode })
    }

    fn free_space(path: &Path) -> Result<u64> {
        let c_path = unix::c_path(path)?;

        // SAFETY: statfs is plain data; all-zero is a valid initial value
        let mut stat: libc::statfs = unsafe { std::mem::zeroed() };
        // SAFETY: c_path is NUL terminated and `stat` outlives the call
        let result = unsafe {
            libc::syscall(
                libc::SYS_statfs,
                c_path.as_ptr(),
                &mut stat as *mut libc::statfs,
            )
        };

        if result < 0 {
            return Err(BenchError::FreeSpace {
                path: path.to_path_buf(),
                source: io::Error::last_os_error(),
            });
        }

        Ok((stat.f_bavail as u64).saturating_mul(stat.f_bsize as u64))
    }
}

impl StorageHandle for LinuxFile {
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
        unix::pwrite_full(self.file.as_raw_fd(), offset, buf)
    }

    fn sync(&mut self) -> Result<()> {
        unix::fsync(self.file.as_raw_fd())
    }

    fn full_sync(&mut self) -> Result<()> {
        // fsync already reaches stable storage on Linux
        unix::fsync(self.file.as_raw_fd())
    }

    fn set_access_hint(&mut self, hint: AccessHint) {
        let advice = match hint {
            AccessHint::Sequential => libc::POSIX_FADV_SEQUENTIAL,
            AccessHint::Random => libc::POSIX_FADV_RANDOM,
            AccessHint::DropCache => libc::POSIX_FADV_DONTNEED,
        };

        // SAFETY: the descriptor is owned by `self.file`
        let result = unsafe { libc::posix_fadvise(self.file.as_raw_fd(), 0, 0, advice) };
        if result != 0 {
            // posix_fadvise returns the error number instead of setting errno
            tracing::debug!(
                ?hint,
                error = %io::Error::from_raw_os_error(result),
                "posix_fadvise ignored"
            );
        }
    }

    fn mode(&self) -> IoMode {
        self.mode
    }
}
