//! Raw storage access layer
//!
//! This module defines the one interface the rest of the crate uses to touch
//! the benchmark file. Each supported operating system has its own backend
//! that maps the interface onto native primitives:
//!
//! - **Linux**: `O_DIRECT` / `O_SYNC`, `pread`/`pwrite`, `posix_fadvise` hints,
//!   free space through the raw `statfs` system call
//! - **Darwin**: `F_NOCACHE` per descriptor, `F_FULLFSYNC` durability, hints ignored
//! - **Windows**: `FILE_FLAG_NO_BUFFERING` / `FILE_FLAG_WRITE_THROUGH`,
//!   `ReadFile`/`WriteFile` addressed through `OVERLAPPED`, `GetDiskFreeSpaceExW`
//!
//! # Dispatch
//!
//! The backend is chosen at build time: `Native` aliases exactly one
//! [`Platform`] implementation, and [`open`] / [`free_space`] are the only
//! entry points. Nothing outside this module branches on the host OS.
//!
//! # Failure semantics
//!
//! Open failures are returned as `BenchError::Open` and never retried. Read,
//! write and sync failures are returned as-is so the executor can abort the
//! pattern. Access hints are advisory and never fail.
//!
//! # Example
//!
//! ```no_run
//! use diskpulse::config::IoMode;
//! use diskpulse::storage::{self, AccessHint, OpenIntent};
//! use std::path::Path;
//!
//! let mut handle = storage::open(Path::new("/tmp/bench.dat"), IoMode::Cached, OpenIntent::Create)?;
//! let pattern = vec![0xA5u8; 4096];
//! handle.bulk_fill(1024 * 1024, &pattern)?;
//! handle.set_access_hint(AccessHint::Sequential);
//!
//! let mut buf = vec![0u8; 4096];
//! let n = handle.read_at(0, &mut buf)?;
//! assert_eq!(n, 4096);
//! # Ok::<(), diskpulse::BenchError>(())
//! ```

use crate::config::{IoMode, DIRECT_IO_ALIGNMENT};
use crate::error::BenchError;
use crate::Result;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(any(target_os = "linux", target_vendor = "apple"))]
mod unix;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_vendor = "apple")]
pub mod darwin;

#[cfg(windows)]
pub mod windows;

#[cfg(not(any(target_os = "linux", target_vendor = "apple", windows)))]
pub mod unsupported;

#[cfg(test)]
pub mod mock;

#[cfg(target_os = "linux")]
type Native = linux::Linux;

#[cfg(target_vendor = "apple")]
type Native = darwin::Darwin;

#[cfg(windows)]
type Native = windows::Windows;

#[cfg(not(any(target_os = "linux", target_vendor = "apple", windows)))]
type Native = unsupported::Unsupported;

/// An open benchmark file
///
/// A handle is owned by exactly one executor for the lifetime of one pattern.
/// Offsets are absolute; the handle keeps no file position.
pub trait StorageHandle: Send {
    /// Read into `buf` at `offset`
    ///
    /// Continues after short reads until `buf` is full or end of file is
    /// reached, and returns the number of bytes read.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `buf` at `offset`, returning the number of bytes written
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize>;

    /// Flush written data according to the handle's mode
    fn sync(&mut self) -> Result<()>;

    /// Flush using the strongest durability primitive the platform offers
    fn full_sync(&mut self) -> Result<()>;

    /// Advise the OS about the upcoming access pattern
    ///
    /// Best-effort: failures are logged and ignored, and platforms without
    /// advisory hints do nothing.
    fn set_access_hint(&mut self, hint: AccessHint);

    /// Mode the handle was opened with
    fn mode(&self) -> IoMode;

    /// Write `pattern` repeatedly from offset 0 until `total_size` bytes are on
    /// disk, then flush with [`full_sync`](Self::full_sync)
    ///
    /// The last chunk is truncated to the remaining length. Returns the number
    /// of bytes written.
    fn bulk_fill(&mut self, total_size: u64, pattern: &[u8]) -> Result<u64> {
        if pattern.is_empty() {
            return Err(BenchError::config("bulk fill pattern must not be empty"));
        }

        let mut offset = 0u64;
        while offset < total_size {
            let chunk = (total_size - offset).min(pattern.len() as u64) as usize;
            let written = self.write_at(offset, &pattern[..chunk])?;
            if written == 0 {
                return Err(BenchError::Write {
                    offset,
                    len: chunk,
                    source: io::Error::from(io::ErrorKind::WriteZero),
                });
            }
            offset += written as u64;
        }

        self.full_sync()?;
        Ok(offset)
    }
}

/// Advisory access pattern hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessHint {
    /// Data will be read front to back (more readahead)
    Sequential,
    /// Data will be accessed in no particular order (less readahead)
    Random,
    /// Cached pages for the file are not needed (drop them)
    DropCache,
}

/// Whether `open` may create the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenIntent {
    /// The file must already exist
    Existing,
    /// Create the file if it does not exist
    Create,
}

/// One storage backend per operating system
pub trait Platform {
    type Handle: StorageHandle + 'static;

    /// Human-readable backend name
    const NAME: &'static str;

    fn open(path: &Path, mode: IoMode, intent: OpenIntent) -> Result<Self::Handle>;

    /// Bytes available to the calling user on the filesystem holding `path`
    fn free_space(path: &Path) -> Result<u64>;
}

/// Open `path` through the native backend
pub fn open(path: &Path, mode: IoMode, intent: OpenIntent) -> Result<Box<dyn StorageHandle>> {
    let handle = Native::open(path, mode, intent)?;
    tracing::debug!(
        path = %path.display(),
        %mode,
        backend = Native::NAME,
        "opened storage handle"
    );
    Ok(Box::new(handle))
}

/// Free space available to the caller where `path` lives (or would live)
pub fn free_space(path: &Path) -> Result<u64> {
    Native::free_space(&existing_ancestor(path))
}

/// Name of the backend compiled into this binary
pub fn platform_name() -> &'static str {
    Native::NAME
}

/// Nearest path component that exists, so free space can be queried for a
/// file before it is created
pub(crate) fn existing_ancestor(path: &Path) -> PathBuf {
    let mut candidate = path;
    loop {
        if candidate.exists() {
            return candidate.to_path_buf();
        }
        match candidate.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => candidate = parent,
            _ => return PathBuf::from("."),
        }
    }
}

/// Reject requests the kernel would refuse (or silently mishandle) without
/// cache bypass alignment
pub(crate) fn check_direct_alignment(offset: u64, ptr: *const u8, len: usize) -> io::Result<()> {
    let align = DIRECT_IO_ALIGNMENT;
    if offset % align as u64 != 0 || len % align != 0 || (ptr as usize) % align != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "direct IO requires {}-byte alignment (offset={}, length={}, buffer={:p})",
                align, offset, len, ptr
            ),
        ));
    }
    Ok(())
}
