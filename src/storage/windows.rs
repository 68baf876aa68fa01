//! Windows backend
//!
//! `Direct` opens with `FILE_FLAG_NO_BUFFERING` (sector-aligned transfers) and
//! `Synchronous` with `FILE_FLAG_WRITE_THROUGH`. Reads and writes go through
//! `ReadFile`/`WriteFile` with the offset carried in an `OVERLAPPED`, so the
//! handle's file pointer is never consulted. Access hints are ignored.

use super::{check_direct_alignment, AccessHint, OpenIntent, Platform, StorageHandle};
use crate::config::IoMode;
use crate::error::BenchError;
use crate::Result;
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::fs::OpenOptionsExt;
use std::os::windows::io::AsRawHandle;
use std::path::Path;
use windows_sys::Win32::Foundation::{ERROR_HANDLE_EOF, HANDLE};
use windows_sys::Win32::Storage::FileSystem::{
    FlushFileBuffers, GetDiskFreeSpaceExW, ReadFile, WriteFile, FILE_FLAG_NO_BUFFERING,
    FILE_FLAG_WRITE_THROUGH,
};
use windows_sys::Win32::System::IO::OVERLAPPED;

pub struct Windows;

/// Open benchmark file on Windows
#[derive(Debug)]
pub struct WindowsFile {
    file: File,
    mode: IoMode,
}

impl Platform for Windows {
    type Handle = WindowsFile;

    const NAME: &'static str = "windows";

    fn open(path: &Path, mode: IoMode, intent: OpenIntent) -> Result<WindowsFile> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);

        if intent == OpenIntent::Create {
            options.create(true);
        }

        match mode {
            IoMode::Cached => {}
            IoMode::Direct => {
                options.custom_flags(FILE_FLAG_NO_BUFFERING);
            }
            IoMode::Synchronous => {
                options.custom_flags(FILE_FLAG_WRITE_THROUGH);
            }
        }

        let file = options.open(path).map_err(|source| BenchError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(WindowsFile { file, mode })
    }

    fn free_space(path: &Path) -> Result<u64> {
        let wide = to_wide(path.as_os_str());
        let mut available: u64 = 0;

        // SAFETY: `wide` is NUL terminated; the two optional outputs may be null
        let ok = unsafe {
            GetDiskFreeSpaceExW(
                wide.as_ptr(),
                &mut available,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };

        if ok == 0 {
            return Err(BenchError::FreeSpace {
                path: path.to_path_buf(),
                source: io::Error::last_os_error(),
            });
        }

        Ok(available)
    }
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// OVERLAPPED addressing `offset`, split into its low and high halves
fn overlapped_at(offset: u64) -> OVERLAPPED {
    // SAFETY: OVERLAPPED is plain data; all-zero is a valid initial value
    let mut ov: OVERLAPPED = unsafe { std::mem::zeroed() };
    // SAFETY: only the offset member of the union is used for file handles
    unsafe {
        ov.Anonymous.Anonymous.Offset = offset as u32;
        ov.Anonymous.Anonymous.OffsetHigh = (offset >> 32) as u32;
    }
    ov
}

fn transfer_len(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "transfer larger than 4 GiB")
    })
}

impl WindowsFile {
    fn raw(&self) -> HANDLE {
        self.file.as_raw_handle() as HANDLE
    }

    fn flush(&self) -> Result<()> {
        // SAFETY: the handle is owned by `self.file`
        let ok = unsafe { FlushFileBuffers(self.raw()) };
        if ok == 0 {
            return Err(BenchError::Sync {
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

impl StorageHandle for WindowsFile {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let read_error = |offset, len, source| BenchError::Read {
            offset,
            len,
            source,
        };

        if self.mode == IoMode::Direct {
            check_direct_alignment(offset, buf.as_ptr(), buf.len())
                .map_err(|e| read_error(offset, buf.len(), e))?;
        }

        let length = buf.len();
        let mut total_read = 0;

        while total_read < length {
            let remaining = &mut buf[total_read..];
            let current_offset = offset + total_read as u64;
            let request =
                transfer_len(remaining.len()).map_err(|e| read_error(current_offset, remaining.len(), e))?;
            let mut ov = overlapped_at(current_offset);
            let mut read: u32 = 0;

            // SAFETY: `remaining` and `ov` outlive the call; the handle is synchronous
            let ok = unsafe {
                ReadFile(
                    self.raw(),
                    remaining.as_mut_ptr(),
                    request,
                    &mut read,
                    &mut ov,
                )
            };

            if ok == 0 {
                let err = io::Error::last_os_error();
                if err.raw_os_error() == Some(ERROR_HANDLE_EOF as i32) {
                    break;
                }
                return Err(read_error(current_offset, remaining.len(), err));
            }

            if read == 0 {
                break;
            }

            total_read += read as usize;
        }

        Ok(total_read)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        let write_error = |offset, len, source| BenchError::Write {
            offset,
            len,
            source,
        };

        if self.mode == IoMode::Direct {
            check_direct_alignment(offset, buf.as_ptr(), buf.len())
                .map_err(|e| write_error(offset, buf.len(), e))?;
        }

        let length = buf.len();
        let mut total_written = 0;

        while total_written < length {
            let remaining = &buf[total_written..];
            let current_offset = offset + total_written as u64;
            let request = transfer_len(remaining.len())
                .map_err(|e| write_error(current_offset, remaining.len(), e))?;
            let mut ov = overlapped_at(current_offset);
            let mut written: u32 = 0;

            // SAFETY: `remaining` and `ov` outlive the call; the handle is synchronous
            let ok = unsafe {
                WriteFile(
                    self.raw(),
                    remaining.as_ptr(),
                    request,
                    &mut written,
                    &mut ov,
                )
            };

            if ok == 0 {
                return Err(write_error(
                    current_offset,
                    remaining.len(),
                    io::Error::last_os_error(),
                ));
            }

            if written == 0 {
                return Err(write_error(
                    current_offset,
                    remaining.len(),
                    io::Error::from(io::ErrorKind::WriteZero),
                ));
            }

            total_written += written as usize;
        }

        Ok(total_written)
    }

    fn sync(&mut self) -> Result<()> {
        self.flush()
    }

    fn full_sync(&mut self) -> Result<()> {
        self.flush()
    }

    fn set_access_hint(&mut self, _hint: AccessHint) {}

    fn mode(&self) -> IoMode {
        self.mode
    }
}
