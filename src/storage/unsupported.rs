//! Fallback for hosts without a storage backend
//!
//! Every entry point fails with `UnsupportedPlatform`. No handle can ever be
//! constructed, which the uninhabited handle type makes explicit.

use super::{AccessHint, OpenIntent, Platform, StorageHandle};
use crate::config::IoMode;
use crate::error::BenchError;
use crate::Result;
use std::path::Path;

pub struct Unsupported;

/// Handle type that has no values
#[derive(Debug)]
pub enum NoHandle {}

impl Platform for Unsupported {
    type Handle = NoHandle;

    const NAME: &'static str = "unsupported";

    fn open(_path: &Path, _mode: IoMode, _intent: OpenIntent) -> Result<NoHandle> {
        Err(BenchError::UnsupportedPlatform(
            "no raw storage backend for this operating system",
        ))
    }

    fn free_space(_path: &Path) -> Result<u64> {
        Err(BenchError::UnsupportedPlatform(
            "free space query is not available on this operating system",
        ))
    }
}

impl StorageHandle for NoHandle {
    fn read_at(&mut self, _offset: u64, _buf: &mut [u8]) -> Result<usize> {
        match *self {}
    }

    fn write_at(&mut self, _offset: u64, _buf: &[u8]) -> Result<usize> {
        match *self {}
    }

    fn sync(&mut self) -> Result<()> {
        match *self {}
    }

    fn full_sync(&mut self) -> Result<()> {
        match *self {}
    }

    fn set_access_hint(&mut self, _hint: AccessHint) {
        match *self {}
    }

    fn mode(&self) -> IoMode {
        match *self {}
    }
}
