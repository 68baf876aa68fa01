//! Error taxonomy
//!
//! Every fallible operation in the library returns [`BenchError`]. The variants
//! map onto the points where a run can stop:
//!
//! - **Config**: rejected before any IO is issued
//! - **Open**: the target could not be opened (never retried)
//! - **Read / Write / Sync**: an IO call failed inside a pattern; the pattern is
//!   aborted and no result is produced
//! - **UnsupportedPlatform**: the host has no storage backend
//! - **Preflight / Fixture**: safety checks and fixture preparation owned by the suite

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the benchmark library
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid configuration, detected before touching the target
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Opening the target failed
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A positioned read failed
    #[error("read failed: offset={offset}, length={len}: {source}")]
    Read {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// A positioned write failed
    #[error("write failed: offset={offset}, length={len}: {source}")]
    Write {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// Flushing written data to stable storage failed
    #[error("sync failed: {source}")]
    Sync {
        #[source]
        source: io::Error,
    },

    /// Querying the filesystem for available space failed
    #[error("failed to query free space for {}: {source}", .path.display())]
    FreeSpace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested capability does not exist on this host
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(&'static str),

    /// A pre-flight safety check refused the target
    #[error("pre-flight check failed: {0}")]
    Preflight(String),

    /// Preparing the benchmark file failed
    #[error("failed to prepare benchmark file {}: {source}", .path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: Box<BenchError>,
    },
}

impl BenchError {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
