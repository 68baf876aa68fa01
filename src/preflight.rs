//! Pre-flight safety checks
//!
//! Run by the suite before anything touches the target. A failed check means
//! no file is created, filled or opened for IO.

use crate::error::BenchError;
use crate::storage::{self, existing_ancestor};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Headroom required on top of the benchmark file itself
pub const FREE_SPACE_MARGIN: u64 = 64 * 1024 * 1024;

/// Directories refused as the direct parent of a benchmark file
#[cfg(unix)]
const PROTECTED_EXACT: &[&str] = &["/"];

/// Directories whose whole subtree is off limits
#[cfg(unix)]
const PROTECTED_TREES: &[&str] = &[
    "/bin",
    "/boot",
    "/dev",
    "/etc",
    "/lib",
    "/lib32",
    "/lib64",
    "/proc",
    "/sbin",
    "/sys",
    "/usr",
    "/System",
    "/private/etc",
    "/private/var/db",
];

#[cfg(windows)]
const PROTECTED_EXACT: &[&str] = &["c:\\"];

#[cfg(windows)]
const PROTECTED_TREES: &[&str] = &[
    "c:\\windows",
    "c:\\program files",
    "c:\\program files (x86)",
    "c:\\programdata",
];

#[cfg(not(any(unix, windows)))]
const PROTECTED_EXACT: &[&str] = &[];

#[cfg(not(any(unix, windows)))]
const PROTECTED_TREES: &[&str] = &[];

/// Check that `path` may be used as a benchmark file of `file_size` bytes
///
/// # Errors
///
/// `Preflight` if the target lives in a protected system directory, is a
/// directory, already exists and `force` is not set, or the filesystem has
/// less than `file_size + FREE_SPACE_MARGIN` bytes available. Errors from the
/// free space query itself are returned as-is.
pub fn check_target(path: &Path, file_size: u64, force: bool) -> Result<()> {
    if is_protected(path) {
        return Err(BenchError::Preflight(format!(
            "refusing to write into protected system directory: {}",
            path.display()
        )));
    }

    let existing_len = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(BenchError::Preflight(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Ok(meta) => {
            if !force {
                return Err(BenchError::Preflight(format!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                )));
            }
            tracing::warn!(path = %path.display(), "overwriting existing file");
            meta.len()
        }
        Err(_) => 0,
    };

    let available = storage::free_space(path)?;
    check_free_space(available, existing_len, file_size)?;

    tracing::debug!(
        path = %path.display(),
        available,
        required = file_size.saturating_add(FREE_SPACE_MARGIN),
        "pre-flight checks passed"
    );
    Ok(())
}

/// Space check, counting an existing file's blocks as reusable
pub fn check_free_space(available: u64, existing_len: u64, file_size: u64) -> Result<()> {
    let required = file_size.saturating_add(FREE_SPACE_MARGIN);
    let usable = available.saturating_add(existing_len);
    if usable < required {
        return Err(BenchError::Preflight(format!(
            "insufficient free space: need {} bytes ({} + {} margin), {} available",
            required, file_size, FREE_SPACE_MARGIN, usable
        )));
    }
    Ok(())
}

/// True if the directory that would hold `path` is a protected system location
pub fn is_protected(path: &Path) -> bool {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let resolved = resolve(dir);
    let normalized = normalize(&resolved);

    PROTECTED_EXACT.iter().any(|p| normalized == Path::new(p))
        || PROTECTED_TREES.iter().any(|p| normalized.starts_with(p))
}

/// Canonical form of the nearest existing ancestor, with the missing tail
/// re-attached
fn resolve(dir: &Path) -> PathBuf {
    let ancestor = existing_ancestor(dir);
    let canonical = fs::canonicalize(&ancestor).unwrap_or_else(|_| ancestor.clone());
    match dir.strip_prefix(&ancestor) {
        Ok(tail) if !tail.as_os_str().is_empty() => canonical.join(tail),
        _ => canonical,
    }
}

#[cfg(windows)]
fn normalize(path: &Path) -> PathBuf {
    // Case-insensitive comparison; drop the verbatim prefix canonicalize adds
    let s = path.to_string_lossy().to_lowercase();
    PathBuf::from(s.strip_prefix(r"\\?\").unwrap_or(s.as_str()))
}

#[cfg(not(windows))]
fn normalize(path: &Path) -> PathBuf {
    path.to_path_buf()
}
