//! Configuration validation
//!
//! Everything here runs before the target is opened. A rejected configuration
//! never produces IO.

use super::*;
use crate::error::BenchError;
use crate::Result;

/// Largest block size accepted for a single operation
pub const MAX_BLOCK_SIZE: u64 = 64 * 1024 * 1024;

/// Validate a single-pattern configuration
///
/// Silent: settings that are accepted but have no effect are reported by
/// [`inert_settings`].
pub fn validate_benchmark(config: &BenchmarkConfig) -> Result<()> {
    validate_sizes(config.file_size, config.block_size)?;
    validate_duration(config.duration)?;
    validate_queue_depth(config.queue_depth)?;

    if config.reservoir_capacity == 0 {
        return Err(BenchError::config("reservoir_capacity must be greater than 0"));
    }

    if config.path.as_os_str().is_empty() {
        return Err(BenchError::config("target path must not be empty"));
    }

    Ok(())
}

/// Validate a suite configuration, logging each inert setting once
pub fn validate_suite(config: &SuiteConfig) -> Result<()> {
    if config.patterns.is_empty() {
        return Err(BenchError::config("at least one pattern must be selected"));
    }

    for pattern in &config.patterns {
        validate_benchmark(&config.benchmark_config(*pattern))?;
    }

    for warning in inert_settings(config) {
        tracing::warn!("{}", warning);
    }

    Ok(())
}

/// Settings that pass validation but will not behave as the user may expect
pub fn inert_settings(config: &SuiteConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.queue_depth > 1 {
        warnings.push(format!(
            "queue depth {} has no effect: operations are issued one at a time",
            config.queue_depth
        ));
    }

    // Left to the storage layer, which reports it as an IO error
    if config.io_mode == IoMode::Direct && config.block_size % DIRECT_IO_ALIGNMENT as u64 != 0 {
        warnings.push(format!(
            "block size {} is not aligned to {} bytes for direct IO",
            config.block_size, DIRECT_IO_ALIGNMENT
        ));
    }

    warnings
}

fn validate_sizes(file_size: u64, block_size: u64) -> Result<()> {
    if block_size == 0 {
        return Err(BenchError::config("block_size must be greater than 0"));
    }

    if block_size > MAX_BLOCK_SIZE {
        return Err(BenchError::config(format!(
            "block_size must be at most {} bytes, got {}",
            MAX_BLOCK_SIZE, block_size
        )));
    }

    if file_size == 0 {
        return Err(BenchError::config("file_size must be greater than 0"));
    }

    if block_size > file_size {
        return Err(BenchError::config(format!(
            "block_size ({}) must not exceed file_size ({})",
            block_size, file_size
        )));
    }

    Ok(())
}

fn validate_duration(duration: Duration) -> Result<()> {
    if duration.is_zero() {
        return Err(BenchError::config("duration must be greater than 0"));
    }
    Ok(())
}

fn validate_queue_depth(queue_depth: usize) -> Result<()> {
    if queue_depth == 0 {
        return Err(BenchError::config("queue_depth must be at least 1"));
    }
    Ok(())
}
