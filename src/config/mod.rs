//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! [`BenchmarkConfig`] describes exactly one pattern run and is what the
//! executor consumes. [`SuiteConfig`] is the user-facing shape (CLI or TOML):
//! one target, shared settings, and the list of patterns to run against it.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;
pub mod workload;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use workload::{FillScheme, IoMode, OutputFormat, PatternType};

/// Alignment used for payload buffers and required by direct IO
pub const DIRECT_IO_ALIGNMENT: usize = 4096;

/// Default reservoir capacity for latency percentiles
pub const DEFAULT_RESERVOIR_CAPACITY: usize = 10_000;

/// Configuration for a single pattern run
///
/// Immutable for the duration of the run. Progress and completion callbacks are
/// attached to the executor, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    /// Path to the benchmark file (must already exist and be filled)
    pub path: PathBuf,
    /// Cache behavior of the file handle
    #[serde(default)]
    pub io_mode: IoMode,
    /// Size of the addressable region in bytes
    #[serde(default = "default_file_size")]
    pub file_size: u64,
    /// Bytes per operation
    #[serde(default = "default_block_size")]
    pub block_size: u64,
    /// Wall-clock length of the timed loop
    #[serde(default = "default_duration", with = "serde_secs")]
    pub duration: Duration,
    /// Access pattern to execute
    pub pattern: PatternType,
    /// Payload content
    #[serde(default)]
    pub fill_scheme: FillScheme,
    /// Seed for payload and offset generation
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Accepted for compatibility; execution is always one operation at a time
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Number of latency samples kept for percentile estimation
    #[serde(default = "default_reservoir_capacity")]
    pub reservoir_capacity: usize,
}

impl BenchmarkConfig {
    /// Create a configuration with defaults for everything but path and pattern
    pub fn new(path: impl Into<PathBuf>, pattern: PatternType) -> Self {
        Self {
            path: path.into(),
            io_mode: IoMode::default(),
            file_size: default_file_size(),
            block_size: default_block_size(),
            duration: default_duration(),
            pattern,
            fill_scheme: FillScheme::default(),
            seed: default_seed(),
            queue_depth: default_queue_depth(),
            reservoir_capacity: default_reservoir_capacity(),
        }
    }
}

/// Configuration for a full invocation: one target, several patterns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteConfig {
    /// Path of the benchmark file to create
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub io_mode: IoMode,
    #[serde(default = "default_file_size")]
    pub file_size: u64,
    #[serde(default = "default_block_size")]
    pub block_size: u64,
    #[serde(default = "default_duration", with = "serde_secs")]
    pub duration: Duration,
    /// Patterns to run, in order
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternType>,
    #[serde(default)]
    pub fill_scheme: FillScheme,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    #[serde(default = "default_reservoir_capacity")]
    pub reservoir_capacity: usize,
    /// Keep the benchmark file after the run
    #[serde(default)]
    pub keep_file: bool,
    /// Overwrite an existing file at `path`
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

impl SuiteConfig {
    /// Build the per-pattern configuration handed to the executor
    pub fn benchmark_config(&self, pattern: PatternType) -> BenchmarkConfig {
        BenchmarkConfig {
            path: self.path.clone(),
            io_mode: self.io_mode,
            file_size: self.file_size,
            block_size: self.block_size,
            duration: self.duration,
            pattern,
            fill_scheme: self.fill_scheme,
            seed: self.seed,
            queue_depth: self.queue_depth,
            reservoir_capacity: self.reservoir_capacity,
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            io_mode: IoMode::default(),
            file_size: default_file_size(),
            block_size: default_block_size(),
            duration: default_duration(),
            patterns: default_patterns(),
            fill_scheme: FillScheme::default(),
            seed: default_seed(),
            queue_depth: default_queue_depth(),
            reservoir_capacity: default_reservoir_capacity(),
            keep_file: false,
            force: false,
            output: OutputFormat::default(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("diskpulse.bench")
}

fn default_file_size() -> u64 {
    1024 * 1024 * 1024
}

fn default_block_size() -> u64 {
    4096
}

fn default_duration() -> Duration {
    Duration::from_secs(5)
}

fn default_patterns() -> Vec<PatternType> {
    PatternType::ALL.to_vec()
}

fn default_seed() -> u64 {
    42
}

fn default_queue_depth() -> usize {
    1
}

fn default_reservoir_capacity() -> usize {
    DEFAULT_RESERVOIR_CAPACITY
}

// Durations are written as fractional seconds in config files
mod serde_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_defaults() {
        let suite = SuiteConfig::default();
        assert_eq!(suite.block_size, 4096);
        assert_eq!(suite.file_size, 1024 * 1024 * 1024);
        assert_eq!(suite.patterns.len(), 4);
        assert_eq!(suite.io_mode, IoMode::Cached);
        assert_eq!(suite.queue_depth, 1);
    }

    #[test]
    fn test_benchmark_config_from_suite() {
        let suite = SuiteConfig {
            block_size: 8192,
            io_mode: IoMode::Direct,
            ..Default::default()
        };
        let cfg = suite.benchmark_config(PatternType::RandomRead);
        assert_eq!(cfg.pattern, PatternType::RandomRead);
        assert_eq!(cfg.block_size, 8192);
        assert_eq!(cfg.io_mode, IoMode::Direct);
        assert_eq!(cfg.path, suite.path);
    }

    #[test]
    fn test_duration_roundtrips_as_seconds() {
        let cfg = BenchmarkConfig {
            duration: Duration::from_millis(1500),
            ..BenchmarkConfig::new("/tmp/x", PatternType::SequentialRead)
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["duration"], serde_json::json!(1.5));
    }
}
