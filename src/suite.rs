//! Suite orchestration
//!
//! A suite runs the selected patterns one after another against one benchmark
//! file:
//!
//! 1. Pre-flight checks on the target
//! 2. Fixture preparation: the file is created and filled to its full size
//! 3. One fresh executor (and handle) per pattern, in order
//! 4. Cleanup: the file is deleted unless asked to keep it
//!
//! The first pattern failure stops the sequence; the patterns after it are
//! reported as skipped.

use crate::config::validator::validate_suite;
use crate::config::{FillScheme, IoMode, PatternType, SuiteConfig};
use crate::error::BenchError;
use crate::executor::{BenchmarkExecutor, BenchmarkResult, ProgressUpdate};
use crate::pattern::generate_pattern;
use crate::preflight;
use crate::storage::{self, OpenIntent};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Size of the pseudorandom chunk repeated over the fixture
pub const FIXTURE_CHUNK_SIZE: usize = 1024 * 1024;

/// Create `path` and fill it with `file_size` bytes of pseudorandom data
///
/// The file is written through the cache and flushed with the platform's
/// strongest sync before returning. Failures are wrapped in
/// `BenchError::Fixture`.
pub fn prepare_fixture(path: &Path, file_size: u64, seed: u64) -> Result<u64> {
    let wrap = |source: BenchError| BenchError::Fixture {
        path: path.to_path_buf(),
        source: Box::new(source),
    };

    let chunk_len = (FIXTURE_CHUNK_SIZE as u64).min(file_size).max(1) as usize;
    let chunk = generate_pattern(chunk_len, FillScheme::Random, seed).map_err(wrap)?;

    let mut handle = storage::open(path, IoMode::Cached, OpenIntent::Create).map_err(wrap)?;
    handle.bulk_fill(file_size, &chunk).map_err(wrap)
}

/// Pattern that stopped the suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFailure {
    pub pattern: PatternType,
    pub error: String,
}

/// Everything a suite run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub target: PathBuf,
    pub platform: String,
    pub io_mode: IoMode,
    pub file_size: u64,
    pub block_size: u64,
    pub duration_secs: f64,
    /// Completed patterns, in execution order
    pub results: Vec<BenchmarkResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<PatternFailure>,
    /// Patterns not run because an earlier one failed
    pub skipped: Vec<PatternType>,
    /// Whether the benchmark file was deleted afterwards
    pub cleaned_up: bool,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

type SuiteProgressFn<'a> = Box<dyn FnMut(PatternType, ProgressUpdate) + 'a>;

/// Runs a [`SuiteConfig`]
pub struct BenchmarkSuite<'a> {
    config: SuiteConfig,
    on_progress: Option<SuiteProgressFn<'a>>,
}

impl<'a> BenchmarkSuite<'a> {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            on_progress: None,
        }
    }

    /// Forward executor progress, tagged with the running pattern
    pub fn on_progress(mut self, callback: impl FnMut(PatternType, ProgressUpdate) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every selected pattern
    ///
    /// Returns `Err` only when the suite could not start (invalid
    /// configuration, pre-flight refusal, fixture failure). A pattern failure
    /// is reported inside the returned [`SuiteReport`].
    pub fn run(&mut self) -> Result<SuiteReport> {
        validate_suite(&self.config)?;
        let path = self.config.path.clone();

        preflight::check_target(&path, self.config.file_size, self.config.force)?;

        if path.exists() {
            // Only reachable with force; start from an empty file
            fs::remove_file(&path).map_err(|e| {
                BenchError::Preflight(format!("cannot replace {}: {}", path.display(), e))
            })?;
        }

        tracing::info!(
            path = %path.display(),
            size = self.config.file_size,
            "preparing benchmark file"
        );
        if let Err(e) = prepare_fixture(&path, self.config.file_size, self.config.seed) {
            if !self.config.keep_file {
                remove_benchmark_file(&path);
            }
            return Err(e);
        }

        let mut results = Vec::with_capacity(self.config.patterns.len());
        let mut failure = None;
        let mut skipped = Vec::new();

        for pattern in self.config.patterns.clone() {
            if failure.is_some() {
                tracing::warn!(%pattern, "skipped after earlier failure");
                skipped.push(pattern);
                continue;
            }

            tracing::info!(%pattern, mode = %self.config.io_mode, "running pattern");
            match self.run_pattern(pattern) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(%pattern, error = %e, "pattern failed");
                    failure = Some(PatternFailure {
                        pattern,
                        error: e.to_string(),
                    });
                }
            }
        }

        let cleaned_up = !self.config.keep_file && remove_benchmark_file(&path);

        Ok(SuiteReport {
            target: path,
            platform: storage::platform_name().to_string(),
            io_mode: self.config.io_mode,
            file_size: self.config.file_size,
            block_size: self.config.block_size,
            duration_secs: self.config.duration.as_secs_f64(),
            results,
            failure,
            skipped,
            cleaned_up,
        })
    }

    fn run_pattern(&mut self, pattern: PatternType) -> Result<BenchmarkResult> {
        let mut executor = BenchmarkExecutor::new(self.config.benchmark_config(pattern));
        if let Some(callback) = self.on_progress.as_mut() {
            executor = executor.on_progress(move |update| callback(pattern, update));
        }
        executor.run()
    }
}

fn remove_benchmark_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed benchmark file");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not remove benchmark file");
            false
        }
    }
}
