//! Benchmark executor
//!
//! Runs one pattern against one target for a fixed wall-clock duration and
//! produces a [`BenchmarkResult`].
//!
//! # Lifecycle
//!
//! 1. **Idle**: created, nothing allocated
//! 2. **Preparing**: configuration validated, payload buffer and offsets
//!    generated, handle opened, access hints applied
//! 3. **Running**: the timed loop
//! 4. **Finalizing**: write patterns are synced, the completion callback fires,
//!    statistics are computed
//! 5. **Done**, or **Failed** on any error (no partial result is returned)
//!
//! Only the IO call itself sits between the two timestamps of an operation.
//! Offset generation, bookkeeping and the progress callback happen outside it.
//!
//! # Example
//!
//! ```no_run
//! use diskpulse::config::{BenchmarkConfig, PatternType};
//! use diskpulse::executor::BenchmarkExecutor;
//!
//! let config = BenchmarkConfig::new("/tmp/bench.dat", PatternType::RandomRead);
//! let result = BenchmarkExecutor::new(config)
//!     .on_progress(|update| eprintln!("{:.1}s", update.elapsed.as_secs_f64()))
//!     .run()?;
//! println!("{} IOPS", result.iops);
//! # Ok::<(), diskpulse::BenchError>(())
//! ```

pub mod result;

pub use result::{BenchmarkResult, LatencyDistribution, Throughput};

use crate::config::validator::validate_benchmark;
use crate::config::BenchmarkConfig;
use crate::error::BenchError;
use crate::pattern::{generate_pattern, OffsetSequence, SequentialCursor};
use crate::stats::{LatencyRecorder, RunningStats};
use crate::storage::{self, AccessHint, OpenIntent, StorageHandle};
use crate::Result;
use std::fmt;
use std::time::{Duration, Instant};

/// Minimum spacing between progress callbacks (and throughput samples)
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Executor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Preparing,
    Running,
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutorState::Idle => "idle",
            ExecutorState::Preparing => "preparing",
            ExecutorState::Running => "running",
            ExecutorState::Finalizing => "finalizing",
            ExecutorState::Done => "done",
            ExecutorState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress report passed to the progress callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Time since the timed loop started
    pub elapsed: Duration,
    /// Configured run duration
    pub total: Duration,
    /// Throughput over the interval since the previous update
    pub throughput_bps: f64,
}

impl ProgressUpdate {
    /// Completed fraction of the run, in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.total.as_secs_f64()).min(1.0)
    }
}

type ProgressFn<'a> = Box<dyn FnMut(ProgressUpdate) + 'a>;
type CompletionFn<'a> = Box<dyn FnOnce() + 'a>;

/// Where the next offset comes from
enum OffsetSource {
    Sequential(SequentialCursor),
    Random(OffsetSequence),
}

impl OffsetSource {
    #[inline(always)]
    fn next_offset(&mut self) -> u64 {
        match self {
            OffsetSource::Sequential(cursor) => cursor.next_offset(),
            OffsetSource::Random(sequence) => sequence.next_offset(),
        }
    }
}

/// Runs a single pattern
pub struct BenchmarkExecutor<'a> {
    config: BenchmarkConfig,
    state: ExecutorState,
    on_progress: Option<ProgressFn<'a>>,
    on_completion: Option<CompletionFn<'a>>,
}

impl<'a> BenchmarkExecutor<'a> {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            state: ExecutorState::Idle,
            on_progress: None,
            on_completion: None,
        }
    }

    /// Called at most once per [`PROGRESS_INTERVAL`] while running
    pub fn on_progress(mut self, callback: impl FnMut(ProgressUpdate) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Called once after the timed loop (and the final sync) succeeded
    pub fn on_completion(mut self, callback: impl FnOnce() + 'a) -> Self {
        self.on_completion = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Open the configured target and run the pattern
    ///
    /// The target must already exist and hold `file_size` bytes; the executor
    /// never creates or deletes it.
    pub fn run(&mut self) -> Result<BenchmarkResult> {
        self.transition(ExecutorState::Preparing);

        if let Err(e) = validate_benchmark(&self.config) {
            return Err(self.fail(e));
        }

        match storage::open(&self.config.path, self.config.io_mode, OpenIntent::Existing) {
            Ok(mut handle) => self.execute(handle.as_mut()),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Run the pattern on a handle opened by the caller
    pub fn run_with_handle(&mut self, mut handle: Box<dyn StorageHandle>) -> Result<BenchmarkResult> {
        self.transition(ExecutorState::Preparing);

        if let Err(e) = validate_benchmark(&self.config) {
            return Err(self.fail(e));
        }

        self.execute(handle.as_mut())
    }

    fn execute(&mut self, handle: &mut dyn StorageHandle) -> Result<BenchmarkResult> {
        match self.run_phases(handle) {
            Ok(result) => {
                self.transition(ExecutorState::Done);
                Ok(result)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn run_phases(&mut self, handle: &mut dyn StorageHandle) -> Result<BenchmarkResult> {
        let config = self.config.clone();
        let pattern = config.pattern;
        let is_write = pattern.is_write();

        // Preparing
        let block_len = usize::try_from(config.block_size)
            .map_err(|_| BenchError::config("block_size does not fit in memory"))?;
        let mut buffer = generate_pattern(block_len, config.fill_scheme, config.seed)?;

        let mut offsets = if pattern.is_random() {
            OffsetSource::Random(OffsetSequence::with_default_cap(
                config.file_size,
                config.block_size,
                config.seed,
            )?)
        } else {
            OffsetSource::Sequential(SequentialCursor::new(config.file_size, config.block_size)?)
        };

        if !is_write {
            handle.set_access_hint(AccessHint::DropCache);
        }
        handle.set_access_hint(if pattern.is_random() {
            AccessHint::Random
        } else {
            AccessHint::Sequential
        });

        let mut recorder = LatencyRecorder::with_seed(config.reservoir_capacity, config.seed);
        let mut interval_stats = RunningStats::new();
        let mut operations = 0u64;
        let mut bytes = 0u64;

        // Running
        self.transition(ExecutorState::Running);
        let start = Instant::now();
        let mut last_progress = start;
        let mut bytes_at_last_progress = 0u64;

        loop {
            if start.elapsed() >= config.duration {
                break;
            }

            let offset = offsets.next_offset();
            // A trailing partial block is written short so the file never grows
            let write_len = (config.file_size - offset).min(config.block_size) as usize;

            let io_start = Instant::now();
            let transferred = if is_write {
                handle.write_at(offset, &buffer[..write_len])?
            } else {
                handle.read_at(offset, &mut buffer)?
            };
            let latency = io_start.elapsed();

            recorder.record(latency);
            operations += 1;
            bytes += transferred as u64;

            let now = Instant::now();
            let since_progress = now.duration_since(last_progress);
            if since_progress >= PROGRESS_INTERVAL {
                let interval_bps =
                    (bytes - bytes_at_last_progress) as f64 / since_progress.as_secs_f64();
                interval_stats.update(interval_bps);

                if let Some(callback) = self.on_progress.as_mut() {
                    callback(ProgressUpdate {
                        elapsed: now.duration_since(start),
                        total: config.duration,
                        throughput_bps: interval_bps,
                    });
                }

                last_progress = now;
                bytes_at_last_progress = bytes;
            }
        }

        let elapsed = start.elapsed();

        // Finalizing
        self.transition(ExecutorState::Finalizing);
        if is_write {
            handle.sync()?;
        }

        if let Some(callback) = self.on_completion.take() {
            callback();
        }

        let latency = recorder.calculate();

        tracing::debug!(
            pattern = %pattern,
            operations,
            bytes,
            elapsed_ms = elapsed.as_millis() as u64,
            "pattern finished"
        );

        Ok(BenchmarkResult {
            pattern,
            io_mode: config.io_mode,
            block_size: config.block_size,
            operations,
            bytes,
            duration_ms: elapsed.as_millis() as u64,
            iops: result::iops(operations, elapsed),
            throughput: Throughput::new(bytes, elapsed, &interval_stats),
            latency: LatencyDistribution::from_stats(&latency),
        })
    }

    fn transition(&mut self, next: ExecutorState) {
        tracing::debug!(from = %self.state, to = %next, pattern = %self.config.pattern, "executor state");
        self.state = next;
    }

    fn fail(&mut self, error: BenchError) -> BenchError {
        self.transition(ExecutorState::Failed);
        tracing::debug!(error = %error, "pattern aborted");
        error
    }
}
