//! Result record of one pattern run

use crate::config::{IoMode, PatternType};
use crate::stats::{LatencyStats, RunningStats};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a completed pattern
///
/// Produced once by the executor and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub pattern: PatternType,
    pub io_mode: IoMode,
    pub block_size: u64,
    /// Completed operations, including zero-byte reads at end of file
    pub operations: u64,
    pub bytes: u64,
    /// Length of the timed loop
    pub duration_ms: u64,
    /// Operations per whole second of the timed loop
    pub iops: u64,
    pub throughput: Throughput,
    pub latency: LatencyDistribution,
}

/// Throughput over the whole run plus its variability between progress intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub bytes_per_second: f64,
    /// Sample standard deviation of per-interval throughput
    pub stddev_bytes_per_second: f64,
    pub coefficient_of_variation: f64,
    /// Number of intervals sampled
    pub samples: u64,
}

/// Latency summary in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyDistribution {
    pub min_us: f64,
    pub avg_us: f64,
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
    pub max_us: f64,
}

impl LatencyDistribution {
    pub fn from_stats(stats: &LatencyStats) -> Self {
        Self {
            min_us: nanos_to_micros(stats.min_nanos as f64),
            avg_us: nanos_to_micros(stats.avg_nanos),
            p50_us: nanos_to_micros(stats.p50_nanos as f64),
            p95_us: nanos_to_micros(stats.p95_nanos as f64),
            p99_us: nanos_to_micros(stats.p99_nanos as f64),
            max_us: nanos_to_micros(stats.max_nanos as f64),
        }
    }
}

impl Throughput {
    pub fn new(bytes: u64, elapsed: Duration, intervals: &RunningStats) -> Self {
        let secs = elapsed.as_secs_f64();
        let bytes_per_second = if secs > 0.0 { bytes as f64 / secs } else { 0.0 };
        Self {
            bytes_per_second,
            stddev_bytes_per_second: intervals.std_dev(),
            coefficient_of_variation: intervals.coefficient_of_variation(),
            samples: intervals.count(),
        }
    }
}

#[inline]
fn nanos_to_micros(nanos: f64) -> f64 {
    nanos / 1_000.0
}

/// Operations per second with whole-second division
///
/// Runs shorter than one second report 0.
pub fn iops(operations: u64, elapsed: Duration) -> u64 {
    match elapsed.as_secs() {
        0 => 0,
        secs => operations / secs,
    }
}
