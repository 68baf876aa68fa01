//! Statistics collection
//!
//! Bounded-memory latency statistics for a single pattern run.
//!
//! - **LatencyRecorder**: exact count/sum/min/max plus a uniform reservoir
//!   sample used only for percentiles
//! - **percentile**: nearest-rank percentile over a sorted sample
//! - **RunningStats**: Welford online mean/variance, used for the variability
//!   of throughput samples taken during a run
//!
//! # Example
//!
//! ```
//! use diskpulse::stats::LatencyRecorder;
//! use std::time::Duration;
//!
//! let mut recorder = LatencyRecorder::new(1000);
//! recorder.record(Duration::from_micros(100));
//! recorder.record(Duration::from_micros(300));
//!
//! let stats = recorder.calculate();
//! assert_eq!(stats.count, 2);
//! assert_eq!(stats.avg_nanos, 200_000.0);
//! ```

pub mod recorder;
pub mod welford;

pub use recorder::{LatencyRecorder, LatencyStats};
pub use welford::RunningStats;

/// Nearest-rank percentile of an ascending slice
///
/// `p` is a fraction in `[0, 1]`. The rank is `ceil(n * p)` clamped to
/// `[1, n]`, so `p <= 0` yields the minimum and `p >= 1` the maximum. An empty
/// slice yields 0.
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    let n = sorted.len();
    if n == 0 {
        return 0;
    }
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[n - 1];
    }

    let rank = (n as f64 * p).ceil() as usize;
    let rank = rank.clamp(1, n);
    sorted[rank - 1]
}
