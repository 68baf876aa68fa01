//! Reservoir-sampled latency recorder
//!
//! Keeps exact aggregates (count, sum, min, max) for every observation and a
//! fixed-size uniform sample for percentiles. Memory is bounded by the
//! reservoir capacity no matter how many operations a run performs.
//!
//! Sampling follows Vitter's Algorithm R: once the reservoir is full, the
//! n-th observation replaces a random slot with probability K/n, where n is the
//! running observation count. After N > K observations every value has
//! probability K/N of being in the reservoir.

use super::percentile;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seed for the replacement RNG when none is given
const DEFAULT_SAMPLING_SEED: u64 = 0x5EED_1A7E_0C1E_5A11;

/// Latency tracker with exact aggregates and a bounded sample
#[derive(Debug, Clone)]
pub struct LatencyRecorder {
    count: u64,
    sum_nanos: u128,
    min_nanos: u64,
    max_nanos: u64,
    reservoir: Vec<u64>,
    capacity: usize,
    rng: Xoshiro256PlusPlus,
}

/// Summary produced by [`LatencyRecorder::calculate`], in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Number of recorded observations
    pub count: u64,
    pub min_nanos: u64,
    /// Exact mean of every observation
    pub avg_nanos: f64,
    pub p50_nanos: u64,
    pub p95_nanos: u64,
    pub p99_nanos: u64,
    pub max_nanos: u64,
}

impl LatencyRecorder {
    /// Create a recorder whose reservoir holds at most `capacity` samples
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, DEFAULT_SAMPLING_SEED)
    }

    /// Create a recorder with a specific seed for slot replacement
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            count: 0,
            sum_nanos: 0,
            min_nanos: u64::MAX,
            max_nanos: 0,
            // Grows on demand; short runs never pay for the full reservoir
            reservoir: Vec::with_capacity(capacity.min(1024)),
            capacity,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Record one latency
    #[inline]
    pub fn record(&mut self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.record_nanos(nanos);
    }

    /// Record one latency given in nanoseconds
    #[inline]
    pub fn record_nanos(&mut self, nanos: u64) {
        self.count += 1;
        self.sum_nanos += u128::from(nanos);
        self.min_nanos = self.min_nanos.min(nanos);
        self.max_nanos = self.max_nanos.max(nanos);

        if self.reservoir.len() < self.capacity {
            self.reservoir.push(nanos);
        } else {
            // Replace with probability capacity / count
            let slot = self.rng.gen_range(0..self.count);
            if slot < self.capacity as u64 {
                self.reservoir[slot as usize] = nanos;
            }
        }
    }

    /// Number of observations recorded so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current number of reservoir samples (never above capacity)
    pub fn sample_len(&self) -> usize {
        self.reservoir.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current reservoir contents, unsorted
    pub fn samples(&self) -> &[u64] {
        &self.reservoir
    }

    /// Compute the summary
    ///
    /// The average always comes from the exact sum and count. Percentiles come
    /// from one sort of the reservoir. An empty recorder yields all zeros.
    pub fn calculate(&self) -> LatencyStats {
        if self.count == 0 {
            return LatencyStats {
                count: 0,
                min_nanos: 0,
                avg_nanos: 0.0,
                p50_nanos: 0,
                p95_nanos: 0,
                p99_nanos: 0,
                max_nanos: 0,
            };
        }

        let mut sorted = self.reservoir.clone();
        sorted.sort_unstable();

        LatencyStats {
            count: self.count,
            min_nanos: self.min_nanos,
            avg_nanos: self.sum_nanos as f64 / self.count as f64,
            p50_nanos: percentile(&sorted, 0.50),
            p95_nanos: percentile(&sorted, 0.95),
            p99_nanos: percentile(&sorted, 0.99),
            max_nanos: self.max_nanos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservoir_never_exceeds_capacity() {
        let mut recorder = LatencyRecorder::new(10_000);
        for i in 0..50_000u64 {
            recorder.record_nanos(i);
            assert!(recorder.sample_len() <= 10_000);
        }
        assert_eq!(recorder.sample_len(), 10_000);
        assert_eq!(recorder.count(), 50_000);
    }

    #[test]
    fn test_average_is_exact_regardless_of_capacity() {
        let values: Vec<u64> = (0..20_000u64).map(|i| (i * 7919) % 100_003).collect();
        let exact = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;

        for capacity in [1, 10, 1000, 50_000] {
            let mut recorder = LatencyRecorder::new(capacity);
            for &v in &values {
                recorder.record_nanos(v);
            }
            let stats = recorder.calculate();
            assert!(
                (stats.avg_nanos - exact).abs() < 1e-6,
                "capacity {}: avg {} != {}",
                capacity,
                stats.avg_nanos,
                exact
            );
        }
    }

    #[test]
    fn test_min_max_exact() {
        let mut recorder = LatencyRecorder::new(2);
        for v in [500, 3, 9_999, 42, 17] {
            recorder.record_nanos(v);
        }
        let stats = recorder.calculate();
        assert_eq!(stats.min_nanos, 3);
        assert_eq!(stats.max_nanos, 9_999);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_percentiles_exact_when_under_capacity() {
        let mut recorder = LatencyRecorder::new(1000);
        for v in 1..=100u64 {
            recorder.record_nanos(v);
        }
        let stats = recorder.calculate();
        assert_eq!(stats.p50_nanos, 50);
        assert_eq!(stats.p95_nanos, 95);
        assert_eq!(stats.p99_nanos, 99);
        assert!(stats.min_nanos as f64 <= stats.avg_nanos);
        assert!(stats.avg_nanos <= stats.max_nanos as f64);
    }

    #[test]
    fn test_reservoir_is_uniform_after_filling() {
        // Stream 0..N into K slots; each half of the stream should hold ~K/2 samples.
        // With count (not reservoir length) as denominator, late values are not favored.
        let k = 2_000;
        let n = 100_000u64;
        let mut recorder = LatencyRecorder::with_seed(k, 1234);
        for v in 0..n {
            recorder.record_nanos(v);
        }
        let early = recorder.samples().iter().filter(|&&v| v < n / 2).count();
        let ratio = early as f64 / k as f64;
        assert!(ratio > 0.45 && ratio < 0.55, "early-half ratio {}", ratio);
    }

    #[test]
    fn test_sampling_is_reproducible_with_seed() {
        let mut a = LatencyRecorder::with_seed(100, 5);
        let mut b = LatencyRecorder::with_seed(100, 5);
        for v in 0..10_000u64 {
            a.record_nanos(v);
            b.record_nanos(v);
        }
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_empty_recorder() {
        let recorder = LatencyRecorder::new(10);
        let stats = recorder.calculate();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_nanos, 0.0);
        assert_eq!(stats.max_nanos, 0);
    }

    #[test]
    fn test_record_duration() {
        let mut recorder = LatencyRecorder::new(10);
        recorder.record(Duration::from_micros(3));
        assert_eq!(recorder.calculate().min_nanos, 3_000);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut recorder = LatencyRecorder::new(0);
        recorder.record_nanos(1);
        recorder.record_nanos(2);
        assert_eq!(recorder.capacity(), 1);
        assert_eq!(recorder.sample_len(), 1);
    }
}
