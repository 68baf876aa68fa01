//! Welford online mean and variance
//!
//! Single pass, numerically stable, constant memory. The executor feeds it one
//! throughput sample per progress interval to report how steady a run was.

use serde::{Deserialize, Serialize};

/// Running mean/variance accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation
    #[inline]
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all observations (0 when empty)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator); 0 with fewer than two observations
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Population variance (n denominator); 0 when empty
    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard deviation relative to the mean; 0 when the mean is 0
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev() / self.mean.abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let mut stats = RunningStats::new();
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.update(x);
        }
        assert_eq!(stats.count(), 8);
        assert!((stats.mean() - 5.0).abs() < 1e-12);
        assert!((stats.population_variance() - 4.0).abs() < 1e-12);
        assert!((stats.variance() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_single() {
        let mut stats = RunningStats::new();
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.coefficient_of_variation(), 0.0);

        stats.update(10.0);
        assert_eq!(stats.mean(), 10.0);
        assert_eq!(stats.variance(), 0.0);
    }

    #[test]
    fn test_stable_with_large_offset() {
        // Naive sum-of-squares loses all precision here
        let mut stats = RunningStats::new();
        for x in [1e9 + 4.0, 1e9 + 7.0, 1e9 + 13.0, 1e9 + 16.0] {
            stats.update(x);
        }
        assert!((stats.mean() - (1e9 + 10.0)).abs() < 1e-6);
        assert!((stats.variance() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let mut stats = RunningStats::new();
        for x in [90.0, 100.0, 110.0] {
            stats.update(x);
        }
        assert!((stats.coefficient_of_variation() - 0.1).abs() < 1e-12);
    }
}
