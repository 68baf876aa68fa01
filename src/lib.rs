//! diskpulse - Raw storage benchmark
//!
//! diskpulse drives timed sequential and random read/write workloads against a
//! single file and reports throughput, IOPS and a latency distribution.
//!
//! # Architecture
//!
//! - **Storage access layer**: one backend per operating system behind the
//!   `StorageHandle` trait (cache-bypassing, cached and synchronous modes)
//! - **Pattern generator**: seeded payload buffers and bounded offset sequences
//! - **Statistics**: reservoir-sampled percentiles with exact aggregates, Welford variance
//! - **Executor**: the timed loop for one pattern, producing a `BenchmarkResult`
//! - **Suite**: pre-flight checks, fixture preparation and pattern sequencing

pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod pattern;
pub mod preflight;
pub mod stats;
pub mod storage;
pub mod suite;
pub mod util;

// Re-export commonly used types
pub use config::{BenchmarkConfig, IoMode, PatternType};
pub use error::BenchError;
pub use executor::{BenchmarkExecutor, BenchmarkResult};
pub use storage::StorageHandle;

/// Result type used throughout diskpulse
pub type Result<T> = std::result::Result<T, BenchError>;
