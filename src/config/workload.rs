//! Workload definition enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the target file is opened
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IoMode {
    /// Go through the OS page/buffer cache
    #[default]
    Cached,
    /// Bypass the OS cache; buffers, offsets and lengths must be aligned
    Direct,
    /// Every write is durable when the call returns
    #[serde(alias = "sync")]
    Synchronous,
}

impl fmt::Display for IoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoMode::Cached => write!(f, "cached"),
            IoMode::Direct => write!(f, "direct"),
            IoMode::Synchronous => write!(f, "sync"),
        }
    }
}

/// The four access patterns a run can execute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    SequentialRead,
    SequentialWrite,
    RandomRead,
    RandomWrite,
}

impl PatternType {
    /// All patterns, in the order a suite runs them by default
    pub const ALL: [PatternType; 4] = [
        PatternType::SequentialWrite,
        PatternType::SequentialRead,
        PatternType::RandomWrite,
        PatternType::RandomRead,
    ];

    pub fn is_write(self) -> bool {
        matches!(self, PatternType::SequentialWrite | PatternType::RandomWrite)
    }

    pub fn is_random(self) -> bool {
        matches!(self, PatternType::RandomRead | PatternType::RandomWrite)
    }

    /// Short label used in reports
    pub fn label(self) -> &'static str {
        match self {
            PatternType::SequentialRead => "seq-read",
            PatternType::SequentialWrite => "seq-write",
            PatternType::RandomRead => "rand-read",
            PatternType::RandomWrite => "rand-write",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Content written into payload buffers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillScheme {
    /// All zeros
    Zero,
    /// All ones (0xFF)
    Ones,
    /// Seeded pseudorandom bytes (incompressible)
    #[default]
    Random,
    /// Sequential bytes (0x00, 0x01, ..., 0xFF, 0x00, ...)
    Sequential,
    /// Half zeros, half pseudorandom bytes (roughly 2:1 compressible)
    Compressible,
}

impl fmt::Display for FillScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillScheme::Zero => write!(f, "zero"),
            FillScheme::Ones => write!(f, "ones"),
            FillScheme::Random => write!(f, "random"),
            FillScheme::Sequential => write!(f, "sequential"),
            FillScheme::Compressible => write!(f, "compressible"),
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_classification() {
        assert!(PatternType::SequentialWrite.is_write());
        assert!(PatternType::RandomWrite.is_write());
        assert!(!PatternType::RandomRead.is_write());
        assert!(PatternType::RandomRead.is_random());
        assert!(!PatternType::SequentialRead.is_random());
    }

    #[test]
    fn test_io_mode_accepts_sync_alias() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: IoMode,
        }
        let w: Wrapper = ::toml::from_str("mode = \"sync\"").unwrap();
        assert_eq!(w.mode, IoMode::Synchronous);
        let w: Wrapper = ::toml::from_str("mode = \"direct\"").unwrap();
        assert_eq!(w.mode, IoMode::Direct);
    }

    #[test]
    fn test_pattern_labels() {
        assert_eq!(PatternType::SequentialRead.to_string(), "seq-read");
        assert_eq!(PatternType::RandomWrite.to_string(), "rand-write");
        assert_eq!(PatternType::ALL.len(), 4);
    }
}
