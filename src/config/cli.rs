//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// IO mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Use the OS page cache
    Cached,
    /// Bypass the page cache (O_DIRECT / F_NOCACHE / FILE_FLAG_NO_BUFFERING)
    Direct,
    /// Durable writes (O_SYNC / F_FULLFSYNC / FILE_FLAG_WRITE_THROUGH)
    Sync,
}

/// Access pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    SeqRead,
    SeqWrite,
    RandRead,
    RandWrite,
}

/// Payload content
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Fill {
    Zero,
    Ones,
    Random,
    Sequential,
    Compressible,
}

/// diskpulse - Raw storage benchmark
#[derive(Parser, Debug)]
#[command(name = "diskpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Benchmark file to create (defaults to ./diskpulse.bench)
    #[arg(value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long, env = "DISKPULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Size of the benchmark file (e.g., 1G, 256M)
    #[arg(short = 's', long)]
    pub file_size: Option<String>,

    /// Block size for IO operations (e.g., 4k, 1M, 64k)
    #[arg(short = 'b', long)]
    pub block_size: Option<String>,

    /// Duration of each pattern (e.g., 5s, 500ms, 1m)
    #[arg(short = 'd', long)]
    pub duration: Option<String>,

    /// IO mode
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<Mode>,

    /// Patterns to run (comma-separated; default: all four)
    #[arg(short = 'p', long, value_enum, value_delimiter = ',')]
    pub patterns: Vec<Pattern>,

    /// Payload content written by write patterns
    #[arg(long, value_enum)]
    pub fill: Option<Fill>,

    /// Seed for payload and offset generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Queue depth (accepted for compatibility, has no effect)
    #[arg(short = 'q', long)]
    pub queue_depth: Option<usize>,

    /// Number of latency samples kept for percentiles
    #[arg(long, value_name = "SAMPLES")]
    pub reservoir: Option<usize>,

    /// Overwrite an existing file at PATH
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Keep the benchmark file after the run
    #[arg(long)]
    pub keep: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not print progress lines to stderr
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
