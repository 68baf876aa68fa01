//! CLI to Config conversion utilities

use crate::config::cli::{self, Cli};
use crate::config::{FillScheme, IoMode, OutputFormat, PatternType, SuiteConfig};
use anyhow::{Context, Result};
use std::time::Duration;

/// Parse a size string (e.g., "1G", "100M", "4k") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if let Some(n) = strip_unit(&s, &["kib", "kb", "k"]) {
        (n, 1024u64)
    } else if let Some(n) = strip_unit(&s, &["mib", "mb", "m"]) {
        (n, 1024 * 1024)
    } else if let Some(n) = strip_unit(&s, &["gib", "gb", "g"]) {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = strip_unit(&s, &["tib", "tb", "t"]) {
        (n, 1024 * 1024 * 1024 * 1024)
    } else {
        (s.trim_end_matches('b'), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Parse a duration string (e.g., "60s", "500ms", "5m", "1h")
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    // Order matters: "ms" before "m" and "s"
    let (num_str, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1u64)
    } else if let Some(n) = strip_unit(&s, &["sec", "s"]) {
        (n, 1000)
    } else if let Some(n) = strip_unit(&s, &["min", "m"]) {
        (n, 60_000)
    } else if let Some(n) = strip_unit(&s, &["hr", "h"]) {
        (n, 3_600_000)
    } else {
        (s.as_str(), 1000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    let millis = num
        .checked_mul(unit_ms)
        .with_context(|| format!("Duration out of range: {}", s))?;

    Ok(Duration::from_millis(millis))
}

fn strip_unit<'a>(s: &'a str, units: &[&str]) -> Option<&'a str> {
    units.iter().find_map(|unit| s.strip_suffix(unit))
}

pub fn convert_mode(mode: cli::Mode) -> IoMode {
    match mode {
        cli::Mode::Cached => IoMode::Cached,
        cli::Mode::Direct => IoMode::Direct,
        cli::Mode::Sync => IoMode::Synchronous,
    }
}

pub fn convert_pattern(pattern: cli::Pattern) -> PatternType {
    match pattern {
        cli::Pattern::SeqRead => PatternType::SequentialRead,
        cli::Pattern::SeqWrite => PatternType::SequentialWrite,
        cli::Pattern::RandRead => PatternType::RandomRead,
        cli::Pattern::RandWrite => PatternType::RandomWrite,
    }
}

pub fn convert_fill(fill: cli::Fill) -> FillScheme {
    match fill {
        cli::Fill::Zero => FillScheme::Zero,
        cli::Fill::Ones => FillScheme::Ones,
        cli::Fill::Random => FillScheme::Random,
        cli::Fill::Sequential => FillScheme::Sequential,
        cli::Fill::Compressible => FillScheme::Compressible,
    }
}

/// Apply every flag the user actually passed on top of `config`
pub fn apply_cli(cli: &Cli, mut config: SuiteConfig) -> Result<SuiteConfig> {
    if let Some(target) = &cli.target {
        config.path = target.clone();
    }
    if let Some(size) = &cli.file_size {
        config.file_size = parse_size(size).context("Invalid --file-size")?;
    }
    if let Some(size) = &cli.block_size {
        config.block_size = parse_size(size).context("Invalid --block-size")?;
    }
    if let Some(duration) = &cli.duration {
        config.duration = parse_duration(duration).context("Invalid --duration")?;
    }
    if let Some(mode) = cli.mode {
        config.io_mode = convert_mode(mode);
    }
    if !cli.patterns.is_empty() {
        config.patterns = cli.patterns.iter().copied().map(convert_pattern).collect();
    }
    if let Some(fill) = cli.fill {
        config.fill_scheme = convert_fill(fill);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(qd) = cli.queue_depth {
        config.queue_depth = qd;
    }
    if let Some(samples) = cli.reservoir {
        config.reservoir_capacity = samples;
    }
    if cli.force {
        config.force = true;
    }
    if cli.keep {
        config.keep_file = true;
    }
    if cli.json {
        config.output = OutputFormat::Json;
    }
    Ok(config)
}
