//! Human-readable text output
//!
//! Plain ASCII only: no color, no box drawing, no cursor movement.

use crate::config::PatternType;
use crate::executor::{BenchmarkResult, ProgressUpdate};
use crate::suite::SuiteReport;
use std::fmt::Write;

const RULE: &str = "-------------------------------------------------------------------------------------------------------";

/// Render a suite report as a results table
pub fn render(report: &SuiteReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "diskpulse results");
    let _ = writeln!(out, "  Target:     {} ({})", report.target.display(), report.platform);
    let _ = writeln!(out, "  Mode:       {}", report.io_mode);
    let _ = writeln!(out, "  File size:  {}", format_bytes(report.file_size));
    let _ = writeln!(out, "  Block size: {}", format_bytes(report.block_size));
    let _ = writeln!(out, "  Duration:   {:.3}s per pattern", report.duration_secs);
    let _ = writeln!(out);

    if !report.results.is_empty() {
        let _ = writeln!(
            out,
            "{:<11} {:>13} {:>13} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Pattern", "Ops", "Throughput", "IOPS", "Min", "Avg", "p50", "p95", "p99", "Max"
        );
        let _ = writeln!(out, "{}", RULE);
        for result in &report.results {
            let _ = writeln!(out, "{}", render_row(result));
        }
        let _ = writeln!(out, "{}", RULE);
    }

    if let Some(failure) = &report.failure {
        let _ = writeln!(out, "FAILED {}: {}", failure.pattern.label(), failure.error);
    }

    if !report.skipped.is_empty() {
        let names: Vec<&str> = report.skipped.iter().map(|p| p.label()).collect();
        let _ = writeln!(out, "Skipped: {}", names.join(", "));
    }

    if !report.cleaned_up {
        let _ = writeln!(out, "Benchmark file left at {}", report.target.display());
    }

    out
}

fn render_row(result: &BenchmarkResult) -> String {
    format!(
        "{:<11} {:>13} {:>13} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        result.pattern.label(),
        format_number(result.operations),
        format_throughput(result.throughput.bytes_per_second),
        format_rate(result.iops as f64),
        format_latency_us(result.latency.min_us),
        format_latency_us(result.latency.avg_us),
        format_latency_us(result.latency.p50_us),
        format_latency_us(result.latency.p95_us),
        format_latency_us(result.latency.p99_us),
        format_latency_us(result.latency.max_us),
    )
}

/// One-line progress report, suitable for stderr
pub fn render_progress(pattern: PatternType, update: &ProgressUpdate) -> String {
    format!(
        "{:<11} {:>5.1}% {:>7.1}s/{:.1}s  {}",
        pattern.label(),
        update.fraction() * 100.0,
        update.elapsed.as_secs_f64(),
        update.total.as_secs_f64(),
        format_throughput(update.throughput_bps)
    )
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

/// Format bytes with binary units
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_throughput(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes_per_sec >= GB {
        format!("{:.2} GB/s", bytes_per_sec / GB)
    } else if bytes_per_sec >= MB {
        format!("{:.2} MB/s", bytes_per_sec / MB)
    } else if bytes_per_sec >= KB {
        format!("{:.2} KB/s", bytes_per_sec / KB)
    } else {
        format!("{:.0} B/s", bytes_per_sec)
    }
}

/// Format an operation rate with K/M/G suffixes
pub fn format_rate(rate: f64) -> String {
    if rate < 1_000.0 {
        format!("{:.0}", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.2}K", rate / 1_000.0)
    } else if rate < 1_000_000_000.0 {
        format!("{:.2}M", rate / 1_000_000.0)
    } else {
        format!("{:.2}G", rate / 1_000_000_000.0)
    }
}

/// Format a latency given in microseconds
pub fn format_latency_us(us: f64) -> String {
    if us < 1_000.0 {
        format!("{:.1}us", us)
    } else if us < 1_000_000.0 {
        format!("{:.2}ms", us / 1_000.0)
    } else {
        format!("{:.3}s", us / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IoMode;
    use crate::executor::{LatencyDistribution, Throughput};
    use crate::stats::RunningStats;
    use crate::suite::PatternFailure;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sample_result(pattern: PatternType) -> BenchmarkResult {
        BenchmarkResult {
            pattern,
            io_mode: IoMode::Cached,
            block_size: 4096,
            operations: 1_234_567,
            bytes: 1_234_567 * 4096,
            duration_ms: 5000,
            iops: 246_913,
            throughput: Throughput::new(1_234_567 * 4096, Duration::from_secs(5), &RunningStats::new()),
            latency: LatencyDistribution {
                min_us: 1.0,
                avg_us: 3.9,
                p50_us: 3.5,
                p95_us: 8.0,
                p99_us: 1_500.0,
                max_us: 2_500_000.0,
            },
        }
    }

    fn sample_report() -> SuiteReport {
        SuiteReport {
            target: PathBuf::from("/data/diskpulse.bench"),
            platform: "linux".to_string(),
            io_mode: IoMode::Cached,
            file_size: 1024 * 1024 * 1024,
            block_size: 4096,
            duration_secs: 5.0,
            results: vec![sample_result(PatternType::SequentialWrite)],
            failure: Some(PatternFailure {
                pattern: PatternType::SequentialRead,
                error: "read failed".to_string(),
            }),
            skipped: vec![PatternType::RandomWrite, PatternType::RandomRead],
            cleaned_up: true,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(4096), "4.00 KB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_format_throughput_and_rate() {
        assert_eq!(format_throughput(512.0), "512 B/s");
        assert_eq!(format_throughput(100.0 * 1024.0 * 1024.0), "100.00 MB/s");
        assert_eq!(format_rate(999.0), "999");
        assert_eq!(format_rate(246_913.0), "246.91K");
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency_us(3.94), "3.9us");
        assert_eq!(format_latency_us(1_500.0), "1.50ms");
        assert_eq!(format_latency_us(2_500_000.0), "2.500s");
    }

    #[test]
    fn test_render_report() {
        let text = render(&sample_report());
        assert!(text.contains("/data/diskpulse.bench (linux)"));
        assert!(text.contains("1.00 GB"));
        assert!(text.contains("seq-write"));
        assert!(text.contains("1,234,567"));
        assert!(text.contains("Min"));
        assert!(text.contains("p50"));
        assert!(text.contains("FAILED seq-read: read failed"));
        assert!(text.contains("Skipped: rand-write, rand-read"));
        assert!(!text.contains("left at"));
        assert!(text.is_ascii());
    }

    #[test]
    fn test_render_progress() {
        let update = ProgressUpdate {
            elapsed: Duration::from_millis(2500),
            total: Duration::from_secs(5),
            throughput_bps: 2048.0,
        };
        let line = render_progress(PatternType::RandomRead, &update);
        assert!(line.starts_with("rand-read"));
        assert!(line.contains("50.0%"));
        assert!(line.contains("2.00 KB/s"));
    }
}
