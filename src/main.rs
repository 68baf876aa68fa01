//! diskpulse CLI entry point

use anyhow::{Context, Result};
use diskpulse::config::cli::Cli;
use diskpulse::config::{toml::load_config, OutputFormat, PatternType};
use diskpulse::output::{self, text};
use diskpulse::suite::BenchmarkSuite;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// `RUST_LOG` wins; otherwise warn, raised by each -v
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Returns whether every selected pattern completed
fn run(cli: Cli) -> Result<bool> {
    let show_progress = !cli.no_progress;
    let config = load_config(&cli).context("Failed to build configuration")?;

    let format = config.output;
    tracing::info!(
        target = %config.path.display(),
        mode = %config.io_mode,
        patterns = config.patterns.len(),
        "starting suite"
    );

    let mut last_reported: Option<(PatternType, u64)> = None;
    let report = {
        let mut suite = BenchmarkSuite::new(config);
        if show_progress {
            suite = suite.on_progress(|pattern, update| {
                // One line per pattern per whole second
                let second = update.elapsed.as_secs();
                if last_reported != Some((pattern, second)) {
                    last_reported = Some((pattern, second));
                    eprintln!("{}", text::render_progress(pattern, &update));
                }
            });
        }
        suite.run().context("Benchmark suite failed")?
    };

    let rendered = output::render(&report, format).context("Failed to render results")?;
    match format {
        OutputFormat::Text => println!("\n{}", rendered),
        OutputFormat::Json => println!("{}", rendered),
    }

    Ok(report.is_success())
}
