use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Once;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use clap::error::ErrorKind;
use rand::SeedableRng;
use rand::rngs::StdRng;
use upcase_core::bench::Stage;
use upcase_core::report::{write_outcome, write_prefix};
use upcase_core::{BenchConfig, SuiteReport, Transform, Variant, run_suite};


static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "upcase::bench=debug,upcase_bench=info";
const TRACE_ENV: &str = "UPCASE_TRACE";

/// Exit status when `--strict` is set and a variant produced wrong output.
const EXIT_MISMATCH: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "upcase-bench",
    author,
    version,
    about = "Benchmark naive, branchless and std ASCII uppercase conversion",
    long_about = None,
    allow_negative_numbers = true
)]
struct CliArgs {
    /// Number of test rounds
    #[arg(value_name = "N")]
    rounds: String,

    /// Length of test string
    #[arg(value_name = "L")]
    length: String,

    /// Seed for the random string generator (defaults to the current time in seconds)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only run the given variant(s); order is always naive, branchless, c std
    #[arg(long = "only", value_name = "VARIANT", value_parser = parse_variant)]
    only: Vec<Variant>,

    /// Exit with status 2 when any variant produces wrong output
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_variant(raw: &str) -> Result<Variant, String> {
    raw.parse::<Variant>().map_err(|e| e.to_string())
}

/// Read an unsigned base-10 count; anything unparsable reads as zero.
pub(crate) fn parse_count<T>(raw: &str) -> T
where
    T: std::str::FromStr + Default,
{
    raw.trim_start().parse::<T>().unwrap_or_default()
}

pub(crate) fn usage_text(argv0: &str) -> String {
    format!(
        concat!(
            "\nUsage: {0} N L\n",
            "    N = number of test rounds\n",
            "    L = length of test string\n",
            "\nExample: {0} 500 1000000\n",
        ),
        argv0
    )
}

fn print_usage() {
    let argv0 = std::env::args().next().unwrap_or_else(|| "upcase-bench".to_string());
    print!("{}", usage_text(&argv0));
    let _ = io::stdout().flush();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TraceSetting {
    Off,
    /// Truthy toggle: use `RUST_LOG`, then the built-in filter.
    Default,
    Filter(String),
}

impl TraceSetting {
    fn from_env_value(raw: &str) -> Self {
        match raw.trim() {
            "" => TraceSetting::Off,
            v if ["0", "false", "off"].iter().any(|k| v.eq_ignore_ascii_case(k)) => TraceSetting::Off,
            v if ["1", "true", "on"].iter().any(|k| v.eq_ignore_ascii_case(k)) => TraceSetting::Default,
            v => TraceSetting::Filter(v.to_string()),
        }
    }
}

fn maybe_init_tracing() {
    let Ok(raw) = std::env::var(TRACE_ENV) else {
        return;
    };

    let filter_expr = match TraceSetting::from_env_value(&raw) {
        TraceSetting::Off => return,
        TraceSetting::Default => std::env::var("RUST_LOG").ok(),
        TraceSetting::Filter(expr) => Some(expr),
    };

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let builder = fmt().with_writer(std::io::stderr);
        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

/// Variants to run, in the fixed invocation order.
fn selected_variants(only: &[Variant]) -> Vec<Variant> {
    Variant::ALL
        .into_iter()
        .filter(|v| only.is_empty() || only.contains(v))
        .collect()
}

fn wall_clock_seed() -> u64 {
    // Second granularity: two runs inside the same second share a stream.
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Run the suite and return whether any variant disagreed with the reference.
fn run(args: &CliArgs, config: &BenchConfig) -> anyhow::Result<bool> {
    let seed = args.seed.unwrap_or_else(wall_clock_seed);
    tracing::info!(seed, rounds = config.rounds(), length = config.length(), "seeded generator");
    let mut rng = StdRng::seed_from_u64(seed);
    let variants = selected_variants(&args.only);
    let mut report = SuiteReport::new(seed, config, chrono::Utc::now());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let format = args.format;
    run_suite(&variants, config, &mut rng, |stage| {
        match stage {
            Stage::Started(variant) => {
                if format == OutputFormat::Text {
                    write_prefix(&mut out, variant.label()).context("write to stdout")?;
                }
            }
            Stage::Finished(variant, outcome) => {
                if format == OutputFormat::Text {
                    write_outcome(&mut out, &outcome).context("write to stdout")?;
                }
                report.record(variant.label(), &outcome);
            }
        }
        Ok(())
    })?;

    if format == OutputFormat::Json {
        writeln!(out, "{}", report.to_json()?).context("write to stdout")?;
    }
    out.flush().context("flush stdout")?;
    Ok(report.has_mismatch())
}

/// Wrong output only affects the exit status under `--strict`.
pub(crate) fn exit_status(strict: bool, mismatch: bool) -> u8 {
    if strict && mismatch { EXIT_MISMATCH } else { 0 }
}

fn main() -> ExitCode {
    maybe_init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            tracing::debug!(error = %err, "argument parsing failed");
            eprintln!("Invalid invocation.");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let config = match BenchConfig::new(parse_count(&args.rounds), parse_count(&args.length)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &config) {
        Ok(mismatch) => ExitCode::from(exit_status(args.strict, mismatch)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
