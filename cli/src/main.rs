use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Once};

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "tinybench_core=info,tinybench=info";

use anyhow::Context;
use clap::{Parser, Subcommand};
use tinybench_core::{
    fixture::{DEFAULT_FIXTURE_LEN, DEFAULT_FIXTURE_SEED, Fixture},
    marker::parse_source,
    perf::scenarios::prepare_loop_scenarios,
    report::{CaseResult, Report},
    runtime::BenchTarget,
    sampler::Sampler,
    stats::{self, Summary},
};

mod config;
mod console;

use config::{RunOptions, Settings, discover_file_config};
use console::Console;

#[derive(Debug, Parser)]
#[command(
    name = "tinybench",
    author,
    version,
    about = "Benchmark delimited regions of a script",
    long_about = None,
    after_help = "Wrap each region to time in `// tinybench start` and `// tinybench stop` lines."
)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script whose marked regions are benchmarked
    #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
    file: Option<PathBuf>,

    #[command(flatten)]
    options: RunOptions,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare index-based and element-based loops over an in-memory array.
    Loops {
        /// Number of values in the shared array
        #[arg(long, default_value_t = DEFAULT_FIXTURE_LEN)]
        len: usize,
        /// Seed for generating the array
        #[arg(long, default_value_t = DEFAULT_FIXTURE_SEED)]
        seed: u64,
    },
}

fn read_file_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path.display(), e))
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("TINYBENCH_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn measure_case(
    sampler: &Sampler,
    target: &mut dyn BenchTarget,
    index: usize,
    console: &mut Console,
) -> anyhow::Result<Summary> {
    console.executing(index)?;
    let samples = sampler.measure(target, &mut |progress| console.progress(progress))?;
    console.done()?;

    let summary = samples
        .summarize()
        .with_context(|| format!("benchmark '{}' produced no samples", target.label()))?;
    tracing::info!(
        case = %target.label(),
        iterations = summary.iterations,
        median_us = stats::saturating_u64(summary.median.as_micros()),
        "benchmark complete"
    );
    Ok(summary)
}

fn run_script(path: &Path, settings: &Settings, console: &mut Console) -> anyhow::Result<()> {
    let source = read_file_content(path)?;
    let parsed = parse_source(&source, &settings.delimiters)?;
    let runtime = settings.runtime.resolve()?;
    let sampler = Sampler::new(settings.sampler);

    let mut report = Report::new(Some(path.display().to_string()));
    for case in &parsed.cases {
        console.announce_case(case.index, &case.body)?;
        let mut target = runtime.case(case.name(), parsed.script_for(case), settings.output);
        let summary = measure_case(&sampler, &mut target, case.index, console)?;
        report.push(CaseResult {
            index: case.index,
            label: case.label.clone(),
            summary,
        });
    }

    console.results(&report)
}

fn run_loops(len: usize, seed: u64, settings: &Settings, console: &mut Console) -> anyhow::Result<()> {
    console.line(&format!("\n Preparing {len} random values (seed {seed})"))?;
    let fixture = Arc::new(Fixture::random(len, seed));
    let sampler = Sampler::new(settings.sampler);

    let mut report = Report::new(None);
    for (pos, mut scenario) in prepare_loop_scenarios(fixture).into_iter().enumerate() {
        let index = pos + 1;
        console.announce_builtin(index, scenario.title())?;
        let summary = measure_case(&sampler, &mut scenario, index, console)?;
        report.push(CaseResult {
            index,
            label: Some(scenario.key().to_string()),
            summary,
        });
    }

    console.results(&report)
}

/// Resolve settings, then greet on the console they describe.
fn prepare(options: &RunOptions, script: Option<&Path>) -> anyhow::Result<(Settings, Console)> {
    let file_config = discover_file_config(options.config.as_deref(), script)?;
    let settings = Settings::resolve(options, file_config)?;
    let mut console = Console::new(settings.format);
    console.welcome(settings.clear_screen)?;
    Ok((settings, console))
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let CliArgs { command, file, options } = args;

    match command {
        Some(Commands::Loops { len, seed }) => {
            let (settings, mut console) = prepare(&options, None)?;
            run_loops(len, seed, &settings, &mut console)
        }
        None => {
            let file = file.ok_or_else(|| anyhow::anyhow!("Please provide a path to a valid script file."))?;
            let path = std::path::absolute(&file).with_context(|| format!("Failed to resolve '{}'", file.display()))?;
            let (settings, mut console) = prepare(&options, Some(&path))?;
            run_script(&path, &settings, &mut console)
        }
    }
}

fn main() -> ExitCode {
    maybe_init_tracing();

    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(" Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
