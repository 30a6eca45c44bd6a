use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::Deserialize;
use tinybench_core::{
    marker::Delimiters,
    report::ReportFormat,
    runtime::{OutputMode, ScriptRuntime},
    sampler::SamplerConfig,
};

pub(crate) const CONFIG_FILE_NAME: &str = "tinybench.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum FormatCli {
    #[default]
    Table,
    Json,
    Yaml,
}

impl From<FormatCli> for ReportFormat {
    fn from(value: FormatCli) -> Self {
        match value {
            FormatCli::Table => ReportFormat::Table,
            FormatCli::Json => ReportFormat::Json,
            FormatCli::Yaml => ReportFormat::Yaml,
        }
    }
}

/// Flags shared by every command. Unset flags fall back to the config file,
/// then to built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RunOptions {
    /// How long to sample each benchmark, in milliseconds (default 10000)
    #[arg(long, global = true, value_name = "MS")]
    pub(crate) duration_ms: Option<u64>,

    /// Run at least this many samples per benchmark
    #[arg(long, global = true, value_name = "N")]
    pub(crate) min_samples: Option<usize>,

    /// Stop after this many samples even if time remains
    #[arg(long, global = true, value_name = "N")]
    pub(crate) max_samples: Option<usize>,

    /// Interpreter used to run script benchmarks (default `node`)
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub(crate) runtime: Option<String>,

    /// Argument passed to the interpreter before the code; repeatable (default `-e`)
    #[arg(long = "runtime-arg", global = true, value_name = "ARG", allow_hyphen_values = true)]
    pub(crate) runtime_args: Vec<String>,

    /// Line that opens a benchmark region
    #[arg(long, global = true, value_name = "TEXT")]
    pub(crate) start_marker: Option<String>,

    /// Line that closes a benchmark region
    #[arg(long, global = true, value_name = "TEXT")]
    pub(crate) stop_marker: Option<String>,

    /// Discard the interpreter's stdout/stderr
    #[arg(long, global = true)]
    pub(crate) quiet: bool,

    /// Do not clear the terminal before running
    #[arg(long, global = true)]
    pub(crate) no_clear: bool,

    /// Output format of the results
    #[arg(long, global = true, value_enum, default_value_t = FormatCli::Table)]
    pub(crate) format: FormatCli,

    /// Read settings from this TOML file instead of `tinybench.toml`
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) duration_ms: Option<u64>,
    pub(crate) min_samples: Option<usize>,
    pub(crate) max_samples: Option<usize>,
    pub(crate) quiet_runtime: Option<bool>,
    pub(crate) runtime: RuntimeSection,
    pub(crate) markers: MarkerSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct RuntimeSection {
    pub(crate) program: Option<String>,
    pub(crate) args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct MarkerSection {
    pub(crate) start: Option<String>,
    pub(crate) stop: Option<String>,
}

pub(crate) fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Invalid config '{}'", path.display()))
}

/// An explicit `--config` must exist; otherwise `tinybench.toml` next to the
/// benchmarked file is used when present.
pub(crate) fn discover_file_config(explicit: Option<&Path>, script: Option<&Path>) -> anyhow::Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return load_file_config(path).map(Some);
    }

    let Some(dir) = script.and_then(Path::parent) else {
        return Ok(None);
    };
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "using config file next to script");
        return load_file_config(&candidate).map(Some);
    }
    Ok(None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) sampler: SamplerConfig,
    pub(crate) runtime: ScriptRuntime,
    pub(crate) delimiters: Delimiters,
    pub(crate) output: OutputMode,
    pub(crate) format: ReportFormat,
    pub(crate) clear_screen: bool,
}

impl Settings {
    pub(crate) fn resolve(options: &RunOptions, file: Option<FileConfig>) -> anyhow::Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = SamplerConfig::default();

        let sampler = SamplerConfig {
            duration: options
                .duration_ms
                .or(file.duration_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.duration),
            min_samples: options.min_samples.or(file.min_samples).unwrap_or(defaults.min_samples),
            max_samples: options.max_samples.or(file.max_samples).or(defaults.max_samples),
        };
        sampler.validate()?;

        let default_runtime = ScriptRuntime::default();
        let program = options
            .runtime
            .clone()
            .or(file.runtime.program)
            .unwrap_or(default_runtime.program);
        let args = if options.runtime_args.is_empty() {
            file.runtime.args.unwrap_or(default_runtime.args)
        } else {
            options.runtime_args.clone()
        };

        let default_markers = Delimiters::default();
        let delimiters = Delimiters::new(
            options
                .start_marker
                .clone()
                .or(file.markers.start)
                .unwrap_or(default_markers.start),
            options
                .stop_marker
                .clone()
                .or(file.markers.stop)
                .unwrap_or(default_markers.stop),
        );
        delimiters.validate()?;

        let quiet = options.quiet || file.quiet_runtime.unwrap_or(false);
        let format: ReportFormat = options.format.into();
        let output = if quiet {
            OutputMode::Discard
        } else if format == ReportFormat::Table {
            OutputMode::Inherit
        } else {
            OutputMode::Stderr
        };

        Ok(Self {
            sampler,
            runtime: ScriptRuntime::new(program, args),
            delimiters,
            output,
            format,
            clear_screen: !options.no_clear,
        })
    }
}
