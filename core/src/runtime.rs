//! Execution of benchmark cases.
//!
//! Anything the sampler can time implements [`BenchTarget`]. Script cases are
//! run by an external interpreter process, one process per sample.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

pub const DEFAULT_RUNTIME_PROGRAM: &str = "node";
pub const DEFAULT_RUNTIME_ARGS: &[&str] = &["-e"];

/// A unit of work timed once per sample.
pub trait BenchTarget {
    fn label(&self) -> &str;

    fn run_once(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub enum RuntimeError {
    NotFound { program: String },
    Spawn { program: String, source: std::io::Error },
    Failed { program: String, status: ExitStatus },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NotFound { program } => {
                write!(f, "{program} not found. Please install {program} and try again.")
            }
            RuntimeError::Spawn { program, source } => write!(f, "failed to start {program}: {source}"),
            RuntimeError::Failed { program, status } => write!(f, "{program} exited with {status}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Interpreter used to run script cases: `program args... <script>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRuntime {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNTIME_PROGRAM.to_string(),
            args: DEFAULT_RUNTIME_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScriptRuntime {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate the interpreter on `PATH` (or accept it as an explicit path).
    pub fn resolve(&self) -> Result<ResolvedRuntime, RuntimeError> {
        let path = which::which(&self.program).map_err(|_| RuntimeError::NotFound {
            program: self.program.clone(),
        })?;
        tracing::debug!(program = %self.program, path = %path.display(), "resolved script runtime");
        Ok(ResolvedRuntime {
            program: self.program.clone(),
            path,
            args: self.args.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Script stdout/stderr go to the terminal.
    #[default]
    Inherit,
    /// Script stdout is sent to stderr, keeping stdout free for reports.
    Stderr,
    Discard,
}

#[derive(Debug, Clone)]
pub struct ResolvedRuntime {
    program: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ResolvedRuntime {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn command_for(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args).arg(script).stdin(Stdio::null());
        cmd
    }

    pub fn case(&self, label: impl Into<String>, script: String, output: OutputMode) -> ScriptCase {
        ScriptCase {
            runtime: self.clone(),
            label: label.into(),
            script,
            output,
        }
    }
}

/// One delimited region, ready to be executed as a full program.
#[derive(Debug, Clone)]
pub struct ScriptCase {
    runtime: ResolvedRuntime,
    label: String,
    script: String,
    output: OutputMode,
}

impl ScriptCase {
    pub fn script(&self) -> &str {
        &self.script
    }
}

impl BenchTarget for ScriptCase {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> anyhow::Result<()> {
        let mut cmd = self.runtime.command_for(&self.script);
        match self.output {
            OutputMode::Inherit => {}
            OutputMode::Stderr => {
                cmd.stdout(Stdio::from(std::io::stderr()));
            }
            OutputMode::Discard => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        let status = cmd.status().map_err(|source| RuntimeError::Spawn {
            program: self.runtime.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(RuntimeError::Failed {
                program: self.runtime.program.clone(),
                status,
            }
            .into());
        }
        Ok(())
    }
}
