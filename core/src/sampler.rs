//! Time-boxed sampling of a [`BenchTarget`].
//!
//! Samples run back to back on the calling thread. Each one completes before
//! the next starts, and the deadline is only checked between samples, so a
//! single slow sample can overrun the budget.

use anyhow::{Context, Result, bail};
use std::time::{Duration, Instant};

use crate::runtime::BenchTarget;
use crate::stats::{StatsError, Summary, saturating_u64};

pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Keep sampling until this much wall time has passed.
    pub duration: Duration,
    /// Keep sampling past the deadline until at least this many samples exist.
    pub min_samples: usize,
    /// Stop as soon as this many samples exist, even before the deadline.
    pub max_samples: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            min_samples: 1,
            max_samples: None,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_samples == 0 {
            bail!("min_samples must be at least 1");
        }
        if let Some(max) = self.max_samples
            && max < self.min_samples
        {
            bail!("max_samples ({max}) must not be lower than min_samples ({})", self.min_samples);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Another whole second of the budget has elapsed.
    Tick { elapsed_secs: u64 },
    Sample { count: usize, took: Duration },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Samples {
    durations: Vec<Duration>,
    wall: Duration,
}

impl Samples {
    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Wall time spent measuring, including harness overhead between samples.
    pub fn wall(&self) -> Duration {
        self.wall
    }

    pub fn summarize(&self) -> Result<Summary, StatsError> {
        Summary::from_durations(&self.durations)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    config: SamplerConfig,
}

impl Sampler {
    pub const fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn measure(&self, target: &mut dyn BenchTarget, on_progress: &mut dyn FnMut(Progress)) -> Result<Samples> {
        self.config.validate()?;

        let span = tracing::info_span!("measure", case = %target.label());
        let _guard = span.enter();

        let start = Instant::now();
        let mut durations = Vec::new();
        let mut ticks = 0u64;

        loop {
            let elapsed = start.elapsed();
            while ticks < elapsed.as_secs() {
                ticks += 1;
                on_progress(Progress::Tick { elapsed_secs: ticks });
            }
            if self.should_stop(durations.len(), elapsed) {
                break;
            }

            let sample_start = Instant::now();
            target
                .run_once()
                .with_context(|| format!("benchmark '{}' failed on sample {}", target.label(), durations.len() + 1))?;
            let took = sample_start.elapsed();

            durations.push(took);
            tracing::debug!(sample = durations.len(), nanos = saturating_u64(took.as_nanos()), "sample complete");
            on_progress(Progress::Sample {
                count: durations.len(),
                took,
            });
        }

        let wall = start.elapsed();
        tracing::info!(samples = durations.len(), wall_ms = saturating_u64(wall.as_millis()), "measurement finished");
        Ok(Samples { durations, wall })
    }

    fn should_stop(&self, completed: usize, elapsed: Duration) -> bool {
        if let Some(max) = self.config.max_samples
            && completed >= max
        {
            return true;
        }
        completed >= self.config.min_samples && elapsed >= self.config.duration
    }
}
