use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::stats::{self, Summary};

const RULE_WIDTH: usize = 81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    /// 1-based position of the case in its source.
    pub index: usize,
    pub label: Option<String>,
    pub summary: Summary,
}

impl CaseResult {
    /// Name shown in the `Benchmark` column.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.index.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    source: Option<String>,
    results: Vec<CaseResult>,
}

/// Serialised shape of a report. Durations are nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    /// 1-based index of the fastest case.
    pub fastest: Option<usize>,
    pub results: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub index: usize,
    pub name: String,
    pub iterations: usize,
    pub min_ns: u64,
    pub max_ns: u64,
    pub median_ns: u64,
    pub mean_ns: u64,
    /// Percent slower than the fastest case; absent for the fastest one.
    pub delta_percent: Option<f64>,
}

fn nanos(d: Duration) -> u64 {
    stats::saturating_u64(d.as_nanos())
}

impl Report {
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Position in [`Report::results`] of the case with the lowest median.
    pub fn fastest(&self) -> Option<usize> {
        let summaries: Vec<Summary> = self.results.iter().map(|r| r.summary).collect();
        stats::fastest(&summaries)
    }

    fn delta_percent(&self, pos: usize) -> Option<f64> {
        let fastest = self.fastest()?;
        if pos == fastest {
            return None;
        }
        let result = self.results.get(pos)?;
        Some(result.summary.relative_delta(&self.results[fastest].summary))
    }

    pub fn delta_label(&self, pos: usize) -> String {
        match self.delta_percent(pos) {
            None => "Fastest".to_string(),
            Some(pct) => format!("{pct:.0}% Slower"),
        }
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            " | {:<10} | {:<10} | {:<10} | {:<10} | {:<10} | {:<12} |",
            "Benchmark", "Iterations", "Min(ms)", "Max(ms)", "Median(ms)", "Delta"
        );
        let _ = writeln!(out, " {}", "-".repeat(RULE_WIDTH));

        for (pos, result) in self.results.iter().enumerate() {
            let s = &result.summary;
            let _ = writeln!(
                out,
                " | {:<10} | {:<10} | {:<10} | {:<10} | {:<10} | {:<12} |",
                result.display_name(),
                s.iterations,
                s.min.as_millis(),
                s.max.as_millis(),
                s.median.as_millis(),
                self.delta_label(pos)
            );
        }
        out
    }

    pub fn to_document(&self) -> ReportDocument {
        let fastest = self.fastest();
        let results = self
            .results
            .iter()
            .enumerate()
            .map(|(pos, r)| ResultRow {
                index: r.index,
                name: r.display_name(),
                iterations: r.summary.iterations,
                min_ns: nanos(r.summary.min),
                max_ns: nanos(r.summary.max),
                median_ns: nanos(r.summary.median),
                mean_ns: nanos(r.summary.mean),
                delta_percent: self.delta_percent(pos),
            })
            .collect();

        ReportDocument {
            generated_at: Utc::now(),
            source: self.source.clone(),
            fastest: fastest.map(|pos| self.results[pos].index),
            results,
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Table => Ok(self.render_table()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(&self.to_document()).context("serialize report as JSON")
            }
            ReportFormat::Yaml => serde_yaml::to_string(&self.to_document()).context("serialize report as YAML"),
        }
    }
}
