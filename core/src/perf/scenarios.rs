use crate::{fixture::Fixture, iteration::IterationStyle, runtime::BenchTarget};
use anyhow::{Result, bail};
use std::sync::Arc;

#[derive(Debug)]
struct LoopScenario {
    key: &'static str,
    title: &'static str,
    style: IterationStyle,
}

static LOOP_SCENARIOS: &[LoopScenario] = &[
    LoopScenario {
        key: "for_index",
        title: "Index-based for loop",
        style: IterationStyle::ByIndex,
    },
    LoopScenario {
        key: "for_of",
        title: "Element iterator loop",
        style: IterationStyle::ByElement,
    },
];

/// A loop scenario bound to the shared fixture.
#[derive(Debug, Clone)]
pub struct PreparedLoopScenario {
    spec: &'static LoopScenario,
    fixture: Arc<Fixture>,
}

impl PreparedLoopScenario {
    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    pub fn title(&self) -> &'static str {
        self.spec.title
    }

    pub fn style(&self) -> IterationStyle {
        self.spec.style
    }

    pub fn bench_case_name(&self) -> String {
        format!("{}_{}", self.spec.key, self.fixture.len())
    }

    /// Traverse the fixture once and check every element was visited.
    pub fn run_checked(&self) -> Result<usize> {
        let visits = self.spec.style.count_visits(self.fixture.as_slice());
        if visits != self.fixture.len() {
            bail!(
                "{} visited {} of {} elements",
                self.spec.key,
                visits,
                self.fixture.len()
            );
        }
        Ok(visits)
    }
}

impl BenchTarget for PreparedLoopScenario {
    fn label(&self) -> &str {
        self.spec.key
    }

    fn run_once(&mut self) -> Result<()> {
        self.run_checked().map(|_| ())
    }
}

pub fn prepare_loop_scenarios(fixture: Arc<Fixture>) -> Vec<PreparedLoopScenario> {
    LOOP_SCENARIOS
        .iter()
        .map(|spec| PreparedLoopScenario {
            spec,
            fixture: Arc::clone(&fixture),
        })
        .collect()
}
