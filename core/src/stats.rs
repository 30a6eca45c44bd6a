use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    Empty,
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Empty => write!(f, "no samples were collected"),
        }
    }
}

impl std::error::Error for StatsError {}

/// Clamp a `u128` duration count (from `as_nanos` and friends) into `u64`.
pub fn saturating_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Timing statistics for one benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub iterations: usize,
    pub min: Duration,
    pub max: Duration,
    /// Upper median: element `len / 2` of the sorted samples.
    pub median: Duration,
    pub mean: Duration,
}

impl Summary {
    pub fn from_durations(durations: &[Duration]) -> Result<Self, StatsError> {
        if durations.is_empty() {
            return Err(StatsError::Empty);
        }

        let mut sorted = durations.to_vec();
        sorted.sort_unstable();

        let len = sorted.len();
        let total_nanos: u128 = sorted.iter().map(Duration::as_nanos).sum();
        let mean_nanos = total_nanos / len as u128;

        Ok(Self {
            iterations: len,
            min: sorted[0],
            max: sorted[len - 1],
            median: sorted[len / 2],
            mean: Duration::from_nanos(saturating_u64(mean_nanos)),
        })
    }

    /// How much slower this summary's median is than `fastest`'s, in percent.
    ///
    /// A zero fastest median is treated as one nanosecond.
    pub fn relative_delta(&self, fastest: &Summary) -> f64 {
        let base = fastest.median.as_nanos().max(1) as f64;
        let this = self.median.as_nanos() as f64;
        ((this - base) / base * 100.0).max(0.0)
    }
}

/// Index of the summary with the smallest median; the first one wins ties.
pub fn fastest(summaries: &[Summary]) -> Option<usize> {
    let mut best: Option<(usize, Duration)> = None;
    for (idx, summary) in summaries.iter().enumerate() {
        match best {
            Some((_, median)) if summary.median >= median => {}
            _ => best = Some((idx, summary.median)),
        }
    }
    best.map(|(idx, _)| idx)
}
