use rand::{Rng, SeedableRng, rngs::StdRng};

/// Length of the array the bundled loop demo iterates over.
pub const DEFAULT_FIXTURE_LEN: usize = 1_000_000;
pub const DEFAULT_FIXTURE_SEED: u64 = 42;

/// Shared input data for benchmark cases.
///
/// Built once before any case runs and only ever handed out as a shared
/// slice, so no case can mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    values: Vec<f64>,
}

impl Fixture {
    /// `len` values drawn uniformly from `[0, 1)`. The same seed always
    /// yields the same values.
    pub fn random(len: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..len).map(|_| rng.gen_range(0.0..1.0)).collect();
        tracing::debug!(len, seed, "generated random fixture");
        Self { values }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
