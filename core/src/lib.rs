pub mod fixture;
pub mod iteration;
pub mod marker;
pub mod report;
pub mod runtime;
pub mod sampler;
pub mod stats;

// Built-in in-process workloads
pub mod perf;

#[cfg(test)]
mod sampler_test;
#[cfg(test)]
mod stats_test;
