//! Built-in workloads shared by the `loops` command and the Criterion bench.
//!
//! Keeping the scenario table here means the CLI and the bench always compare
//! the same traversal styles over the same fixture.

pub mod scenarios;
