//! Benchmark support crate for grafbench.
//!
//! Provides synthetic edge streams and parameter types used by the Criterion
//! benchmarks for the two core pipelines: task sampling and staged bulk
//! writes, plus workload replay against the in-memory store.

pub mod error;
pub mod params;
pub mod stream;
