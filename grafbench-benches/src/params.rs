//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs so benchmark ids render
//! consistently across groups.

use std::fmt;

/// Parameters for a reservoir sampling benchmark run.
#[derive(Clone, Debug)]
pub struct SamplingBenchParams {
    /// Number of edges in the input stream.
    pub stream_len: usize,
    /// Reservoir size (largest requested task count).
    pub reservoir: usize,
}

impl fmt::Display for SamplingBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.stream_len, self.reservoir)
    }
}

/// Parameters for a bulk import benchmark run.
#[derive(Clone, Debug)]
pub struct ImportBenchParams {
    /// Number of edges imported per run.
    pub edge_count: usize,
    /// Staged batch ceiling of the target store.
    pub batch_size: usize,
}

impl fmt::Display for ImportBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={},batch={}", self.edge_count, self.batch_size)
    }
}

/// Parameters for a workload replay benchmark run.
#[derive(Clone, Debug)]
pub struct ReplayBenchParams {
    /// Number of edges in the store under test.
    pub edge_count: usize,
}

impl fmt::Display for ReplayBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={}", self.edge_count)
    }
}
