//! Synthetic edge streams for benchmark fixtures.
//!
//! Generates self-loop-free random edges lazily, so sampling benchmarks can
//! consume streams far larger than memory and import benchmarks can
//! materialize reproducible datasets from a seed.

use grafbench_core::{EdgeRecord, NodeId, SourceError};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Configuration for a synthetic edge stream.
#[derive(Clone, Debug)]
pub struct EdgeStreamConfig {
    /// Number of edges the stream yields before exhausting.
    pub edge_count: usize,
    /// Exclusive upper bound of the node identifier range `[1, node_count)`.
    pub node_count: u64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A lazy, seeded stream of uniformly random edges with distinct endpoints.
///
/// Implements `Iterator<Item = Result<EdgeRecord, SourceError>>` and thereby
/// [`grafbench_core::EdgeStream`].
///
/// # Examples
/// ```
/// use grafbench_benches::stream::{EdgeStreamConfig, SyntheticEdgeStream};
///
/// let stream = SyntheticEdgeStream::generate(&EdgeStreamConfig {
///     edge_count: 8,
///     node_count: 100,
///     seed: 42,
/// })?;
/// assert_eq!(stream.count(), 8);
/// # Ok::<(), grafbench_benches::error::BenchSetupError>(())
/// ```
#[derive(Debug)]
pub struct SyntheticEdgeStream {
    rng: SmallRng,
    node_count: u64,
    remaining: usize,
}

impl SyntheticEdgeStream {
    /// Creates a stream from `config`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::DegenerateStream`] when the node range
    /// cannot yield two distinct endpoints.
    pub fn generate(config: &EdgeStreamConfig) -> Result<Self, BenchSetupError> {
        if config.node_count < 3 {
            return Err(BenchSetupError::DegenerateStream {
                node_count: config.node_count,
            });
        }
        Ok(Self {
            rng: SmallRng::seed_from_u64(config.seed),
            node_count: config.node_count,
            remaining: config.edge_count,
        })
    }

    /// Materializes the whole stream into records, for fixtures that need to
    /// replay the same edges more than once.
    ///
    /// # Errors
    /// Returns [`BenchSetupError`] when the configuration is invalid.
    pub fn collect_records(config: &EdgeStreamConfig) -> Result<Vec<EdgeRecord>, BenchSetupError> {
        let stream = Self::generate(config)?;
        let mut records = Vec::with_capacity(config.edge_count);
        for result in stream {
            records.push(result?);
        }
        Ok(records)
    }
}

impl Iterator for SyntheticEdgeStream {
    type Item = Result<EdgeRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        loop {
            let from = self.rng.gen_range(1..self.node_count);
            let to = self.rng.gen_range(1..self.node_count);
            if from != to {
                return Some(Ok(EdgeRecord::new(NodeId::new(from), NodeId::new(to))));
            }
        }
    }
}
