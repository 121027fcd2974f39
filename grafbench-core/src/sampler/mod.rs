//! Deterministic task sampling over edge streams and synthetic distributions.
//!
//! The sampler derives a bounded benchmark [`Workload`] from an edge stream of
//! unknown length using reservoir sampling (Algorithm R), or synthesizes one
//! from a uniform distribution over a node range when no real dataset is
//! available. Both paths share a single fill-then-partition workflow; only the
//! candidate producer differs.
//!
//! All randomness flows from an injected seed, so the same configuration
//! yields the same "random" workload on every store under test.

use std::collections::BTreeSet;

use rand::{
    Rng, SeedableRng,
    rngs::SmallRng,
    seq::{SliceRandom, index},
};
use tracing::{debug, instrument};

use crate::{
    edge::{EdgeRecord, NodeId},
    error::SampleError,
    source::EdgeStream,
    workload::{Workload, batch_mutations},
};

/// Sampling counts and the RNG seed, fixed at construction.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Number of point-lookup tasks to produce.
    pub count_finds: usize,
    /// Number of analytic-node tasks to produce.
    pub count_analytics: usize,
    /// Number of mutation tasks to produce.
    pub count_changes: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl SamplerConfig {
    /// Reservoir size required to satisfy every collection: the largest of
    /// the three requested counts.
    #[must_use]
    pub const fn needed_samples(&self) -> usize {
        let mut needed = self.count_finds;
        if self.count_analytics > needed {
            needed = self.count_analytics;
        }
        if self.count_changes > needed {
            needed = self.count_changes;
        }
        needed
    }
}

/// Samples representative benchmark tasks from edge data.
///
/// Memory use is bounded by the reservoir size regardless of stream length.
/// The sampler holds no reference to a produced [`Workload`]; each call
/// returns a fresh, caller-owned snapshot.
///
/// # Examples
/// ```
/// use grafbench_core::{SamplerConfig, TaskSampler};
///
/// let mut sampler = TaskSampler::new(SamplerConfig {
///     count_finds: 4,
///     count_analytics: 2,
///     count_changes: 3,
///     seed: 42,
/// });
/// let workload = sampler.sample_distribution(100)?;
/// assert_eq!(workload.edges_to_query.len(), 4);
/// assert_eq!(workload.edges_to_change_one.len(), 3);
/// # Ok::<(), grafbench_core::SampleError>(())
/// ```
#[derive(Debug)]
pub struct TaskSampler {
    config: SamplerConfig,
    rng: SmallRng,
}

impl TaskSampler {
    /// Creates a sampler with the RNG seeded from `config.seed`.
    #[must_use]
    pub fn new(config: SamplerConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Returns the configuration the sampler was built with.
    #[rustfmt::skip]
    #[must_use]
    pub const fn config(&self) -> &SamplerConfig { &self.config }

    /// Samples a workload from `source` in a single forward pass.
    ///
    /// Maintains a reservoir of `needed_samples()` edges: the i-th edge seen
    /// (1-indexed) fills an empty slot or, once the reservoir is full,
    /// replaces slot `s` for a uniform draw `s` in `[0, i)` when `s` lands
    /// inside the reservoir. Every edge of an n-edge stream therefore ends up
    /// in the reservoir with probability `k/n`, using O(k) memory.
    ///
    /// An undersized or empty stream is not an error; all requested counts
    /// clamp to what was seen.
    ///
    /// # Errors
    /// Returns [`SampleError::Source`] when the stream fails mid-pass.
    #[instrument(name = "sampler.stream", skip(self, source), err)]
    pub fn sample_stream<S: EdgeStream>(&mut self, source: &mut S) -> Result<Workload, SampleError> {
        let needed = self.config.needed_samples();
        let mut reservoir: Vec<EdgeRecord> = Vec::with_capacity(needed);
        let mut seen: u64 = 0;

        while let Some(record) = source.next_edge()? {
            seen = seen.saturating_add(1);
            if reservoir.len() < needed {
                reservoir.push(record);
            } else if needed > 0 {
                let slot = self.rng.gen_range(0..seen);
                if slot < needed as u64 {
                    if let Some(entry) = reservoir.get_mut(slot as usize) {
                        *entry = record;
                    }
                }
            }
        }

        debug!(seen, sampled = reservoir.len(), "reservoir pass complete");
        Ok(self.split_into_tasks(reservoir))
    }

    /// Synthesizes a workload from a uniform distribution over
    /// `[1, node_count)` when no real dataset is available.
    ///
    /// Endpoint pairs are redrawn until distinct, so no synthesized edge is a
    /// self-loop. Synthesized edges carry unit weight and no payload.
    ///
    /// # Errors
    /// Returns [`SampleError::DegenerateNodeRange`] when `[1, node_count)`
    /// holds fewer than two distinct identifiers, since rejection could then
    /// never terminate.
    #[instrument(name = "sampler.distribution", skip(self), err)]
    pub fn sample_distribution(&mut self, node_count: u64) -> Result<Workload, SampleError> {
        if node_count < 3 {
            return Err(SampleError::DegenerateNodeRange { node_count });
        }
        let needed = self.config.needed_samples();
        let mut reservoir: Vec<EdgeRecord> = Vec::with_capacity(needed);
        while reservoir.len() < needed {
            let from = self.rng.gen_range(1..node_count);
            let to = self.rng.gen_range(1..node_count);
            if from == to {
                continue;
            }
            reservoir.push(EdgeRecord::new(NodeId::new(from), NodeId::new(to)));
        }

        debug!(sampled = reservoir.len(), "distribution pass complete");
        Ok(self.split_into_tasks(reservoir))
    }

    /// Partitions a filled reservoir into the five workload collections.
    fn split_into_tasks(&mut self, reservoir: Vec<EdgeRecord>) -> Workload {
        let count_finds = self.config.count_finds.min(reservoir.len());
        let edges_to_query = self.sample_edges(&reservoir, count_finds);
        let nodes_to_query = self.sample_nodes(&reservoir, count_finds);
        let nodes_to_analyze = self.sample_nodes(&reservoir, self.config.count_analytics);

        let change_len = self.config.count_changes.min(reservoir.len());
        let edges_to_change_one: Vec<EdgeRecord> =
            reservoir.iter().take(change_len).cloned().collect();
        let edges_to_change_batched = batch_mutations(&edges_to_change_one);

        Workload {
            edges_to_query,
            nodes_to_query,
            nodes_to_analyze,
            edges_to_change_one,
            edges_to_change_batched,
        }
    }

    /// Draws `count` distinct edges uniformly without replacement.
    fn sample_edges(&mut self, reservoir: &[EdgeRecord], count: usize) -> Vec<EdgeRecord> {
        let amount = count.min(reservoir.len());
        index::sample(&mut self.rng, reservoir.len(), amount)
            .iter()
            .filter_map(|slot| reservoir.get(slot).cloned())
            .collect()
    }

    /// Derives nodes from edges: draw `count` distinct edges, coin-flip an
    /// endpoint from each, dedupe, then shuffle.
    ///
    /// Colliding endpoints make the result under-return; callers must
    /// tolerate fewer than `count` nodes. Deduplication runs through an
    /// ordered set so equal seeds shuffle equal inputs.
    fn sample_nodes(&mut self, reservoir: &[EdgeRecord], count: usize) -> Vec<NodeId> {
        let amount = count.min(reservoir.len());
        let picks = index::sample(&mut self.rng, reservoir.len(), amount);
        let mut unique: BTreeSet<NodeId> = BTreeSet::new();
        for slot in picks {
            if let Some(edge) = reservoir.get(slot) {
                unique.insert(if self.rng.gen_bool(0.5) {
                    edge.from
                } else {
                    edge.to
                });
            }
        }
        let mut nodes: Vec<NodeId> = unique.into_iter().collect();
        nodes.shuffle(&mut self.rng);
        nodes
    }
}
