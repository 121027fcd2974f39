//! Workload snapshot produced by one sampling run.
//!
//! A workload is sampled once and replayed unchanged against every store
//! under test, so differing results reflect the stores rather than the tasks.

use crate::edge::{EdgeRecord, NodeId};

/// Number of edges per batched-mutation chunk.
pub const MUTATION_BATCH_LEN: usize = 100;

/// The fixed set of benchmark tasks produced by one sampling run.
///
/// The five collections serve disjoint purposes and may be smaller than
/// requested: all counts are clamped to what the reservoir actually held.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    /// Edges to point-look-up one at a time.
    pub edges_to_query: Vec<EdgeRecord>,
    /// Nodes to point-look-up, derived from [`Self::edges_to_query`].
    pub nodes_to_query: Vec<NodeId>,
    /// Nodes to run analytic traversals on, derived independently.
    pub nodes_to_analyze: Vec<NodeId>,
    /// Edges to mutate one at a time, in reservoir order.
    pub edges_to_change_one: Vec<EdgeRecord>,
    /// The same mutation edges, chunked into batches of
    /// [`MUTATION_BATCH_LEN`]. Never empty: an empty mutation set yields a
    /// single empty chunk.
    pub edges_to_change_batched: Vec<Vec<EdgeRecord>>,
}

impl Workload {
    /// A workload with no tasks at all.
    ///
    /// # Examples
    /// ```
    /// use grafbench_core::Workload;
    ///
    /// let workload = Workload::empty();
    /// assert!(workload.edges_to_query.is_empty());
    /// assert_eq!(workload.edges_to_change_batched.len(), 1);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self {
            edges_to_query: Vec::new(),
            nodes_to_query: Vec::new(),
            nodes_to_analyze: Vec::new(),
            edges_to_change_one: Vec::new(),
            edges_to_change_batched: vec![Vec::new()],
        }
    }

    /// Total number of individual tasks across all five collections.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.edges_to_query
            .len()
            .saturating_add(self.nodes_to_query.len())
            .saturating_add(self.nodes_to_analyze.len())
            .saturating_add(self.edges_to_change_one.len())
            .saturating_add(
                self.edges_to_change_batched
                    .iter()
                    .map(Vec::len)
                    .sum::<usize>(),
            )
    }
}

/// Partitions mutation edges into contiguous chunks of [`MUTATION_BATCH_LEN`].
///
/// The last chunk may be shorter. An empty input yields a single empty chunk
/// rather than no chunks, so batched replay always has at least one batch to
/// issue.
#[must_use]
pub fn batch_mutations(edges: &[EdgeRecord]) -> Vec<Vec<EdgeRecord>> {
    if edges.is_empty() {
        return vec![Vec::new()];
    }
    edges
        .chunks(MUTATION_BATCH_LEN)
        .map(<[EdgeRecord]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::NodeId;
    use rstest::rstest;

    fn records(count: usize) -> Vec<EdgeRecord> {
        (0..count as u64)
            .map(|i| EdgeRecord::new(NodeId::new(i + 1), NodeId::new(i + 2)))
            .collect()
    }

    #[rstest]
    #[case::empty(0, vec![0])]
    #[case::partial(40, vec![40])]
    #[case::exact(200, vec![100, 100])]
    #[case::ragged(250, vec![100, 100, 50])]
    fn batching_chunks_in_hundreds(#[case] count: usize, #[case] expected: Vec<usize>) {
        let batches = batch_mutations(&records(count));
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, expected);
    }

    #[test]
    fn batching_preserves_reservoir_order() {
        let edges = records(150);
        let batches = batch_mutations(&edges);
        let flattened: Vec<EdgeRecord> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, edges);
    }

    #[test]
    fn empty_workload_has_one_empty_batch() {
        let workload = Workload::empty();
        assert_eq!(workload.edges_to_change_batched, vec![Vec::new()]);
        assert_eq!(workload.task_count(), 0);
    }
}
