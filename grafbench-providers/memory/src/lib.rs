//! In-memory staged store provider.
//!
//! [`MemoryStore`] keeps a primary edge table and a staging table as plain
//! collections, implementing the staging semantics real SQL-backed stores
//! provide via an unindexed side table and a bulk `INSERT … SELECT` merge. It
//! doubles as the reference store for workload replay: point lookups,
//! neighbourhood queries, and direct single-edge mutations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use grafbench_core::{
    Edge, EdgeId, EdgeRecord, MergeKey, MergePolicy, NodeId, StagedStore, StoreError,
};

/// Staged batch ceiling mirroring the bulk-import default of the SQL-backed
/// stores this provider stands in for.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1_000_000;

/// An in-memory edge store with staging-table semantics.
///
/// # Examples
/// ```
/// use grafbench_core::{EdgeRecord, NodeId, StagedBulkWriter, StagedStore};
/// use grafbench_providers_memory::MemoryStore;
///
/// let mut store = MemoryStore::new();
/// let mut stream = vec![
///     Ok(EdgeRecord::new(NodeId::new(1), NodeId::new(2))),
///     Ok(EdgeRecord::new(NodeId::new(2), NodeId::new(3))),
/// ]
/// .into_iter();
/// let added = StagedBulkWriter::new(&mut store).insert_edges(&mut stream)?;
/// assert_eq!(added, 2);
/// assert!(store.find_edge(NodeId::new(1), NodeId::new(2)).is_some());
/// # Ok::<(), grafbench_core::ImportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    primary: BTreeMap<EdgeId, Edge>,
    staging: Vec<Edge>,
    max_batch_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_max_batch_size(DEFAULT_MAX_BATCH_SIZE)
    }
}

impl MemoryStore {
    /// Creates an empty store with the default staged batch ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store accepting at most `max_batch_size` rows per
    /// staged batch. A zero ceiling is treated as one.
    #[must_use]
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            primary: BTreeMap::new(),
            staging: Vec::new(),
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Looks up the edge between two endpoints, if present.
    #[must_use]
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.primary
            .values()
            .find(|edge| edge.from == from && edge.to == to)
    }

    /// Returns every edge touching `node` as either endpoint.
    #[must_use]
    pub fn edges_related(&self, node: NodeId) -> Vec<&Edge> {
        self.primary
            .values()
            .filter(|edge| edge.from == node || edge.to == node)
            .collect()
    }

    /// Number of distinct nodes appearing as an endpoint of any edge.
    ///
    /// Nodes have no record of their own; this is derived on demand.
    #[must_use]
    pub fn count_nodes(&self) -> usize {
        let mut nodes: BTreeSet<NodeId> = BTreeSet::new();
        for edge in self.primary.values() {
            nodes.insert(edge.from);
            nodes.insert(edge.to);
        }
        nodes.len()
    }

    /// Directly upserts a single edge, keyed by its endpoints.
    ///
    /// An existing `(from, to)` row is replaced in place and keeps its
    /// identifier; otherwise the record is inserted under a fresh one.
    /// Records with a zero endpoint are dropped and yield `None`.
    ///
    /// This is the slow path the staged pipeline exists to avoid; benchmark
    /// drivers use it for the one-at-a-time mutation tasks.
    pub fn upsert_edge(&mut self, record: EdgeRecord) -> Option<EdgeId> {
        if !record.has_valid_endpoints() {
            return None;
        }
        let id = self
            .find_edge(record.from, record.to)
            .map_or_else(|| EdgeId::new(self.next_edge_id()), |edge| edge.id);
        self.primary.insert(id, Edge::from_record(record, id));
        Some(id)
    }

    /// Directly upserts a batch of edges one record at a time, returning how
    /// many were applied (invalid records are dropped).
    pub fn upsert_edges(&mut self, records: Vec<EdgeRecord>) -> usize {
        records
            .into_iter()
            .filter_map(|record| self.upsert_edge(record))
            .count()
    }

    /// Removes the edge between two endpoints, returning whether a row went
    /// away.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let id = self.find_edge(from, to).map(|edge| edge.id);
        match id {
            Some(id) => self.primary.remove(&id).is_some(),
            None => false,
        }
    }

    fn next_edge_id(&self) -> u64 {
        self.primary
            .keys()
            .next_back()
            .map_or(1, |id| id.get().saturating_add(1))
    }

    fn merge_insert_only(&mut self) -> Result<(), StoreError> {
        // Validate the whole staged set first so a refused merge leaves the
        // primary table untouched and the staging table re-truncatable.
        let mut incoming: BTreeSet<EdgeId> = BTreeSet::new();
        for edge in &self.staging {
            if self.primary.contains_key(&edge.id) || !incoming.insert(edge.id) {
                return Err(StoreError::Constraint {
                    message: format!("duplicate edge id {} in insert-only merge", edge.id.get()),
                });
            }
        }
        for edge in self.staging.drain(..) {
            self.primary.insert(edge.id, edge);
        }
        Ok(())
    }

    fn merge_upsert_by_id(&mut self) {
        for edge in self.staging.drain(..) {
            self.primary.insert(edge.id, edge);
        }
    }

    fn merge_upsert_by_endpoints(&mut self) {
        let mut by_endpoints: HashMap<(NodeId, NodeId), EdgeId> = self
            .primary
            .values()
            .map(|edge| ((edge.from, edge.to), edge.id))
            .collect();
        for edge in self.staging.drain(..) {
            let key = (edge.from, edge.to);
            let id = by_endpoints.get(&key).copied().unwrap_or(edge.id);
            by_endpoints.insert(key, id);
            self.primary.insert(id, Edge { id, ..edge });
        }
    }
}

impl StagedStore for MemoryStore {
    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    fn max_edge_id(&self) -> Result<Option<EdgeId>, StoreError> {
        Ok(self.primary.keys().next_back().copied())
    }

    fn stage_batch(&mut self, batch: Vec<Edge>) -> Result<(), StoreError> {
        self.staging.extend(batch);
        Ok(())
    }

    fn staged_count(&self) -> Result<usize, StoreError> {
        Ok(self.staging.len())
    }

    fn merge_staged(&mut self, policy: MergePolicy) -> Result<(), StoreError> {
        match policy {
            MergePolicy::Insert => self.merge_insert_only(),
            MergePolicy::Upsert(MergeKey::EdgeId) => {
                self.merge_upsert_by_id();
                Ok(())
            }
            MergePolicy::Upsert(MergeKey::Endpoints) => {
                self.merge_upsert_by_endpoints();
                Ok(())
            }
        }
    }

    fn truncate_staging(&mut self) -> Result<(), StoreError> {
        self.staging.clear();
        Ok(())
    }

    fn edge_count(&self) -> Result<usize, StoreError> {
        Ok(self.primary.len())
    }
}
