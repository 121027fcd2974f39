//! Test doubles shared by core unit tests.

use std::collections::BTreeMap;

use crate::{
    edge::{Edge, EdgeId, EdgeRecord, NodeId},
    error::StoreError,
    store::{MergeKey, MergePolicy, StagedStore},
};

/// Builds a raw record between two endpoints.
pub(crate) fn record(from: u64, to: u64) -> EdgeRecord {
    EdgeRecord::new(NodeId::new(from), NodeId::new(to))
}

/// Minimal in-crate staged store: a `BTreeMap` primary table and a `Vec`
/// staging table, merged under the requested policy.
#[derive(Debug, Default)]
pub(crate) struct VecStore {
    pub(crate) primary: BTreeMap<EdgeId, Edge>,
    pub(crate) staging: Vec<Edge>,
    pub(crate) max_batch: usize,
}

impl VecStore {
    pub(crate) fn with_max_batch(max_batch: usize) -> Self {
        Self {
            max_batch,
            ..Self::default()
        }
    }
}

impl StagedStore for VecStore {
    fn max_batch_size(&self) -> usize {
        if self.max_batch == 0 { 1000 } else { self.max_batch }
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
        let staged = std::mem::take(&mut self.staging);
        match policy {
            MergePolicy::Insert => {
                for edge in &staged {
                    if self.primary.contains_key(&edge.id) {
                        self.staging = staged.clone();
                        return Err(StoreError::Constraint {
                            message: format!("duplicate edge id {}", edge.id.get()),
                        });
                    }
                }
                for edge in staged {
                    self.primary.insert(edge.id, edge);
                }
            }
            MergePolicy::Upsert(MergeKey::EdgeId) => {
                for edge in staged {
                    self.primary.insert(edge.id, edge);
                }
            }
            MergePolicy::Upsert(MergeKey::Endpoints) => {
                for edge in staged {
                    let existing = self
                        .primary
                        .values()
                        .find(|row| row.from == edge.from && row.to == edge.to)
                        .map(|row| row.id);
                    let id = existing.unwrap_or(edge.id);
                    self.primary.insert(id, Edge { id, ..edge });
                }
            }
        }
        Ok(())
    }

    fn truncate_staging(&mut self) -> Result<(), StoreError> {
        self.staging.clear();
        Ok(())
    }

    fn edge_count(&self) -> Result<usize, StoreError> {
        Ok(self.primary.len())
    }
}

/// Wraps a [`VecStore`] and fails the nth `stage_batch` call, for exercising
/// mid-chunk staging failures.
#[derive(Debug)]
pub(crate) struct FailingStore {
    pub(crate) inner: VecStore,
    pub(crate) fail_on_batch: usize,
    batches_seen: usize,
}

impl FailingStore {
    pub(crate) fn new(inner: VecStore, fail_on_batch: usize) -> Self {
        Self {
            inner,
            fail_on_batch,
            batches_seen: 0,
        }
    }
}

impl StagedStore for FailingStore {
    fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size()
    }

    fn max_edge_id(&self) -> Result<Option<EdgeId>, StoreError> {
        self.inner.max_edge_id()
    }

    fn stage_batch(&mut self, batch: Vec<Edge>) -> Result<(), StoreError> {
        self.batches_seen += 1;
        if self.batches_seen == self.fail_on_batch {
            return Err(StoreError::Unavailable {
                message: "connection torn down mid-batch".to_owned(),
            });
        }
        self.inner.stage_batch(batch)
    }

    fn staged_count(&self) -> Result<usize, StoreError> {
        self.inner.staged_count()
    }

    fn merge_staged(&mut self, policy: MergePolicy) -> Result<(), StoreError> {
        self.inner.merge_staged(policy)
    }

    fn truncate_staging(&mut self) -> Result<(), StoreError> {
        self.inner.truncate_staging()
    }

    fn edge_count(&self) -> Result<usize, StoreError> {
        self.inner.edge_count()
    }
}
