//! Staged bulk-merge write pipeline.
//!
//! Direct per-record writes into an indexed table rebalance the index on
//! every insert. The writer instead fills the store's unindexed staging table
//! in fixed-size batches and folds the whole of it into the primary table
//! with one merge, deferring index maintenance to a single pass. Insert and
//! upsert imports share this one pipeline; only the [`MergePolicy`] differs.

use std::mem;

use tracing::{debug, info, instrument};

use crate::{
    edge::{Edge, EdgeId, EdgeRecord},
    error::ImportError,
    source::EdgeStream,
    store::{MergeKey, MergePolicy, StagedStore},
};

/// Persists lazily-produced edge sequences into a [`StagedStore`].
///
/// The writer assumes exclusive ownership of the store's staging table for
/// the duration of one call. Peak memory is bounded by the store's
/// `max_batch_size` regardless of stream length.
///
/// # Examples
/// ```
/// use grafbench_core::{EdgeRecord, NodeId, StagedBulkWriter};
/// # use grafbench_core::{Edge, EdgeId, MergePolicy, StagedStore, StoreError};
/// # #[derive(Default)]
/// # struct Toy { primary: Vec<Edge>, staging: Vec<Edge> }
/// # impl StagedStore for Toy {
/// #     fn max_batch_size(&self) -> usize { 1000 }
/// #     fn max_edge_id(&self) -> Result<Option<EdgeId>, StoreError> {
/// #         Ok(self.primary.iter().map(|e| e.id).max())
/// #     }
/// #     fn stage_batch(&mut self, batch: Vec<Edge>) -> Result<(), StoreError> {
/// #         self.staging.extend(batch);
/// #         Ok(())
/// #     }
/// #     fn staged_count(&self) -> Result<usize, StoreError> { Ok(self.staging.len()) }
/// #     fn merge_staged(&mut self, _policy: MergePolicy) -> Result<(), StoreError> {
/// #         let staged = std::mem::take(&mut self.staging);
/// #         self.primary.extend(staged);
/// #         Ok(())
/// #     }
/// #     fn truncate_staging(&mut self) -> Result<(), StoreError> {
/// #         self.staging.clear();
/// #         Ok(())
/// #     }
/// #     fn edge_count(&self) -> Result<usize, StoreError> { Ok(self.primary.len()) }
/// # }
///
/// let mut store = Toy::default();
/// let mut stream = vec![
///     Ok(EdgeRecord::new(NodeId::new(1), NodeId::new(2))),
///     Ok(EdgeRecord::new(NodeId::new(2), NodeId::new(3))),
/// ]
/// .into_iter();
///
/// let added = StagedBulkWriter::new(&mut store).insert_edges(&mut stream)?;
/// assert_eq!(added, 2);
/// # Ok::<(), grafbench_core::ImportError>(())
/// ```
#[derive(Debug)]
pub struct StagedBulkWriter<'a, S: StagedStore> {
    store: &'a mut S,
}

impl<'a, S: StagedStore> StagedBulkWriter<'a, S> {
    /// Creates a writer borrowing the target store for one import cycle.
    #[rustfmt::skip]
    pub fn new(store: &'a mut S) -> Self { Self { store } }

    /// Imports a fresh edge sequence, assigning strictly increasing
    /// identifiers starting after the largest id already persisted.
    ///
    /// The dataset is assumed not to collide with existing rows; re-running
    /// the same import against a non-empty store duplicates its content under
    /// fresh identifiers. Use [`Self::upsert_edges`] with
    /// [`MergeKey::Endpoints`] when idempotence matters.
    ///
    /// Returns the number of edges the merge added to the primary table.
    ///
    /// # Errors
    /// Returns [`ImportError`] when the staging table is dirty, the stream
    /// fails, or a store operation fails. A failure before the merge leaves
    /// the primary table untouched; callers should truncate staging before
    /// retrying.
    #[instrument(name = "writer.insert", skip(self, edges), err)]
    pub fn insert_edges<E: EdgeStream>(&mut self, edges: &mut E) -> Result<u64, ImportError> {
        self.run(edges, MergePolicy::Insert)
    }

    /// Imports an edge sequence with insert-or-replace semantics keyed by
    /// `key`.
    ///
    /// With [`MergeKey::EdgeId`] every record must carry its own identifier;
    /// with [`MergeKey::Endpoints`] rows matching an existing `(from, to)`
    /// pair replace that row and keep its identifier.
    ///
    /// Returns the number of edges the merge added to the primary table;
    /// replaced rows do not count.
    ///
    /// # Errors
    /// Returns [`ImportError`] as for [`Self::insert_edges`], plus
    /// [`ImportError::MissingMergeId`] for id-keyed records without one.
    #[instrument(name = "writer.upsert", skip(self, edges), err)]
    pub fn upsert_edges<E: EdgeStream>(
        &mut self,
        edges: &mut E,
        key: MergeKey,
    ) -> Result<u64, ImportError> {
        self.run(edges, MergePolicy::Upsert(key))
    }

    fn run<E: EdgeStream>(&mut self, edges: &mut E, policy: MergePolicy) -> Result<u64, ImportError> {
        let staged = self.store.staged_count()?;
        if staged > 0 {
            return Err(ImportError::DirtyStaging { staged });
        }

        let chunk_len = self.store.max_batch_size().max(1);
        let mut next_id = self
            .store
            .max_edge_id()?
            .map_or(1, |id| id.get().saturating_add(1));
        let mut position: u64 = 0;
        let mut staged_rows: u64 = 0;
        let mut dropped: u64 = 0;
        let mut batch: Vec<Edge> = Vec::new();

        while let Some(record) = edges.next_edge()? {
            position = position.saturating_add(1);
            let Some(edge) = convert(record, policy, &mut next_id, position)? else {
                dropped = dropped.saturating_add(1);
                continue;
            };
            batch.push(edge);
            if batch.len() == chunk_len {
                staged_rows = staged_rows.saturating_add(batch.len() as u64);
                self.store.stage_batch(mem::take(&mut batch))?;
            }
        }
        if !batch.is_empty() {
            staged_rows = staged_rows.saturating_add(batch.len() as u64);
            self.store.stage_batch(batch)?;
        }

        let before = self.store.edge_count()?;
        self.store.merge_staged(policy)?;
        self.store.truncate_staging()?;
        let after = self.store.edge_count()?;

        let added = after.saturating_sub(before) as u64;
        info!(staged = staged_rows, dropped, added, "bulk merge complete");
        Ok(added)
    }
}

/// Validates a raw record and assigns it an identifier per the merge policy.
///
/// Records with a zero endpoint are dropped, mirroring the
/// validate-and-compact behaviour of direct single-edge writes. Insert and
/// endpoint-keyed upsert paths consume fresh identifiers; the id-keyed upsert
/// path requires the record to carry one.
fn convert(
    record: EdgeRecord,
    policy: MergePolicy,
    next_id: &mut u64,
    position: u64,
) -> Result<Option<Edge>, ImportError> {
    if !record.has_valid_endpoints() {
        debug!(position, "dropping record with zero endpoint");
        return Ok(None);
    }
    let id = match policy {
        MergePolicy::Insert | MergePolicy::Upsert(MergeKey::Endpoints) => {
            let id = EdgeId::new(*next_id);
            *next_id = next_id.saturating_add(1);
            id
        }
        MergePolicy::Upsert(MergeKey::EdgeId) => {
            record.id.ok_or(ImportError::MissingMergeId { position })?
        }
    };
    Ok(Some(Edge::from_record(record, id)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        error::{SourceError, StoreError},
        test_utils::{FailingStore, VecStore, record},
    };

    fn stream_of(
        records: Vec<EdgeRecord>,
    ) -> impl Iterator<Item = Result<EdgeRecord, SourceError>> {
        records.into_iter().map(Ok)
    }

    #[rstest]
    fn insert_into_empty_store_adds_every_edge() {
        let mut store = VecStore::default();
        let mut stream = stream_of((1..=25u64).map(|i| record(i, i + 1)).collect());

        let added = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect("fresh import must succeed");

        assert_eq!(added, 25);
        assert_eq!(store.edge_count().expect("count must succeed"), 25);
        assert_eq!(store.staged_count().expect("count must succeed"), 0);
        // Truncating an already-clean staging table is a no-op.
        store
            .truncate_staging()
            .expect("truncate on clean staging must succeed");
        assert_eq!(store.edge_count().expect("count must succeed"), 25);
    }

    #[rstest]
    fn insert_assigns_ids_after_existing_maximum() {
        let mut store = VecStore::default();
        let mut first = stream_of(vec![record(1, 2), record(2, 3)]);
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut first)
            .expect("first import must succeed");

        let mut second = stream_of(vec![record(3, 4)]);
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut second)
            .expect("second import must succeed");

        let ids: Vec<u64> = store.primary.keys().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    fn insert_chunks_by_store_batch_size() {
        let mut store = VecStore::with_max_batch(10);
        let mut stream = stream_of((1..=34u64).map(|i| record(i, i + 1)).collect());

        let added = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect("chunked import must succeed");

        assert_eq!(added, 34);
    }

    #[rstest]
    fn insert_drops_records_with_zero_endpoints() {
        let mut store = VecStore::default();
        let mut stream = stream_of(vec![record(1, 2), record(0, 3), record(4, 0), record(5, 6)]);

        let added = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect("import must succeed");

        assert_eq!(added, 2);
    }

    #[rstest]
    fn insert_rerun_duplicates_content_rows() {
        // Fresh identifiers on every run mean logically identical datasets
        // stack up instead of converging; endpoint-keyed upsert is the
        // idempotent path.
        let mut store = VecStore::default();
        let dataset: Vec<EdgeRecord> = vec![record(1, 2), record(2, 3)];

        let mut first = stream_of(dataset.clone());
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut first)
            .expect("first run must succeed");
        let mut second = stream_of(dataset);
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut second)
            .expect("second run must succeed");

        assert_eq!(store.edge_count().expect("count must succeed"), 4);
    }

    #[rstest]
    fn endpoint_upsert_replaces_colliding_rows_and_keeps_ids() {
        let mut store = VecStore::default();
        let mut existing = stream_of(vec![
            record(1, 2).with_weight(1.0),
            record(2, 3).with_weight(1.0),
        ]);
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut existing)
            .expect("seed import must succeed");

        // Half the records collide on (from, to), half are new.
        let mut incoming = stream_of(vec![
            record(1, 2).with_weight(9.0),
            record(2, 3).with_weight(9.0),
            record(7, 8),
            record(8, 9),
        ]);
        let added = StagedBulkWriter::new(&mut store)
            .upsert_edges(&mut incoming, MergeKey::Endpoints)
            .expect("upsert must succeed");

        assert_eq!(added, 2);
        assert_eq!(store.edge_count().expect("count must succeed"), 4);
        let replaced = store
            .primary
            .values()
            .find(|edge| edge.from.get() == 1 && edge.to.get() == 2)
            .expect("colliding row must survive");
        assert_eq!(replaced.weight, 9.0);
        assert_eq!(replaced.id.get(), 1, "replaced row keeps its identifier");
    }

    #[rstest]
    fn endpoint_upsert_rerun_is_idempotent() {
        let mut store = VecStore::default();
        let dataset: Vec<EdgeRecord> = vec![record(1, 2), record(2, 3)];

        for _ in 0..2 {
            let mut stream = stream_of(dataset.clone());
            StagedBulkWriter::new(&mut store)
                .upsert_edges(&mut stream, MergeKey::Endpoints)
                .expect("upsert run must succeed");
        }

        assert_eq!(store.edge_count().expect("count must succeed"), 2);
    }

    #[rstest]
    fn id_keyed_upsert_requires_record_ids() {
        let mut store = VecStore::default();
        let mut stream = stream_of(vec![
            record(1, 2).with_id(EdgeId::new(5)),
            record(2, 3),
        ]);

        let err = StagedBulkWriter::new(&mut store)
            .upsert_edges(&mut stream, MergeKey::EdgeId)
            .expect_err("record without id must fail an id-keyed upsert");

        assert!(matches!(err, ImportError::MissingMergeId { position: 2 }));
    }

    #[rstest]
    fn id_keyed_upsert_replaces_by_id() {
        let mut store = VecStore::default();
        let mut seed = stream_of(vec![record(1, 2)]);
        StagedBulkWriter::new(&mut store)
            .insert_edges(&mut seed)
            .expect("seed import must succeed");

        let mut incoming = stream_of(vec![record(9, 9).with_id(EdgeId::new(1)).with_weight(3.0)]);
        let added = StagedBulkWriter::new(&mut store)
            .upsert_edges(&mut incoming, MergeKey::EdgeId)
            .expect("id-keyed upsert must succeed");

        assert_eq!(added, 0, "replacement adds no rows");
        let row = store
            .primary
            .get(&EdgeId::new(1))
            .expect("row must survive under its id");
        assert_eq!(row.weight, 3.0);
    }

    #[rstest]
    fn staging_failure_leaves_primary_untouched() {
        let mut store = FailingStore::new(VecStore::with_max_batch(10), 2);
        let mut stream = stream_of((1..=25u64).map(|i| record(i, i + 1)).collect());

        let err = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect_err("second staged batch must fail");

        assert!(matches!(
            err,
            ImportError::Store {
                source: StoreError::Unavailable { .. },
            },
        ));
        assert_eq!(store.edge_count().expect("count must succeed"), 0);
        // Cleanup path: truncate, then retry from scratch.
        store
            .truncate_staging()
            .expect("failure cleanup truncate must succeed");
        assert_eq!(store.staged_count().expect("count must succeed"), 0);
    }

    #[rstest]
    fn dirty_staging_is_a_logic_error() {
        let mut store = VecStore::default();
        store
            .stage_batch(vec![Edge::from_record(record(1, 2), EdgeId::new(1))])
            .expect("manual staging must succeed");

        let mut stream = stream_of(vec![record(3, 4)]);
        let err = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect_err("dirty staging must be reported");

        assert!(matches!(err, ImportError::DirtyStaging { staged: 1 }));
        assert_eq!(store.edge_count().expect("count must succeed"), 0);
    }

    #[rstest]
    fn duplicate_ids_surface_as_constraint_not_silent_drop() {
        let mut store = VecStore::default();
        let mut stream = stream_of(vec![
            record(1, 2).with_id(EdgeId::new(7)),
            record(2, 3).with_id(EdgeId::new(7)),
        ]);
        // Seed id 7, then id-keyed upsert is fine; insert-only of a colliding
        // id must refuse instead.
        StagedBulkWriter::new(&mut store)
            .upsert_edges(&mut stream, MergeKey::EdgeId)
            .expect("id-keyed upsert tolerates duplicate ids");
        assert_eq!(store.edge_count().expect("count must succeed"), 1);

        store
            .stage_batch(vec![Edge::from_record(record(5, 6), EdgeId::new(7))])
            .expect("manual staging must succeed");
        let err = store
            .merge_staged(MergePolicy::Insert)
            .expect_err("insert-only merge must refuse a duplicate id");
        assert!(matches!(err, StoreError::Constraint { .. }));
    }

    #[rstest]
    fn source_failure_aborts_before_merge() {
        let mut store = VecStore::with_max_batch(2);
        let mut stream = vec![
            Ok(record(1, 2)),
            Ok(record(2, 3)),
            Err(SourceError::Malformed {
                line: 3,
                message: "torn row".to_owned(),
            }),
        ]
        .into_iter();

        let err = StagedBulkWriter::new(&mut store)
            .insert_edges(&mut stream)
            .expect_err("stream failure must propagate");

        assert!(matches!(err, ImportError::Source { .. }));
        assert_eq!(store.edge_count().expect("count must succeed"), 0);
    }

    #[rstest]
    fn completion_event_reports_added_rows() {
        use grafbench_test_support::tracing::RecordingLayer;
        use tracing_subscriber::layer::SubscriberExt;

        let layer = RecordingLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());

        tracing::subscriber::with_default(subscriber, || {
            let mut store = VecStore::default();
            let mut stream = stream_of(vec![record(1, 2), record(0, 2), record(2, 3)]);
            StagedBulkWriter::new(&mut store)
                .insert_edges(&mut stream)
                .expect("import must succeed");
        });

        let event = layer
            .events()
            .into_iter()
            .find(|event| event.fields.get("message").map(String::as_str) == Some("bulk merge complete"))
            .expect("completion event must be emitted");
        assert_eq!(event.fields.get("added").map(String::as_str), Some("2"));
        assert_eq!(event.fields.get("dropped").map(String::as_str), Some("1"));
    }
}
